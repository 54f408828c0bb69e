//! Protection memory: guilds with real players and friend-listed bots.
//!
//! Guild protection has two tiers. The live tier is a snapshot of guilds
//! with a real player online; the persistent tier remembers every such guild
//! across restarts and is pruned only by an explicit cleanup. A guild is
//! protected when either tier contains it.

pub mod errors;
pub mod friends;
pub mod guild;

pub use errors::{TrackerError, TrackerResult};
pub use friends::FriendSet;
pub use guild::GuildTracker;
