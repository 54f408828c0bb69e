//! # Bot Level Brackets
//!
//! Keeps the level distribution of random bots within configured percentage
//! targets, separately per faction, across a fixed number of level brackets.
//!
//! Every scan counts the eligible bots per bracket, optionally reweights the
//! brackets from where real players are, and queues surplus bots for a move
//! into underfull brackets. A separate drain pass applies a few queued moves
//! at a time, and only to bots that are safe to touch: idle, alive, out of
//! instanced content and not grouped with real players.
//!
//! ## Core Modules
//!
//! - [`brackets`]: Bracket tables, configuration and normalization
//! - [`balance`]: Eligibility, safety, scanning, weighting and redistribution
//! - [`queue`]: Pending resets and the rate-limited drain
//! - [`tracker`]: Guilds with real players and friend-listed bots
//! - [`scheduler`]: Owns all state and runs the sub-cycles on timers
//! - [`runtime`]: Tokio actor driving the scheduler against a shared world
//! - [`db`]: PostgreSQL and in-memory protection stores
//! - [`host`]: Character snapshots and the world contract
//!
//! ## Example
//!
//! ```
//! use bot_brackets::{BracketScheduler, BracketsConfig};
//! use bot_brackets::host::{CharacterKind, CharacterState, Faction, InMemoryWorld};
//! use bot_brackets::scheduler::DueCycles;
//!
//! let mut world = InMemoryWorld::with_characters([CharacterState::new(
//!     1, "Bot", 40, Faction::Alliance, CharacterKind::RandomBot,
//! )]);
//! let mut scheduler = BracketScheduler::new(BracketsConfig::default()).unwrap();
//!
//! let report = scheduler.run_due(&mut world, DueCycles::ALL);
//! assert_eq!(report.scan.unwrap().population.alliance.total, 1);
//! ```

pub mod balance;
pub mod brackets;
pub mod db;
pub mod host;
pub mod queue;
pub mod runtime;
pub mod scheduler;
pub mod tracker;

pub use brackets::{Brackets, BracketsConfig, ConfigError, ConfigResult};
pub use host::{CharacterState, World};
pub use queue::{PendingReset, PendingResetQueue};
pub use runtime::{BracketActor, BracketHandle};
pub use scheduler::{BracketScheduler, TickReport};
