//! Async driver for the balancer.
//!
//! A single tokio task owns the scheduler. Everything else talks to it
//! through a cloneable [`BracketHandle`]: configuration reloads, logout
//! notifications, guild tracker cleanup and status queries.

pub mod actor;
pub mod errors;
pub mod messages;

pub use actor::{BracketActor, BracketHandle};
pub use errors::{RuntimeError, RuntimeResult};
pub use messages::BracketMessage;
