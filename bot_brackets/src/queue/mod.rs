//! Deferred reset queue.
//!
//! Bots picked for a move are not reset on the spot. They wait here, one
//! entry per character, and a separate drain pass applies them a few at a
//! time once each bot is safe to touch.

pub mod drain;
pub mod pending;

pub use drain::{AbortReason, DrainOutcome, DrainReport, DropReason, choose_target_level, drain_pending};
pub use pending::{PendingReset, PendingResetQueue};
