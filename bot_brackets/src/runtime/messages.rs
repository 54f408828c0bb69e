//! Balancer actor message types.

use crate::{
    brackets::{BracketsConfig, ConfigResult},
    host::{CharacterId, GuildId},
    scheduler::{DueCycles, SchedulerStatus, TickReport},
};
use tokio::sync::{mpsc, oneshot};

/// Messages that can be sent to a `BracketActor`
#[derive(Debug)]
pub enum BracketMessage {
    /// Replace the configuration; the running one stays on error
    Reload {
        config: Box<BracketsConfig>,
        response: oneshot::Sender<ConfigResult<()>>,
    },

    /// A character logged out
    PlayerLogout { character_id: CharacterId },

    /// Forget tracked guilds with no real player online
    CleanupGuildTracker {
        response: oneshot::Sender<Vec<GuildId>>,
    },

    /// Run sub-cycles now, regardless of their timers
    RunNow {
        cycles: DueCycles,
        response: oneshot::Sender<TickReport>,
    },

    /// Current balancer status
    GetStatus {
        response: oneshot::Sender<SchedulerStatus>,
    },

    /// Receive a report after every update that did any work
    Subscribe { sender: mpsc::Sender<TickReport> },

    /// Stop the actor
    Shutdown,
}
