//! Read-only snapshots for the command surface.

use crate::host::Faction;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One faction's occupancy at the last scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionSnapshot {
    pub faction: Faction,
    pub total: u32,
    pub desired: Vec<u32>,
    pub actual: Vec<u32>,
    pub enqueued: u32,
}

/// Results of the last full scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSnapshot {
    pub completed_at: DateTime<Utc>,
    pub alliance: FactionSnapshot,
    pub horde: FactionSnapshot,
}

/// Balancer state at a glance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStatus {
    pub enabled: bool,
    pub pending_resets: usize,
    pub persistent_guilds: usize,
    pub live_guilds: usize,
    pub friend_listed: usize,
    pub alliance_percents: Vec<u8>,
    pub horde_percents: Vec<u8>,
    pub last_scan: Option<ScanSnapshot>,
}
