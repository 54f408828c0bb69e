//! Guilds known to contain a real player.

use crate::host::{CharacterState, GuildId};
use std::collections::HashSet;

/// Two-tier record of guilds with real players.
///
/// The live tier is rebuilt from the online population on every scan. The
/// persistent tier only grows during normal operation; entries leave it
/// through [`GuildTracker::cleanup`] alone, so a guild stays protected while
/// its real players are offline.
#[derive(Debug, Clone, Default)]
pub struct GuildTracker {
    /// Guilds with a real player online at the last scan
    live: HashSet<GuildId>,

    /// Guilds ever seen with a real player (mirrors the store)
    persistent: HashSet<GuildId>,
}

impl GuildTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the persistent tier with what the store holds
    pub fn load_persistent(&mut self, guilds: impl IntoIterator<Item = GuildId>) {
        self.persistent = guilds.into_iter().filter(|&id| id != 0).collect();
        log::info!(
            "Loaded {} guilds with real players from persistent storage",
            self.persistent.len()
        );
    }

    /// Rebuild the live tier from the online population
    pub fn refresh_live(&mut self, characters: &[CharacterState]) {
        self.live = online_real_player_guilds(characters);
    }

    /// Guild is protected by either tier
    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.live.contains(&guild_id) || self.persistent.contains(&guild_id)
    }

    /// Additive sync: every guild with a real player online joins the
    /// persistent tier. Returns those guilds, sorted, for the store upsert.
    pub fn sync_persistent(&mut self, characters: &[CharacterState]) -> Vec<GuildId> {
        let current = online_real_player_guilds(characters);
        self.persistent.extend(current.iter().copied());

        let mut guilds: Vec<GuildId> = current.into_iter().collect();
        guilds.sort_unstable();
        log::info!(
            "Additive guild tracker update complete. {} guilds processed, {} total tracked guilds",
            guilds.len(),
            self.persistent.len()
        );
        guilds
    }

    /// Maintenance pass: forget every tracked guild without a real player
    /// online. Returns the removed guilds, sorted, for the store.
    pub fn cleanup(&mut self, characters: &[CharacterState]) -> Vec<GuildId> {
        let current = online_real_player_guilds(characters);

        let mut removed: Vec<GuildId> = self
            .persistent
            .iter()
            .filter(|id| !current.contains(id))
            .copied()
            .collect();
        removed.sort_unstable();

        for guild_id in &removed {
            self.persistent.remove(guild_id);
            self.live.remove(guild_id);
            log::debug!("Removed guild {} from tracker - no real players online", guild_id);
        }

        log::info!(
            "Guild tracker cleanup complete. {} guilds removed, {} guilds remain",
            removed.len(),
            self.persistent.len()
        );
        removed
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn persistent_len(&self) -> usize {
        self.persistent.len()
    }

    pub fn is_persistent(&self, guild_id: GuildId) -> bool {
        self.persistent.contains(&guild_id)
    }
}

/// Guilds of every in-world real player
fn online_real_player_guilds(characters: &[CharacterState]) -> HashSet<GuildId> {
    characters
        .iter()
        .filter(|c| c.in_world && !c.is_bot())
        .filter_map(CharacterState::guild)
        .collect()
}
