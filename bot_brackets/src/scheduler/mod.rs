//! Balancer scheduler: owns all balancing state and runs the sub-cycles.
//!
//! Three sub-cycles share one update call, each with its own timer:
//! - Drain: apply a few pending resets (default every 15 s)
//! - Guild sync: add guilds with online real players to the persistent
//!   tracker (default every 600 s)
//! - Scan: count the population, optionally reweight the brackets from real
//!   players, and queue surplus bots (default every 300 s)
//!
//! ## Driving the scheduler
//!
//! [`BracketScheduler::on_update`] does everything in one call. Drivers that
//! have to talk to a store in between use the two halves:
//! [`BracketScheduler::advance_timers`] says what is due, and
//! [`BracketScheduler::run_due`] does the work.

pub mod status;
pub mod timers;

pub use status::{FactionSnapshot, ScanSnapshot, SchedulerStatus};
pub use timers::{CycleTimers, DueCycles};

use crate::{
    balance::{
        EligibilityContext, FactionScan, PopulationScan, RedistributionReport,
        apply_dynamic_weights, desired_counts, redistribute, scan_population,
    },
    brackets::{Brackets, BracketsConfig, ConfigResult},
    host::{CharacterId, Faction, GuildId, World},
    queue::{DrainReport, PendingReset, PendingResetQueue, drain_pending},
    tracker::{FriendSet, GuildTracker},
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};

/// Outcome of a full scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub population: PopulationScan,
    pub redistribution: RedistributionReport,
}

/// What one update did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub drain: Option<DrainReport>,

    /// Guilds to mark in the store after a guild sync
    pub guilds_marked: Option<Vec<GuildId>>,

    pub scan: Option<ScanReport>,
}

/// Owns brackets, pending resets and protection memory
pub struct BracketScheduler {
    config: BracketsConfig,
    brackets: Brackets,
    queue: PendingResetQueue,
    guilds: GuildTracker,
    friends: FriendSet,
    timers: CycleTimers,
    rng: StdRng,
    last_scan: Option<ScanSnapshot>,
}

impl BracketScheduler {
    /// Build a scheduler from validated configuration
    ///
    /// # Errors
    ///
    /// Any configuration error; a balancer with bad brackets never starts
    pub fn new(config: BracketsConfig) -> ConfigResult<Self> {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`BracketScheduler::new`] with a reproducible level picker
    pub fn with_seed(config: BracketsConfig, seed: u64) -> ConfigResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BracketsConfig, rng: StdRng) -> ConfigResult<Self> {
        let brackets = Brackets::from_config(&config)?;

        if config.enabled {
            log::info!(
                "Bot level brackets loaded. Check frequency: {} seconds, flagged check frequency: {} seconds",
                config.check_frequency_secs,
                config.flagged_check_frequency_secs
            );
            brackets.log_summary();
        } else {
            log::info!("Bot level brackets disabled via configuration");
        }

        Ok(Self {
            config,
            brackets,
            queue: PendingResetQueue::new(),
            guilds: GuildTracker::new(),
            friends: FriendSet::new(),
            timers: CycleTimers::new(),
            rng,
            last_scan: None,
        })
    }

    pub fn config(&self) -> &BracketsConfig {
        &self.config
    }

    pub fn brackets(&self) -> &Brackets {
        &self.brackets
    }

    pub fn queue(&self) -> &PendingResetQueue {
        &self.queue
    }

    pub fn guild_tracker(&self) -> &GuildTracker {
        &self.guilds
    }

    /// Seed the persistent guild tier from the store
    pub fn load_persistent_guilds(&mut self, guilds: impl IntoIterator<Item = GuildId>) {
        self.guilds.load_persistent(guilds);
    }

    /// Replace the friend list snapshot
    pub fn set_friends(&mut self, friends: FriendSet) {
        self.friends = friends;
    }

    /// Advance the timers and run whatever fell due
    pub fn on_update<W: World + ?Sized>(&mut self, world: &mut W, diff_ms: u32) -> TickReport {
        let due = self.advance_timers(diff_ms);
        self.run_due(world, due)
    }

    /// Advance the timers by `diff_ms`. Nothing is ever due while disabled.
    pub fn advance_timers(&mut self, diff_ms: u32) -> DueCycles {
        if !self.config.enabled {
            return DueCycles::default();
        }
        self.timers.advance(diff_ms, &self.config)
    }

    /// Run the sub-cycles in `due`: drain, then guild sync, then scan
    pub fn run_due<W: World + ?Sized>(&mut self, world: &mut W, due: DueCycles) -> TickReport {
        let mut report = TickReport::default();
        if !self.config.enabled {
            return report;
        }

        if due.drain {
            log::debug!("Pending level resets triggering");
            report.drain = Some(self.drain(world));
        }

        if due.guild_sync {
            log::debug!("Guild tracker update triggering");
            let online = world.online_characters();
            report.guilds_marked = Some(self.guilds.sync_persistent(&online));
        }

        if due.scan {
            report.scan = Some(self.scan(world));
        }

        report
    }

    /// Drain the pending queue once
    pub fn drain<W: World + ?Sized>(&mut self, world: &mut W) -> DrainReport {
        let ctx = EligibilityContext::new(&self.config, &self.guilds, &self.friends);
        drain_pending(
            &mut self.queue,
            world,
            &self.brackets,
            &ctx,
            self.config.flagged_process_limit,
            &mut self.rng,
        )
    }

    /// Count the population, reweight if configured, and queue surplus bots
    pub fn scan<W: World + ?Sized>(&mut self, world: &W) -> ScanReport {
        let online = world.online_characters();
        self.guilds.refresh_live(&online);

        let population = {
            let ctx = EligibilityContext::new(&self.config, &self.guilds, &self.friends);
            scan_population(&online, &self.brackets, &ctx)
        };

        if self.config.dynamic.use_dynamic_distribution {
            apply_dynamic_weights(&mut self.brackets, &population, &self.config.dynamic);
        }

        let (mut redistribution, alliance) = self.redistribute_faction(&population.alliance);
        let (horde_report, horde) = self.redistribute_faction(&population.horde);
        redistribution.merge(horde_report);

        log::info!(
            "Distribution adjustment complete. Alliance bots: {}, Horde bots: {}, {} newly flagged, {} pending",
            population.alliance.total,
            population.horde.total,
            redistribution.enqueued + redistribution.fallback_enqueued,
            self.queue.len()
        );

        self.last_scan = Some(ScanSnapshot {
            completed_at: Utc::now(),
            alliance,
            horde,
        });

        ScanReport {
            population,
            redistribution,
        }
    }

    fn redistribute_faction(&mut self, scan: &FactionScan) -> (RedistributionReport, FactionSnapshot) {
        let table = self.brackets.table(scan.faction);
        let report = redistribute(scan, table, &mut self.queue);

        let snapshot = FactionSnapshot {
            faction: scan.faction,
            total: scan.total,
            desired: desired_counts(table, scan.total),
            actual: scan.actual.clone(),
            enqueued: report.enqueued + report.fallback_enqueued,
        };
        (report, snapshot)
    }

    /// Re-validate and rebuild the brackets from new configuration.
    /// Pending resets are kept; entries whose target no longer exists are
    /// aborted when drained.
    ///
    /// # Errors
    ///
    /// Any configuration error. The running configuration is left untouched.
    pub fn reload(&mut self, config: BracketsConfig) -> ConfigResult<()> {
        let brackets = Brackets::from_config(&config)?;
        self.brackets = brackets;
        self.config = config;
        log::info!("Bot level brackets config reloaded");
        self.brackets.log_summary();
        Ok(())
    }

    /// Forget any pending reset for a character that logged out
    pub fn on_logout(&mut self, character_id: CharacterId) -> Option<PendingReset> {
        let removed = self.queue.remove(character_id);
        if removed.is_some() {
            log::debug!("Removed pending reset for character {} on logout", character_id);
        }
        removed
    }

    /// Drop tracked guilds with no real player online.
    ///
    /// # Returns
    ///
    /// Guilds to clear in the store; empty when the balancer is disabled or
    /// guild protection is off
    pub fn cleanup_guild_tracker<W: World + ?Sized>(&mut self, world: &W) -> Vec<GuildId> {
        if !self.config.enabled || !self.config.ignore_guild_bots_with_real_players {
            return Vec::new();
        }
        let online = world.online_characters();
        self.guilds.cleanup(&online)
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            enabled: self.config.enabled,
            pending_resets: self.queue.len(),
            persistent_guilds: self.guilds.persistent_len(),
            live_guilds: self.guilds.live_len(),
            friend_listed: self.friends.len(),
            alliance_percents: self.brackets.table(Faction::Alliance).percents(),
            horde_percents: self.brackets.table(Faction::Horde).percents(),
            last_scan: self.last_scan.clone(),
        }
    }
}
