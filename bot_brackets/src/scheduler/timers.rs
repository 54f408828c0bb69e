//! Accumulating timers for the three sub-cycles.

use crate::brackets::BracketsConfig;

/// Sub-cycles that fired on this update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueCycles {
    /// Drain the pending reset queue
    pub drain: bool,
    /// Sync the persistent guild tracker
    pub guild_sync: bool,
    /// Full population scan and redistribution
    pub scan: bool,
}

impl DueCycles {
    /// Every sub-cycle at once
    pub const ALL: DueCycles = DueCycles {
        drain: true,
        guild_sync: true,
        scan: true,
    };

    pub fn any(&self) -> bool {
        self.drain || self.guild_sync || self.scan
    }
}

/// Elapsed milliseconds per sub-cycle
#[derive(Debug, Clone, Default)]
pub struct CycleTimers {
    drain_ms: u64,
    guild_sync_ms: u64,
    scan_ms: u64,
}

impl CycleTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `diff_ms` to every timer. A timer that reaches its period fires
    /// and starts over from zero; leftover time is not carried.
    pub fn advance(&mut self, diff_ms: u32, config: &BracketsConfig) -> DueCycles {
        let diff = u64::from(diff_ms);
        self.drain_ms += diff;
        self.guild_sync_ms += diff;
        self.scan_ms += diff;

        DueCycles {
            drain: fire(&mut self.drain_ms, config.flagged_check_frequency_secs),
            guild_sync: fire(
                &mut self.guild_sync_ms,
                config.guild_tracker_update_frequency_secs,
            ),
            scan: fire(&mut self.scan_ms, config.check_frequency_secs),
        }
    }
}

fn fire(elapsed_ms: &mut u64, period_secs: u32) -> bool {
    if *elapsed_ms >= u64::from(period_secs) * 1000 {
        *elapsed_ms = 0;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BracketsConfig {
        BracketsConfig {
            flagged_check_frequency_secs: 15,
            guild_tracker_update_frequency_secs: 600,
            check_frequency_secs: 300,
            ..BracketsConfig::default()
        }
    }

    #[test]
    fn test_each_timer_fires_on_its_own_period() {
        let config = config();
        let mut timers = CycleTimers::new();

        assert!(!timers.advance(14_999, &config).any());

        let due = timers.advance(1, &config);
        assert_eq!(due, DueCycles { drain: true, guild_sync: false, scan: false });

        // 19 more drain periods bring the scan timer to 300 s
        let mut scans = 0;
        for _ in 0..19 {
            if timers.advance(15_000, &config).scan {
                scans += 1;
            }
        }
        assert_eq!(scans, 1);
    }

    #[test]
    fn test_timer_resets_to_zero() {
        let config = config();
        let mut timers = CycleTimers::new();

        // Overshoot is dropped, so the next drain needs a full period again
        assert!(timers.advance(20_000, &config).drain);
        assert!(!timers.advance(10_000, &config).drain);
        assert!(timers.advance(5_000, &config).drain);
    }
}
