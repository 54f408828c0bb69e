//! Per-faction bracket tables and percentage normalization.

use super::{config::BracketsConfig, errors::ConfigResult, range::LevelRange};
use crate::host::{Faction, Level};

/// Ordered brackets for one faction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    ranges: Vec<LevelRange>,
}

impl BracketTable {
    pub fn new(ranges: Vec<LevelRange>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[LevelRange] {
        &self.ranges
    }

    pub fn get(&self, index: usize) -> Option<&LevelRange> {
        self.ranges.get(index)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Desired percentages, index-aligned with the ranges
    pub fn percents(&self) -> Vec<u8> {
        self.ranges.iter().map(|r| r.desired_percent).collect()
    }

    /// Sum of desired percentages over active ranges
    pub fn active_percent_sum(&self) -> u32 {
        self.ranges
            .iter()
            .filter(|r| r.is_active())
            .map(|r| u32::from(r.desired_percent))
            .sum()
    }

    /// First bracket containing `level`
    pub fn index_of(&self, level: Level) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(level))
    }

    /// Bracket closest to `level`, skipping inert brackets and brackets that
    /// end below `floor`. Ties go to the lowest index.
    pub fn nearest_index(&self, level: Level, floor: Option<Level>) -> Option<usize> {
        let mut best: Option<(usize, u8)> = None;
        for (index, range) in self.ranges.iter().enumerate() {
            if !range.is_active() {
                continue;
            }
            if floor.is_some_and(|floor| range.upper < floor) {
                continue;
            }
            let diff = range.distance_to(level);
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((index, diff));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Clamp every range into `[min, max]` and normalize the active
    /// percentages to sum to exactly 100.
    ///
    /// Returns the active sum before normalization. A zero sum is left alone.
    pub fn clamp_and_normalize(&mut self, min: Level, max: Level) -> u32 {
        for range in &mut self.ranges {
            range.clamp_to(min, max);
        }

        let total = self.active_percent_sum();
        if total != 0 && total != 100 {
            log::debug!("Bracket percentages sum to {} (expected 100), auto adjusting", total);
            self.reconcile(total);
        }
        total
    }

    /// Replace the desired percentages with `weight / total_weight * 100`,
    /// rounded, then reconcile the rounding drift. Inert ranges always get a
    /// weight of zero; missing weights count as zero.
    pub fn apply_weights(&mut self, weights: &[f64]) {
        let effective: Vec<f64> = self
            .ranges
            .iter()
            .enumerate()
            .map(|(i, range)| {
                let weight = weights.get(i).copied().unwrap_or(0.0);
                if range.is_active() && weight.is_finite() {
                    weight.max(0.0)
                } else {
                    0.0
                }
            })
            .collect();

        let total: f64 = effective.iter().sum();
        for (range, weight) in self.ranges.iter_mut().zip(&effective) {
            range.desired_percent = if total > 0.0 {
                (weight / total * 100.0).round().clamp(0.0, 100.0) as u8
            } else {
                0
            };
        }

        let sum = self.active_percent_sum();
        if sum != 0 && sum != 100 {
            self.reconcile(sum);
        }
    }

    /// Move the sum to 100 one point at a time in index order. Only active
    /// ranges that already hold a share take part, so a range configured at
    /// 0% stays empty.
    fn reconcile(&mut self, total: u32) {
        let mut missing = 100_i64 - i64::from(total);

        while missing > 0 {
            let mut progressed = false;
            for range in self.ranges.iter_mut() {
                if missing == 0 {
                    break;
                }
                if range.is_active() && range.desired_percent > 0 {
                    range.desired_percent += 1;
                    missing -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        while missing < 0 {
            let mut progressed = false;
            for range in self.ranges.iter_mut() {
                if missing == 0 {
                    break;
                }
                if range.is_active() && range.desired_percent > 0 {
                    range.desired_percent -= 1;
                    missing += 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
    }
}

/// Bracket tables for both factions plus the global level bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brackets {
    alliance: BracketTable,
    horde: BracketTable,
    min_level: Level,
    max_level: Level,
}

impl Brackets {
    /// Build validated, clamped and normalized tables from configuration
    ///
    /// # Errors
    ///
    /// Any error from [`BracketsConfig::validate`]
    pub fn from_config(config: &BracketsConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut brackets = Self {
            alliance: BracketTable::new(config.alliance_ranges.clone()),
            horde: BracketTable::new(config.horde_ranges.clone()),
            min_level: config.random_bot_min_level,
            max_level: config.random_bot_max_level,
        };
        brackets.clamp_and_normalize();
        Ok(brackets)
    }

    pub fn table(&self, faction: Faction) -> &BracketTable {
        match faction {
            Faction::Alliance => &self.alliance,
            Faction::Horde => &self.horde,
        }
    }

    pub fn table_mut(&mut self, faction: Faction) -> &mut BracketTable {
        match faction {
            Faction::Alliance => &mut self.alliance,
            Faction::Horde => &mut self.horde,
        }
    }

    pub fn num_ranges(&self) -> usize {
        self.alliance.len()
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// Bracket index for a level, `None` outside the global bounds or outside
    /// every bracket
    pub fn index_of(&self, level: Level, faction: Faction) -> Option<usize> {
        if level < self.min_level || level > self.max_level {
            return None;
        }
        self.table(faction).index_of(level)
    }

    /// Clamp and normalize both faction tables
    pub fn clamp_and_normalize(&mut self) {
        let (min, max) = (self.min_level, self.max_level);
        self.alliance.clamp_and_normalize(min, max);
        self.horde.clamp_and_normalize(min, max);
    }

    /// Log every bracket with its desired share
    pub fn log_summary(&self) {
        for faction in Faction::ALL {
            for (i, range) in self.table(faction).ranges().iter().enumerate() {
                log::info!(
                    "{} Range {}: {}, Desired Percentage: {}%",
                    faction,
                    i + 1,
                    range,
                    range.desired_percent
                );
            }
        }
    }
}
