//! Dynamic bracket weighting from the real player population.

use super::scanner::PopulationScan;
use crate::brackets::{BracketTable, Brackets, DynamicDistributionConfig};
use crate::host::Faction;

/// Every bracket starts from this weight
const BASELINE_WEIGHT: f64 = 1.0;

/// How real player counts are pooled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingMode {
    /// Each faction is weighted from its own real players
    Separate,
    /// Both factions share one weighting from the combined counts
    Synchronized,
}

impl WeightingMode {
    pub fn from_config(dynamic: &DynamicDistributionConfig) -> Self {
        if dynamic.sync_factions {
            WeightingMode::Synchronized
        } else {
            WeightingMode::Separate
        }
    }
}

/// `1 + real_player_weight * scale * ln(1 + real_in_bracket)` where `scale`
/// is `1 / total_real`, or 1 when there are no real players at all
pub fn bracket_weight(real_player_weight: f64, total_real: u32, real_in_bracket: u32) -> f64 {
    let scale = if total_real > 0 {
        1.0 / f64::from(total_real)
    } else {
        1.0
    };
    BASELINE_WEIGHT + real_player_weight * scale * f64::from(real_in_bracket).ln_1p()
}

/// Weights for one table; inert brackets get zero
pub fn table_weights(
    table: &BracketTable,
    real_players: &[u32],
    total_real: u32,
    real_player_weight: f64,
) -> Vec<f64> {
    table
        .ranges()
        .iter()
        .enumerate()
        .map(|(i, range)| {
            if range.is_active() {
                let real = real_players.get(i).copied().unwrap_or(0);
                bracket_weight(real_player_weight, total_real, real)
            } else {
                0.0
            }
        })
        .collect()
}

/// Recompute both tables' desired percentages from the scan, then re-clamp
/// and re-normalize.
pub fn apply_dynamic_weights(
    brackets: &mut Brackets,
    scan: &PopulationScan,
    dynamic: &DynamicDistributionConfig,
) {
    let weight = dynamic.real_player_weight;

    match WeightingMode::from_config(dynamic) {
        WeightingMode::Synchronized => {
            let combined: Vec<u32> = scan
                .alliance
                .real_players
                .iter()
                .zip(&scan.horde.real_players)
                .map(|(a, h)| a + h)
                .collect();
            let total_real = scan.alliance.total_real + scan.horde.total_real;
            let weights = table_weights(
                brackets.table(Faction::Alliance),
                &combined,
                total_real,
                weight,
            );
            for faction in Faction::ALL {
                brackets.table_mut(faction).apply_weights(&weights);
            }
        }
        WeightingMode::Separate => {
            for faction in Faction::ALL {
                let faction_scan = scan.faction(faction);
                let weights = table_weights(
                    brackets.table(faction),
                    &faction_scan.real_players,
                    faction_scan.total_real,
                    weight,
                );
                brackets.table_mut(faction).apply_weights(&weights);
            }
        }
    }

    brackets.clamp_and_normalize();

    let (alliance, horde) = (brackets.table(Faction::Alliance), brackets.table(Faction::Horde));
    for (i, (a, h)) in alliance.ranges().iter().zip(horde.ranges()).enumerate() {
        log::info!(
            "Final Range {}: {}, Alliance Desired: {}%, Horde Desired: {}%",
            i + 1,
            a,
            a.desired_percent,
            h.desired_percent
        );
    }
}
