//! Balancer configuration.

use super::{
    errors::{ConfigError, ConfigResult},
    range::LevelRange,
};
use crate::host::Level;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr};

/// Default number of brackets per faction
pub const DEFAULT_NUM_RANGES: usize = 9;

/// Dynamic distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicDistributionConfig {
    /// Recompute bracket percentages from the real player population
    pub use_dynamic_distribution: bool,

    /// Boost applied to real player occupancy when weighting brackets
    pub real_player_weight: f64,

    /// Pool real players from both factions and share one weighting.
    /// Requires identical bracket bounds for both factions.
    pub sync_factions: bool,
}

impl Default for DynamicDistributionConfig {
    fn default() -> Self {
        Self {
            use_dynamic_distribution: false,
            real_player_weight: 1.0,
            sync_factions: false,
        }
    }
}

/// Complete balancer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketsConfig {
    /// Master switch
    pub enabled: bool,

    /// Leave bots alone when their guild has (or had) a real player
    pub ignore_guild_bots_with_real_players: bool,

    /// Leave bots alone when they belong to an arena team
    pub ignore_arena_team_bots: bool,

    /// Leave bots alone when a real player has them on a friend list
    pub ignore_friend_listed: bool,

    /// Seconds between full distribution scans
    pub check_frequency_secs: u32,

    /// Seconds between pending reset drains
    pub flagged_check_frequency_secs: u32,

    /// Seconds between persistent guild tracker syncs
    pub guild_tracker_update_frequency_secs: u32,

    /// Maximum resets applied per drain (0 = unlimited)
    pub flagged_process_limit: u32,

    /// Character names that are never processed
    pub exclude_names: Vec<String>,

    /// Lowest level a random bot may have
    pub random_bot_min_level: Level,

    /// Highest level a random bot may have
    pub random_bot_max_level: Level,

    /// Dynamic distribution settings
    pub dynamic: DynamicDistributionConfig,

    /// Alliance brackets
    pub alliance_ranges: Vec<LevelRange>,

    /// Horde brackets
    pub horde_ranges: Vec<LevelRange>,
}

impl Default for BracketsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignore_guild_bots_with_real_players: true,
            ignore_arena_team_bots: true,
            ignore_friend_listed: true,
            check_frequency_secs: 300,
            flagged_check_frequency_secs: 15,
            guild_tracker_update_frequency_secs: 600,
            flagged_process_limit: 5,
            exclude_names: Vec::new(),
            random_bot_min_level: 1,
            random_bot_max_level: 80,
            dynamic: DynamicDistributionConfig::default(),
            alliance_ranges: default_ranges(DEFAULT_NUM_RANGES, 80),
            horde_ranges: default_ranges(DEFAULT_NUM_RANGES, 80),
        }
    }
}

impl BracketsConfig {
    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - `BOT_BRACKETS_ENABLED` (default: true)
    /// - `BOT_BRACKETS_IGNORE_GUILD_BOTS_WITH_REAL_PLAYERS` (default: true)
    /// - `BOT_BRACKETS_IGNORE_ARENA_TEAM_BOTS` (default: true)
    /// - `BOT_BRACKETS_IGNORE_FRIEND_LISTED` (default: true)
    /// - `BOT_BRACKETS_CHECK_FREQUENCY` seconds (default: 300)
    /// - `BOT_BRACKETS_CHECK_FLAGGED_FREQUENCY` seconds (default: 15)
    /// - `BOT_BRACKETS_GUILD_TRACKER_UPDATE_FREQUENCY` seconds (default: 600)
    /// - `BOT_BRACKETS_FLAGGED_PROCESS_LIMIT` (default: 5, 0 = unlimited)
    /// - `BOT_BRACKETS_EXCLUDE_NAMES` comma separated names
    /// - `RANDOM_BOT_MIN_LEVEL` / `RANDOM_BOT_MAX_LEVEL` (default: 1 / 80)
    /// - `BOT_BRACKETS_USE_DYNAMIC_DISTRIBUTION` (default: false)
    /// - `BOT_BRACKETS_REAL_PLAYER_WEIGHT` (default: 1.0)
    /// - `BOT_BRACKETS_SYNC_FACTIONS` (default: false)
    /// - `BOT_BRACKETS_NUM_RANGES` (default: 9) for the generated default brackets
    /// - `BOT_BRACKETS_ALLIANCE_RANGES` / `BOT_BRACKETS_HORDE_RANGES` as
    ///   `lower-upper:pct` items, e.g. `1-9:11,10-19:11`
    ///
    /// The result is not validated; call [`BracketsConfig::validate`].
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();
        let min_level = env_parse("RANDOM_BOT_MIN_LEVEL", defaults.random_bot_min_level)?;
        let max_level = env_parse("RANDOM_BOT_MAX_LEVEL", defaults.random_bot_max_level)?;
        let num_ranges = env_parse("BOT_BRACKETS_NUM_RANGES", DEFAULT_NUM_RANGES)?;

        let alliance_ranges = match env::var("BOT_BRACKETS_ALLIANCE_RANGES") {
            Ok(list) => parse_range_list("BOT_BRACKETS_ALLIANCE_RANGES", &list)?,
            Err(_) => default_ranges(num_ranges, max_level),
        };
        let horde_ranges = match env::var("BOT_BRACKETS_HORDE_RANGES") {
            Ok(list) => parse_range_list("BOT_BRACKETS_HORDE_RANGES", &list)?,
            Err(_) => default_ranges(num_ranges, max_level),
        };

        Ok(Self {
            enabled: env_parse("BOT_BRACKETS_ENABLED", defaults.enabled)?,
            ignore_guild_bots_with_real_players: env_parse(
                "BOT_BRACKETS_IGNORE_GUILD_BOTS_WITH_REAL_PLAYERS",
                defaults.ignore_guild_bots_with_real_players,
            )?,
            ignore_arena_team_bots: env_parse(
                "BOT_BRACKETS_IGNORE_ARENA_TEAM_BOTS",
                defaults.ignore_arena_team_bots,
            )?,
            ignore_friend_listed: env_parse(
                "BOT_BRACKETS_IGNORE_FRIEND_LISTED",
                defaults.ignore_friend_listed,
            )?,
            check_frequency_secs: env_parse(
                "BOT_BRACKETS_CHECK_FREQUENCY",
                defaults.check_frequency_secs,
            )?,
            flagged_check_frequency_secs: env_parse(
                "BOT_BRACKETS_CHECK_FLAGGED_FREQUENCY",
                defaults.flagged_check_frequency_secs,
            )?,
            guild_tracker_update_frequency_secs: env_parse(
                "BOT_BRACKETS_GUILD_TRACKER_UPDATE_FREQUENCY",
                defaults.guild_tracker_update_frequency_secs,
            )?,
            flagged_process_limit: env_parse(
                "BOT_BRACKETS_FLAGGED_PROCESS_LIMIT",
                defaults.flagged_process_limit,
            )?,
            exclude_names: env::var("BOT_BRACKETS_EXCLUDE_NAMES")
                .map(|names| parse_exclude_names(&names))
                .unwrap_or_default(),
            random_bot_min_level: min_level,
            random_bot_max_level: max_level,
            dynamic: DynamicDistributionConfig {
                use_dynamic_distribution: env_parse(
                    "BOT_BRACKETS_USE_DYNAMIC_DISTRIBUTION",
                    defaults.dynamic.use_dynamic_distribution,
                )?,
                real_player_weight: env_parse(
                    "BOT_BRACKETS_REAL_PLAYER_WEIGHT",
                    defaults.dynamic.real_player_weight,
                )?,
                sync_factions: env_parse(
                    "BOT_BRACKETS_SYNC_FACTIONS",
                    defaults.dynamic.sync_factions,
                )?,
            },
            alliance_ranges,
            horde_ranges,
        })
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// * `ConfigError::NoBrackets` - A faction has no brackets
    /// * `ConfigError::BracketCountMismatch` - Factions have different bracket counts
    /// * `ConfigError::BracketMismatch` - Synchronized factions with different bounds
    /// * `ConfigError::InvalidLevelBounds` - Global min level above max level
    pub fn validate(&self) -> ConfigResult<()> {
        if self.alliance_ranges.is_empty() {
            return Err(ConfigError::NoBrackets("Alliance"));
        }
        if self.horde_ranges.is_empty() {
            return Err(ConfigError::NoBrackets("Horde"));
        }
        if self.alliance_ranges.len() != self.horde_ranges.len() {
            return Err(ConfigError::BracketCountMismatch {
                alliance: self.alliance_ranges.len(),
                horde: self.horde_ranges.len(),
            });
        }
        if self.random_bot_min_level > self.random_bot_max_level {
            return Err(ConfigError::InvalidLevelBounds {
                min: self.random_bot_min_level,
                max: self.random_bot_max_level,
            });
        }

        if self.dynamic.sync_factions {
            let mismatch = self
                .alliance_ranges
                .iter()
                .zip(&self.horde_ranges)
                .position(|(alliance, horde)| !alliance.same_bounds(horde));

            if let Some(index) = mismatch {
                let alliance = self.alliance_ranges[index];
                let horde = self.horde_ranges[index];
                return Err(ConfigError::BracketMismatch {
                    index,
                    alliance_lower: alliance.lower,
                    alliance_upper: alliance.upper,
                    horde_lower: horde.lower,
                    horde_upper: horde.upper,
                });
            }
        }

        Ok(())
    }

    /// Number of brackets per faction
    pub fn num_ranges(&self) -> usize {
        self.alliance_ranges.len()
    }
}

/// Generated brackets: `1-9, 10-19, ...`, the last one open to `max_level`,
/// 11% each before normalization
pub fn default_ranges(count: usize, max_level: Level) -> Vec<LevelRange> {
    (0..count)
        .map(|i| {
            let lower = if i == 0 { 1 } else { decade(i) };
            let upper = if i + 1 < count {
                decade(i).saturating_add(9)
            } else {
                max_level
            };
            LevelRange::new(lower, upper, 11)
        })
        .collect()
}

fn decade(i: usize) -> Level {
    Level::try_from(i * 10).unwrap_or(Level::MAX)
}

/// Parse a comma separated name list, stripping all whitespace
pub fn parse_exclude_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parse `lower-upper:pct` items separated by commas
pub fn parse_range_list(key: &str, list: &str) -> ConfigResult<Vec<LevelRange>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_range(item).ok_or_else(|| ConfigError::invalid(key, item)))
        .collect()
}

fn parse_range(item: &str) -> Option<LevelRange> {
    let (bounds, pct) = item.split_once(':')?;
    let (lower, upper) = bounds.split_once('-')?;
    Some(LevelRange::new(
        lower.trim().parse().ok()?,
        upper.trim().parse().ok()?,
        pct.trim().parse().ok()?,
    ))
}

fn env_parse<T: FromStr>(key: &str, default: T) -> ConfigResult<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(key, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges_layout() {
        let ranges = default_ranges(9, 80);
        assert_eq!(ranges.len(), 9);
        assert_eq!(ranges[0], LevelRange::new(1, 9, 11));
        assert_eq!(ranges[1], LevelRange::new(10, 19, 11));
        assert_eq!(ranges[7], LevelRange::new(70, 79, 11));
        assert_eq!(ranges[8], LevelRange::new(80, 80, 11));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BracketsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_exclude_names_strips_whitespace() {
        let names = parse_exclude_names(" Alice , Bob Smith,,  ,Carol");
        assert_eq!(names, vec!["Alice", "BobSmith", "Carol"]);
    }

    #[test]
    fn test_parse_range_list() {
        let ranges = parse_range_list("key", "1-39:50, 40-80:50").unwrap();
        assert_eq!(
            ranges,
            vec![LevelRange::new(1, 39, 50), LevelRange::new(40, 80, 50)]
        );
    }

    #[test]
    fn test_parse_range_list_rejects_garbage() {
        let err = parse_range_list("BOT_BRACKETS_HORDE_RANGES", "1-39:50,forty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "forty"));
    }

    #[test]
    fn test_sync_factions_rejects_mismatched_bounds() {
        let mut config = BracketsConfig::default();
        config.dynamic.use_dynamic_distribution = true;
        config.dynamic.sync_factions = true;
        config.horde_ranges[3].upper = 38;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::BracketMismatch { index: 3, .. }));
    }

    #[test]
    fn test_separate_factions_allow_different_bounds() {
        let mut config = BracketsConfig::default();
        config.horde_ranges[3].upper = 38;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bracket_count_mismatch() {
        let mut config = BracketsConfig::default();
        config.horde_ranges.pop();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BracketCountMismatch {
                alliance: 9,
                horde: 8
            })
        ));
    }

    #[test]
    fn test_inverted_global_bounds() {
        let config = BracketsConfig {
            random_bot_min_level: 60,
            random_bot_max_level: 20,
            ..BracketsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLevelBounds { min: 60, max: 20 })
        ));
    }

    #[test]
    fn test_json_partial_document_keeps_defaults() {
        let config = BracketsConfig::from_json_str(
            r#"{
                "flagged_process_limit": 0,
                "alliance_ranges": [{"lower": 1, "upper": 80, "pct": 100}],
                "horde_ranges": [{"lower": 1, "upper": 80, "desired_percent": 100}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.flagged_process_limit, 0);
        assert_eq!(config.check_frequency_secs, 300);
        assert!(config.enabled);
        assert_eq!(config.alliance_ranges, vec![LevelRange::new(1, 80, 100)]);
        assert_eq!(config.horde_ranges, vec![LevelRange::new(1, 80, 100)]);
    }
}
