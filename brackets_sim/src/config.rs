//! Simulator configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bot_brackets::{BracketsConfig, ConfigError as BracketsConfigError, db::DatabaseConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Complete simulator configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Balancer configuration
    pub brackets: BracketsConfig,
    /// Database configuration; `None` runs against in-memory stores
    pub database: Option<DatabaseConfig>,
    /// Simulated population
    pub population: PopulationConfig,
    /// Balancer update interval
    pub tick: Duration,
    /// How often the simulated world changes
    pub churn_period: Duration,
    /// How often a status summary is logged
    pub report_period: Duration,
    /// Stop after this long; runs until Ctrl+C when `None`
    pub duration: Option<Duration>,
    /// Prometheus scrape address
    pub metrics_addr: Option<SocketAddr>,
}

/// Simulated population settings
#[derive(Debug, Clone)]
pub struct PopulationConfig {
    /// Random bots per faction
    pub bots_per_faction: usize,
    /// Real players per faction
    pub players_per_faction: usize,
    /// Number of guilds bots and players are spread over
    pub guilds: u32,
    /// Chance per churn step that a character changes activity
    pub activity_chance: f64,
    /// Chance per churn step that an online character logs out
    pub logout_chance: f64,
    /// Seed for the population and the churn; random when `None`
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            bots_per_faction: 500,
            players_per_faction: 20,
            guilds: 25,
            activity_chance: 0.1,
            logout_chance: 0.01,
            seed: None,
        }
    }
}

/// Command line overrides, applied on top of the environment
#[derive(Debug, Default)]
pub struct SimOverrides {
    pub config_file: Option<PathBuf>,
    pub bots: Option<usize>,
    pub players: Option<usize>,
    pub seed: Option<u64>,
    pub tick_ms: Option<u64>,
    pub duration_secs: Option<u64>,
    pub metrics_addr: Option<SocketAddr>,
}

impl SimConfig {
    /// Load configuration from environment variables and CLI overrides
    ///
    /// Balancer settings come from `--config` (JSON) when given, otherwise
    /// from the `BOT_BRACKETS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the balancer configuration cannot be read or parsed
    pub fn from_env(overrides: SimOverrides) -> Result<Self, ConfigError> {
        let brackets = match &overrides.config_file {
            Some(path) => BracketsConfig::from_file(path)?,
            None => BracketsConfig::from_env()?,
        };

        let defaults = PopulationConfig::default();
        let population = PopulationConfig {
            bots_per_faction: overrides
                .bots
                .unwrap_or_else(|| parse_env_or("SIM_BOTS_PER_FACTION", defaults.bots_per_faction)),
            players_per_faction: overrides.players.unwrap_or_else(|| {
                parse_env_or("SIM_PLAYERS_PER_FACTION", defaults.players_per_faction)
            }),
            guilds: parse_env_or("SIM_GUILDS", defaults.guilds),
            activity_chance: parse_env_or("SIM_ACTIVITY_CHANCE", defaults.activity_chance),
            logout_chance: parse_env_or("SIM_LOGOUT_CHANCE", defaults.logout_chance),
            seed: overrides.seed.or_else(|| {
                std::env::var("SIM_SEED")
                    .ok()
                    .and_then(|v| v.parse().ok())
            }),
        };

        let metrics_addr = overrides.metrics_addr.or_else(|| {
            std::env::var("SIM_METRICS_BIND")
                .ok()
                .and_then(|s| s.parse().ok())
        });

        Ok(SimConfig {
            brackets,
            database: DatabaseConfig::from_env(),
            population,
            tick: Duration::from_millis(
                overrides
                    .tick_ms
                    .unwrap_or_else(|| parse_env_or("SIM_TICK_MS", 1000)),
            ),
            churn_period: Duration::from_millis(parse_env_or("SIM_CHURN_MS", 1000)),
            report_period: Duration::from_secs(parse_env_or("SIM_REPORT_SECS", 30)),
            duration: overrides
                .duration_secs
                .or_else(|| std::env::var("SIM_DURATION_SECS").ok().and_then(|v| v.parse().ok()))
                .map(Duration::from_secs),
            metrics_addr,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.brackets.validate()?;

        if self.tick.is_zero() {
            return Err(ConfigError::Invalid {
                var: "SIM_TICK_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.churn_period.is_zero() {
            return Err(ConfigError::Invalid {
                var: "SIM_CHURN_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.report_period.is_zero() {
            return Err(ConfigError::Invalid {
                var: "SIM_REPORT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        for (var, chance) in [
            ("SIM_ACTIVITY_CHANCE", self.population.activity_chance),
            ("SIM_LOGOUT_CHANCE", self.population.logout_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("Must be between 0 and 1, got {}", chance),
                });
            }
        }

        if self.brackets.random_bot_min_level == 0 {
            return Err(ConfigError::Invalid {
                var: "RANDOM_BOT_MIN_LEVEL".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Brackets(#[from] BracketsConfigError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
