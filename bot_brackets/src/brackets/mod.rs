//! Level brackets: configuration, per-faction tables and normalization.
//!
//! This module implements:
//! - LevelRange: inclusive level bounds with a desired share of bots
//! - BracketTable: the ordered ranges for one faction
//! - Brackets: both faction tables clamped to the global bot level bounds
//! - BracketsConfig: JSON/environment configuration with fatal validation
//!
//! ## Normalization
//!
//! After clamping to the global bounds, inverted ranges are inert and hold
//! no share. The active shares are then moved one point at a time, in index
//! order, until they sum to exactly 100.
//!
//! ## Example
//!
//! ```
//! use bot_brackets::brackets::{Brackets, BracketsConfig};
//! use bot_brackets::host::Faction;
//!
//! let brackets = Brackets::from_config(&BracketsConfig::default()).unwrap();
//! assert_eq!(brackets.num_ranges(), 9);
//! assert_eq!(brackets.index_of(42, Faction::Horde), Some(4));
//! assert_eq!(brackets.table(Faction::Horde).active_percent_sum(), 100);
//! ```

pub mod config;
pub mod errors;
pub mod range;
pub mod table;

pub use config::{BracketsConfig, DEFAULT_NUM_RANGES, DynamicDistributionConfig};
pub use errors::{ConfigError, ConfigResult};
pub use range::LevelRange;
pub use table::{BracketTable, Brackets};
