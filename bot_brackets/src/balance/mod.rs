//! Population balancing.
//!
//! This module implements:
//! - Eligibility: protection checks (names, guilds, arena teams, groups, friends)
//! - Safety: whether a bot can be reset right now
//! - Scanner: occupancy per bracket for both factions
//! - Weighting: bracket percentages driven by where real players are
//! - Redistribution: queueing surplus bots for underfull brackets

pub mod eligibility;
pub mod redistribute;
pub mod safety;
pub mod scanner;
pub mod weighting;

pub use eligibility::{Eligibility, EligibilityContext, classify};
pub use redistribute::{RedistributionReport, desired_counts, enqueue_out_of_bracket, redistribute};
pub use safety::{UnsafeReason, is_safe_for_reset, safety_verdict};
pub use scanner::{BracketMembers, FactionScan, OutOfBracketBot, PopulationScan, scan_population};
pub use weighting::{WeightingMode, apply_dynamic_weights, bracket_weight, table_weights};
