//! A single level bracket.

use crate::host::Level;
use serde::{Deserialize, Serialize};

/// Inclusive level range with the share of bots it should hold.
///
/// A range with `lower > upper` is inert: it matches no level and its
/// desired share is forced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    /// Lower bound (inclusive)
    pub lower: Level,

    /// Upper bound (inclusive)
    pub upper: Level,

    /// Desired percentage of the faction's bots (0-100)
    #[serde(alias = "pct")]
    pub desired_percent: u8,
}

impl LevelRange {
    pub fn new(lower: Level, upper: Level, desired_percent: u8) -> Self {
        Self {
            lower,
            upper,
            desired_percent,
        }
    }

    /// Bounds are not inverted
    pub fn is_active(&self) -> bool {
        self.lower <= self.upper
    }

    /// Level falls inside the bounds
    pub fn contains(&self, level: Level) -> bool {
        self.is_active() && level >= self.lower && level <= self.upper
    }

    /// Levels between `level` and the closest edge of the range, 0 inside it
    pub fn distance_to(&self, level: Level) -> u8 {
        if level < self.lower {
            self.lower - level
        } else if level > self.upper {
            level - self.upper
        } else {
            0
        }
    }

    /// Pull the bounds into `[min, max]`; inverted results lose their share
    pub fn clamp_to(&mut self, min: Level, max: Level) {
        if self.lower < min {
            self.lower = min;
        }
        if self.upper > max {
            self.upper = max;
        }
        if !self.is_active() {
            self.desired_percent = 0;
        }
    }

    /// Same bounds, ignoring the share
    pub fn same_bounds(&self, other: &LevelRange) -> bool {
        self.lower == other.lower && self.upper == other.upper
    }
}

impl std::fmt::Display for LevelRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = LevelRange::new(10, 19, 11);
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(9));
        assert!(!range.contains(20));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let range = LevelRange::new(30, 20, 11);
        assert!(!range.is_active());
        assert!(!range.contains(25));
        assert!(!range.contains(30));
    }

    #[test]
    fn test_distance_to() {
        let range = LevelRange::new(40, 49, 10);
        assert_eq!(range.distance_to(45), 0);
        assert_eq!(range.distance_to(35), 5);
        assert_eq!(range.distance_to(52), 3);
    }

    #[test]
    fn test_clamp_inverts_and_zeroes() {
        let mut range = LevelRange::new(75, 90, 20);
        range.clamp_to(1, 70);
        assert_eq!(range.lower, 75);
        assert_eq!(range.upper, 70);
        assert_eq!(range.desired_percent, 0);
    }

    #[test]
    fn test_clamp_keeps_valid_range() {
        let mut range = LevelRange::new(0, 85, 20);
        range.clamp_to(1, 80);
        assert_eq!(range, LevelRange::new(1, 80, 20));
    }
}
