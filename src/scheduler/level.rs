//! Poll level controller.
//!
//! # States
//! ```text
//! min ... max, higher = more urgent
//! up():   saturating +1 after an unhealthy or failed poll
//! down(): saturating -1 after a healthy poll
//! ```

use std::time::Duration;

use crate::config::PollingConfig;

/// Bounded urgency level for one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollLevel {
    min: u8,
    max: u8,
    value: u8,
}

impl PollLevel {
    /// Create a level. Panics if `min > max` or `value` is outside `[min, max]`.
    pub fn new(min: u8, max: u8, value: u8) -> Self {
        assert!(min <= max, "poll level min {min} is greater than max {max}");
        assert!(value >= min, "poll level {value} is less than min {min}");
        assert!(value <= max, "poll level {value} is greater than max {max}");
        Self { min, max, value }
    }

    /// Poll more urgently. Unchanged at `max`.
    #[must_use]
    pub fn up(self) -> Self {
        if self.value >= self.max {
            return self;
        }
        Self {
            value: self.value + 1,
            ..self
        }
    }

    /// Poll less urgently. Unchanged at `min`.
    #[must_use]
    pub fn down(self) -> Self {
        if self.value <= self.min {
            return self;
        }
        Self {
            value: self.value - 1,
            ..self
        }
    }

    /// Level after a poll cycle with the given outcome.
    #[must_use]
    pub fn after_poll(self, healthy: bool) -> Self {
        if healthy {
            self.down()
        } else {
            self.up()
        }
    }

    pub fn value(self) -> u8 {
        self.value
    }

    pub fn min(self) -> u8 {
        self.min
    }

    pub fn max(self) -> u8 {
        self.max
    }
}

/// Maps poll levels to re-poll intervals; index = level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelIntervals {
    intervals: Vec<Duration>,
}

impl LevelIntervals {
    /// Panics on an empty list or more than 256 levels.
    pub fn new(intervals: Vec<Duration>) -> Self {
        assert!(!intervals.is_empty(), "at least one poll interval is required");
        assert!(intervals.len() <= usize::from(u8::MAX) + 1, "too many poll levels");
        Self { intervals }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.level_intervals())
    }

    pub fn max_level(&self) -> u8 {
        (self.intervals.len() - 1) as u8
    }

    /// Newly watched clusters start at the most urgent level.
    pub fn initial_level(&self) -> PollLevel {
        PollLevel::new(0, self.max_level(), self.max_level())
    }

    pub fn interval_for(&self, level: PollLevel) -> Duration {
        let index = usize::from(level.value()).min(self.intervals.len() - 1);
        self.intervals[index]
    }
}

impl Default for LevelIntervals {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}
