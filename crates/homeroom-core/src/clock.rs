//! Clock abstraction and the morning/afternoon split.
//!
//! Categorization never reads the system clock directly; it takes a
//! snapshot through the [`Clock`] trait so tests can pin any instant.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Source of "now" for building evaluation snapshots.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a fixed instant, for tests and `--at` replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Half of the day, split at noon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
}

impl TimeOfDay {
    /// Classify an instant: hours 0-11 are morning, 12-23 afternoon.
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        if at.hour() < 12 {
            TimeOfDay::Morning
        } else {
            TimeOfDay::Afternoon
        }
    }

    /// Check if this is before noon.
    pub fn is_morning(&self) -> bool {
        matches!(self, TimeOfDay::Morning)
    }

    /// Check if this is noon or later.
    pub fn is_afternoon(&self) -> bool {
        matches!(self, TimeOfDay::Afternoon)
    }

    /// Get display name.
    pub fn name(&self) -> &str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
        }
    }
}
