//! Lecturer model.
//!
//! Capacity caps live here; the actual load is always derived from the
//! session collection (see the `capacity` module), never cached on the
//! lecturer.

use serde::{Deserialize, Serialize};

/// Default cap on distinct modules per lecturer.
pub const DEFAULT_MAX_DISTINCT_MODULES: u32 = 4;

/// Default cap on weekly hours per lecturer (a full 5 × 4 week).
pub const DEFAULT_MAX_WEEKLY_HOURS: u32 = 20;

/// A lecturer who can be assigned to sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Cap on the number of unique modules across the week.
    pub max_distinct_modules: u32,
    /// Cap on summed session units across the week.
    pub max_weekly_hours: u32,
}

impl Lecturer {
    /// Creates a lecturer with default caps.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            max_distinct_modules: DEFAULT_MAX_DISTINCT_MODULES,
            max_weekly_hours: DEFAULT_MAX_WEEKLY_HOURS,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the distinct-module cap.
    pub fn with_max_modules(mut self, max_distinct_modules: u32) -> Self {
        self.max_distinct_modules = max_distinct_modules;
        self
    }

    /// Sets the weekly-hour cap.
    pub fn with_max_hours(mut self, max_weekly_hours: u32) -> Self {
        self.max_weekly_hours = max_weekly_hours;
        self
    }
}
