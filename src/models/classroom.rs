//! Classroom model.
//!
//! No capacity attributes beyond "one session at a time", which the
//! conflict checker enforces.

use serde::{Deserialize, Serialize};

/// A classroom that can host sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
