//! Session model.
//!
//! A session is a single schedulable teaching unit: one module occurrence
//! with a fixed span of one or two adjacent grid cells. Its lecturer and
//! classroom references are nullable; the engine fills them during
//! generation and the edit layer requires both before placement.

use serde::{Deserialize, Serialize};

/// Number of adjacent cells a session occupies.
///
/// A `Two` span covers two adjacent slots of one day and may not start
/// in the day's last slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Span {
    One,
    Two,
}

impl Span {
    /// Duration in grid units (hours, for capacity accounting).
    pub fn units(self) -> u32 {
        match self {
            Span::One => 1,
            Span::Two => 2,
        }
    }
}

/// A schedulable teaching session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Module identity, used for distinct-module capacity counting.
    /// Two sessions of the same module cost a lecturer one module.
    pub module_code: String,
    /// Display name. Defaults to the module code.
    pub name: String,
    /// Cells occupied (1 or 2, adjacent within one day).
    pub span: Span,
    /// Assigned lecturer, if any.
    pub lecturer_id: Option<String>,
    /// Assigned classroom, if any.
    pub classroom_id: Option<String>,
    /// Cohort/intake tag, used for bulk locking.
    pub cohort: Option<String>,
}

impl Session {
    /// Creates a one-unit session with no assignments.
    pub fn new(id: impl Into<String>, module_code: impl Into<String>) -> Self {
        let module_code = module_code.into();
        Self {
            id: id.into(),
            name: module_code.clone(),
            module_code,
            span: Span::One,
            lecturer_id: None,
            classroom_id: None,
            cohort: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets the lecturer reference.
    pub fn with_lecturer(mut self, lecturer_id: impl Into<String>) -> Self {
        self.lecturer_id = Some(lecturer_id.into());
        self
    }

    /// Sets the classroom reference.
    pub fn with_classroom(mut self, classroom_id: impl Into<String>) -> Self {
        self.classroom_id = Some(classroom_id.into());
        self
    }

    /// Sets the cohort tag.
    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohort = Some(cohort.into());
        self
    }

    /// Whether both the lecturer and the classroom are assigned.
    pub fn is_fully_assigned(&self) -> bool {
        self.lecturer_id.is_some() && self.classroom_id.is_some()
    }
}
