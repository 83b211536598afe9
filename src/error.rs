//! Engine error types.
//!
//! Two families share one enum. Structural errors (`InvalidSpan`,
//! `MalformedGrid`) mean the call itself was ill-formed and surface
//! immediately. The rest (`Conflict`, `MissingAssignment`,
//! `CapacityExceeded`, the placement-state preconditions) are expected
//! outcomes of manual editing: the caller shows them and lets the user
//! retry.

use std::fmt;

use thiserror::Error;

use crate::models::{Day, Slot};

/// Errors produced by grid mutations, manual edits, and state loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A two-unit session was asked to start in the last slot of a day.
    #[error("a two-unit session cannot start in the last slot ({day} {slot})")]
    InvalidSpan { day: Day, slot: Slot },

    /// The session has no lecturer or classroom assigned yet.
    #[error("session '{0}' needs a lecturer and a classroom before placement")]
    MissingAssignment(String),

    /// The lecturer or classroom is already occupied in a required cell.
    #[error("{kind} '{holder}' is already occupied at {day} {slot}")]
    Conflict {
        kind: ConflictKind,
        holder: String,
        day: Day,
        slot: Slot,
    },

    /// Committing would push the lecturer past one of its caps.
    #[error("lecturer '{lecturer}' would exceed {cap} ({limit})")]
    CapacityExceeded {
        lecturer: String,
        cap: CapKind,
        limit: u32,
    },

    /// A loaded grid is missing one of the 5 × 4 fixed cells.
    #[error("grid is missing the {day} {slot} cell")]
    MalformedGrid { day: Day, slot: Slot },

    /// No session with this id exists in the state.
    #[error("session '{0}' does not exist")]
    UnknownSession(String),

    /// No lecturer with this id exists in the state.
    #[error("lecturer '{0}' does not exist")]
    UnknownLecturer(String),

    /// No classroom with this id exists in the state.
    #[error("classroom '{0}' does not exist")]
    UnknownClassroom(String),

    /// The session's cohort is locked against mutation.
    #[error("cohort '{0}' is locked")]
    CohortLocked(String),

    /// The session already occupies grid cells.
    #[error("session '{0}' is already placed in the grid")]
    AlreadyPlaced(String),

    /// The session does not occupy the named source cell.
    #[error("session '{0}' is not placed at the given cell")]
    NotPlaced(String),
}

/// Which resource a [`EngineError::Conflict`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Lecturer,
    Classroom,
}

/// Which cap a [`EngineError::CapacityExceeded`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapKind {
    WeeklyHours,
    DistinctModules,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lecturer => write!(f, "lecturer"),
            Self::Classroom => write!(f, "classroom"),
        }
    }
}

impl fmt::Display for CapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeeklyHours => write!(f, "its weekly-hour cap"),
            Self::DistinctModules => write!(f, "its distinct-module cap"),
        }
    }
}
