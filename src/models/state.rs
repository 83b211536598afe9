//! Shared timetable state.
//!
//! The explicit state object passed by reference to every engine
//! operation — no ambient globals. Holds the session, lecturer, and
//! classroom collections, the grid, and the per-cohort lock flags.
//! Serializing and reloading this value is the entire persistence
//! surface: the external store hands a `TimetableState` in on load and
//! receives the full updated value after every successful mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Classroom, Grid, Lecturer, Session};

/// The full mutable state of the timetabling engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableState {
    /// All known sessions.
    pub sessions: Vec<Session>,
    /// All known lecturers.
    pub lecturers: Vec<Lecturer>,
    /// All known classrooms.
    pub classrooms: Vec<Classroom>,
    /// The weekly placement grid.
    pub grid: Grid,
    /// Cohort tags excluded from regeneration and manual mutation.
    pub locked_cohorts: BTreeSet<String>,
}

impl TimetableState {
    /// Creates an empty state with a complete grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a session by id.
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Looks up a session by id, mutably.
    pub fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Looks up a lecturer by id.
    pub fn lecturer(&self, id: &str) -> Option<&Lecturer> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    /// Looks up a classroom by id.
    pub fn classroom(&self, id: &str) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| c.id == id)
    }

    /// Adds a session.
    pub fn add_session(&mut self, session: Session) {
        self.sessions.push(session);
    }

    /// Adds a lecturer.
    pub fn add_lecturer(&mut self, lecturer: Lecturer) {
        self.lecturers.push(lecturer);
    }

    /// Adds a classroom.
    pub fn add_classroom(&mut self, classroom: Classroom) {
        self.classrooms.push(classroom);
    }

    /// Deletes a session; it is removed from every grid cell it occupies.
    pub fn remove_session(&mut self, id: &str) {
        self.grid.clear_session(id);
        self.sessions.retain(|s| s.id != id);
    }

    /// Deletes a lecturer; sessions referencing it have the reference
    /// cleared, not the session deleted.
    pub fn remove_lecturer(&mut self, id: &str) {
        self.lecturers.retain(|l| l.id != id);
        for session in &mut self.sessions {
            if session.lecturer_id.as_deref() == Some(id) {
                session.lecturer_id = None;
            }
        }
    }

    /// Deletes a classroom; sessions referencing it have the reference
    /// cleared.
    pub fn remove_classroom(&mut self, id: &str) {
        self.classrooms.retain(|c| c.id != id);
        for session in &mut self.sessions {
            if session.classroom_id.as_deref() == Some(id) {
                session.classroom_id = None;
            }
        }
    }

    /// Locks a cohort against regeneration and manual mutation.
    pub fn lock_cohort(&mut self, cohort: impl Into<String>) {
        self.locked_cohorts.insert(cohort.into());
    }

    /// Unlocks a cohort.
    pub fn unlock_cohort(&mut self, cohort: &str) {
        self.locked_cohorts.remove(cohort);
    }

    /// Whether a cohort tag is locked.
    pub fn is_cohort_locked(&self, cohort: &str) -> bool {
        self.locked_cohorts.contains(cohort)
    }

    /// Whether a session belongs to a locked cohort. Untagged sessions
    /// are never locked.
    pub fn is_session_locked(&self, session: &Session) -> bool {
        session
            .cohort
            .as_deref()
            .is_some_and(|cohort| self.is_cohort_locked(cohort))
    }
}
