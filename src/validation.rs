//! Loaded-state validation.
//!
//! Checks structural integrity of a [`TimetableState`] handed over by
//! the external store before the engine operates on it. Detects:
//! - Missing grid cells (the `MalformedGrid` precondition)
//! - Duplicate IDs
//! - Dangling lecturer/classroom references
//! - Grid ids without a matching session
//! - Span invariant violations (wrong cell count, non-adjacent cells,
//!   a two-unit session starting in the last slot)
//!
//! Loaders that prefer synthesis over failure can call [`repair_grid`]
//! first; [`ensure_complete`] is the fail-fast alternative.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::{Day, Grid, Slot, Span, TimetableState};

/// Validation result: all detected issues, or nothing.
pub type ValidationResult = Result<(), Vec<StateError>>;

/// A state integrity error.
#[derive(Debug, Clone, PartialEq)]
pub struct StateError {
    /// Error category.
    pub kind: StateErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of state integrity errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateErrorKind {
    /// One of the 5 × 4 fixed cells is absent from the grid.
    MissingCell,
    /// Two entities share the same ID.
    DuplicateId,
    /// A session references a lecturer that doesn't exist.
    DanglingLecturer,
    /// A session references a classroom that doesn't exist.
    DanglingClassroom,
    /// A grid cell holds an id with no matching session.
    OrphanPlacement,
    /// A placed session occupies the wrong cells for its span.
    SpanViolation,
}

impl StateError {
    fn new(kind: StateErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Fails fast with [`EngineError::MalformedGrid`] if any of the 20 fixed
/// cells is absent.
pub fn ensure_complete(grid: &Grid) -> Result<(), EngineError> {
    match grid.missing_cell() {
        Some((day, slot)) => Err(EngineError::MalformedGrid { day, slot }),
        None => Ok(()),
    }
}

/// Synthesizes empty cells for any missing day/slot pair; returns how
/// many were added. The loader's alternative to failing fast.
pub fn repair_grid(grid: &mut Grid) -> usize {
    grid.fill_missing_cells()
}

/// Validates a loaded state.
///
/// Collects every detected issue rather than stopping at the first, so
/// the caller can report them all at once.
pub fn validate_state(state: &TimetableState) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some((day, slot)) = state.grid.missing_cell() {
        errors.push(StateError::new(
            StateErrorKind::MissingCell,
            format!("Grid is missing the {day} {slot} cell"),
        ));
    }

    let mut session_ids = HashSet::new();
    for s in &state.sessions {
        if !session_ids.insert(s.id.as_str()) {
            errors.push(StateError::new(
                StateErrorKind::DuplicateId,
                format!("Duplicate session ID: {}", s.id),
            ));
        }
    }
    let mut lecturer_ids = HashSet::new();
    for l in &state.lecturers {
        if !lecturer_ids.insert(l.id.as_str()) {
            errors.push(StateError::new(
                StateErrorKind::DuplicateId,
                format!("Duplicate lecturer ID: {}", l.id),
            ));
        }
    }
    let mut classroom_ids = HashSet::new();
    for c in &state.classrooms {
        if !classroom_ids.insert(c.id.as_str()) {
            errors.push(StateError::new(
                StateErrorKind::DuplicateId,
                format!("Duplicate classroom ID: {}", c.id),
            ));
        }
    }

    for s in &state.sessions {
        if let Some(lecturer_id) = s.lecturer_id.as_deref() {
            if !lecturer_ids.contains(lecturer_id) {
                errors.push(StateError::new(
                    StateErrorKind::DanglingLecturer,
                    format!("Session '{}' references unknown lecturer '{lecturer_id}'", s.id),
                ));
            }
        }
        if let Some(classroom_id) = s.classroom_id.as_deref() {
            if !classroom_ids.contains(classroom_id) {
                errors.push(StateError::new(
                    StateErrorKind::DanglingClassroom,
                    format!("Session '{}' references unknown classroom '{classroom_id}'", s.id),
                ));
            }
        }
    }

    for day in Day::ALL {
        for slot in Slot::ALL {
            for id in state.grid.sessions_in(day, slot) {
                if !session_ids.contains(id) {
                    errors.push(StateError::new(
                        StateErrorKind::OrphanPlacement,
                        format!("Cell {day} {slot} holds unknown session '{id}'"),
                    ));
                }
            }
        }
    }

    for s in &state.sessions {
        check_span(state, &s.id, s.span, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that a session's grid footprint matches its span: the right
/// number of cells, adjacent within one day, not starting in the last
/// slot.
fn check_span(state: &TimetableState, session_id: &str, span: Span, errors: &mut Vec<StateError>) {
    let cells = state.grid.occupied_cells(session_id);
    if cells.is_empty() {
        return; // Unplaced is fine.
    }
    if cells.len() != span.units() as usize {
        errors.push(StateError::new(
            StateErrorKind::SpanViolation,
            format!(
                "Session '{session_id}' occupies {} cells but spans {} unit(s)",
                cells.len(),
                span.units()
            ),
        ));
        return;
    }
    if span == Span::Two {
        let (d1, s1) = cells[0];
        let (d2, s2) = cells[1];
        if d1 != d2 || s1.next() != Some(s2) {
            errors.push(StateError::new(
                StateErrorKind::SpanViolation,
                format!("Session '{session_id}' occupies non-adjacent cells"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Lecturer, Session};

    fn valid_state() -> TimetableState {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1"));
        state.add_classroom(Classroom::new("C1"));
        state.add_session(
            Session::new("S1", "MATH101")
                .with_lecturer("L1")
                .with_classroom("C1"),
        );
        state.add_session(
            Session::new("S2", "PHYS201")
                .with_span(Span::Two)
                .with_lecturer("L1")
                .with_classroom("C1"),
        );
        state
            .grid
            .place("S1", Day::Monday, Slot::EightToTen, Span::One)
            .unwrap();
        state
            .grid
            .place("S2", Day::Tuesday, Slot::OneToThree, Span::Two)
            .unwrap();
        state
    }

    #[test]
    fn test_valid_state() {
        assert!(validate_state(&valid_state()).is_ok());
    }

    #[test]
    fn test_missing_cell_detected() {
        let mut state = valid_state();
        state.grid = serde_json::from_str(r#"{"cells":{}}"#).unwrap();
        let errors = validate_state(&state).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == StateErrorKind::MissingCell));

        assert_eq!(
            ensure_complete(&state.grid),
            Err(EngineError::MalformedGrid {
                day: Day::Monday,
                slot: Slot::EightToTen,
            })
        );
        assert_eq!(repair_grid(&mut state.grid), 20);
        assert_eq!(ensure_complete(&state.grid), Ok(()));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut state = valid_state();
        state.add_session(Session::new("S1", "CHEM101"));
        state.add_lecturer(Lecturer::new("L1"));
        state.add_classroom(Classroom::new("C1"));
        let errors = validate_state(&state).unwrap_err();
        let duplicates = errors
            .iter()
            .filter(|e| e.kind == StateErrorKind::DuplicateId)
            .count();
        assert_eq!(duplicates, 3);
    }

    #[test]
    fn test_dangling_references() {
        let mut state = valid_state();
        state.add_session(
            Session::new("S3", "CHEM101")
                .with_lecturer("L9")
                .with_classroom("C9"),
        );
        let errors = validate_state(&state).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == StateErrorKind::DanglingLecturer));
        assert!(errors
            .iter()
            .any(|e| e.kind == StateErrorKind::DanglingClassroom));
    }

    #[test]
    fn test_orphan_placement() {
        let mut state = valid_state();
        state
            .grid
            .place("GHOST", Day::Friday, Slot::ThreeToFive, Span::One)
            .unwrap();
        let errors = validate_state(&state).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == StateErrorKind::OrphanPlacement));
    }

    #[test]
    fn test_span_cell_count_violation() {
        let mut state = valid_state();
        // A one-unit session smuggled into two non-adjacent cells.
        state
            .grid
            .place("S1", Day::Friday, Slot::EightToTen, Span::One)
            .unwrap();
        let errors = validate_state(&state).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == StateErrorKind::SpanViolation));
    }

    #[test]
    fn test_span_adjacency_violation() {
        let mut state = valid_state();
        state.grid.clear_session("S2");
        state
            .grid
            .place("S2", Day::Monday, Slot::TenToTwelve, Span::One)
            .unwrap();
        state
            .grid
            .place("S2", Day::Friday, Slot::TenToTwelve, Span::One)
            .unwrap();
        let errors = validate_state(&state).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == StateErrorKind::SpanViolation
                && e.message.contains("non-adjacent")));
    }
}
