//! Availability predicates.
//!
//! Pure, side-effect-free checks used by every mutation path; neither
//! the allocator nor the edit layer bypasses them. The predicates are
//! fail-closed: an unset lecturer or classroom reference is reported as
//! *not* free, forcing explicit assignment before placement.

use crate::error::{ConflictKind, EngineError};
use crate::models::{Day, Slot, Span, TimetableState};

/// Whether no session in the cell has this lecturer. `None` is never free.
pub fn lecturer_free(state: &TimetableState, day: Day, slot: Slot, lecturer: Option<&str>) -> bool {
    let Some(lecturer_id) = lecturer else {
        return false;
    };
    lecturer_free_except(state, day, slot, lecturer_id, None)
}

/// Whether no session in the cell has this classroom. `None` is never free.
pub fn classroom_free(state: &TimetableState, day: Day, slot: Slot, classroom: Option<&str>) -> bool {
    let Some(classroom_id) = classroom else {
        return false;
    };
    classroom_free_except(state, day, slot, classroom_id, None)
}

/// [`lecturer_free`] over every cell a span starting at `slot` would
/// occupy, short-circuiting on the first busy cell. A two-unit span
/// starting in the last slot has no valid companion and is never free.
pub fn lecturer_free_for_span(
    state: &TimetableState,
    day: Day,
    slot: Slot,
    span: Span,
    lecturer: Option<&str>,
) -> bool {
    if !lecturer_free(state, day, slot, lecturer) {
        return false;
    }
    match span {
        Span::One => true,
        Span::Two => slot
            .next()
            .is_some_and(|next| lecturer_free(state, day, next, lecturer)),
    }
}

/// [`classroom_free`] over every cell a span starting at `slot` would
/// occupy.
pub fn classroom_free_for_span(
    state: &TimetableState,
    day: Day,
    slot: Slot,
    span: Span,
    classroom: Option<&str>,
) -> bool {
    if !classroom_free(state, day, slot, classroom) {
        return false;
    }
    match span {
        Span::One => true,
        Span::Two => slot
            .next()
            .is_some_and(|next| classroom_free(state, day, next, classroom)),
    }
}

/// Ids of classrooms free across every cell of the span, in collection
/// order. The allocator picks uniformly among these.
pub fn free_classrooms(state: &TimetableState, day: Day, slot: Slot, span: Span) -> Vec<String> {
    state
        .classrooms
        .iter()
        .filter(|c| classroom_free_for_span(state, day, slot, span, Some(&c.id)))
        .map(|c| c.id.clone())
        .collect()
}

/// Validates that both the lecturer and the classroom are free in every
/// cell of the span, ignoring `except` (the session being moved, so a
/// relocation does not collide with its own current cells).
///
/// Checks cell by cell, lecturer before classroom, returning the first
/// conflict found.
pub(crate) fn check_span_free(
    state: &TimetableState,
    day: Day,
    slot: Slot,
    span: Span,
    lecturer_id: &str,
    classroom_id: &str,
    except: Option<&str>,
) -> Result<(), EngineError> {
    let mut cells = vec![slot];
    if span == Span::Two {
        if let Some(next) = slot.next() {
            cells.push(next);
        }
    }
    for cell in cells {
        if !lecturer_free_except(state, day, cell, lecturer_id, except) {
            return Err(EngineError::Conflict {
                kind: ConflictKind::Lecturer,
                holder: lecturer_id.to_string(),
                day,
                slot: cell,
            });
        }
        if !classroom_free_except(state, day, cell, classroom_id, except) {
            return Err(EngineError::Conflict {
                kind: ConflictKind::Classroom,
                holder: classroom_id.to_string(),
                day,
                slot: cell,
            });
        }
    }
    Ok(())
}

fn lecturer_free_except(
    state: &TimetableState,
    day: Day,
    slot: Slot,
    lecturer_id: &str,
    except: Option<&str>,
) -> bool {
    !state.grid.sessions_in(day, slot).any(|id| {
        except != Some(id)
            && state
                .session(id)
                .is_some_and(|s| s.lecturer_id.as_deref() == Some(lecturer_id))
    })
}

fn classroom_free_except(
    state: &TimetableState,
    day: Day,
    slot: Slot,
    classroom_id: &str,
    except: Option<&str>,
) -> bool {
    !state.grid.sessions_in(day, slot).any(|id| {
        except != Some(id)
            && state
                .session(id)
                .is_some_and(|s| s.classroom_id.as_deref() == Some(classroom_id))
    })
}
