//! Manual mutation layer.
//!
//! Validated single-session operations outside full regeneration. Every
//! operation validates through the conflict checker and capacity model
//! before touching the grid, so a rejected edit leaves the state exactly
//! as it was. Sessions in a locked cohort are rejected up front.

use tracing::debug;

use crate::capacity;
use crate::conflict;
use crate::error::{CapKind, EngineError};
use crate::models::{Day, Slot, Span, TimetableState};

/// Places an unplaced session into a cell.
///
/// The session must have a lecturer and a classroom assigned
/// ([`EngineError::MissingAssignment`]); a two-unit session may not start
/// in the last slot ([`EngineError::InvalidSpan`]); both resources must
/// be free across the span ([`EngineError::Conflict`]); and the
/// lecturer's caps must hold ([`EngineError::CapacityExceeded`]).
pub fn add_to_cell(
    state: &mut TimetableState,
    day: Day,
    slot: Slot,
    session_id: &str,
) -> Result<(), EngineError> {
    let session = state
        .session(session_id)
        .ok_or_else(|| EngineError::UnknownSession(session_id.to_string()))?;
    reject_locked(state, session_id)?;
    if state.grid.is_placed(session_id) {
        return Err(EngineError::AlreadyPlaced(session_id.to_string()));
    }
    let (Some(lecturer_id), Some(classroom_id)) =
        (session.lecturer_id.clone(), session.classroom_id.clone())
    else {
        return Err(EngineError::MissingAssignment(session_id.to_string()));
    };
    let span = session.span;
    if span == Span::Two && slot.is_last() {
        return Err(EngineError::InvalidSpan { day, slot });
    }

    conflict::check_span_free(state, day, slot, span, &lecturer_id, &classroom_id, None)?;
    capacity::check_caps(state, &lecturer_id)?;

    state.grid.place(session_id, day, slot, span)?;
    debug!(session = %session_id, %day, %slot, "added to cell");
    Ok(())
}

/// Removes a session from a cell (and its span companion).
///
/// Idempotent: removing an absent or unknown session is a no-op. Only a
/// locked cohort is rejected.
pub fn remove_from_cell(
    state: &mut TimetableState,
    day: Day,
    slot: Slot,
    session_id: &str,
) -> Result<(), EngineError> {
    let Some(session) = state.session(session_id) else {
        return Ok(());
    };
    reject_locked(state, session_id)?;
    let span = session.span;
    state.grid.remove(session_id, day, slot, span);
    debug!(session = %session_id, %day, %slot, "removed from cell");
    Ok(())
}

/// Moves a placed session to another cell, all-or-nothing.
///
/// The target is validated exactly as [`add_to_cell`] (using the
/// session's current lecturer and classroom, and ignoring the session's
/// own current cells); only then is the source cleared and the target
/// committed. A rejected move leaves the original placement untouched.
pub fn relocate(
    state: &mut TimetableState,
    session_id: &str,
    from_day: Day,
    from_slot: Slot,
    to_day: Day,
    to_slot: Slot,
) -> Result<(), EngineError> {
    let session = state
        .session(session_id)
        .ok_or_else(|| EngineError::UnknownSession(session_id.to_string()))?;
    reject_locked(state, session_id)?;
    if !state.grid.contains(from_day, from_slot, session_id) {
        return Err(EngineError::NotPlaced(session_id.to_string()));
    }
    let (Some(lecturer_id), Some(classroom_id)) =
        (session.lecturer_id.clone(), session.classroom_id.clone())
    else {
        return Err(EngineError::MissingAssignment(session_id.to_string()));
    };
    let span = session.span;
    if span == Span::Two && to_slot.is_last() {
        return Err(EngineError::InvalidSpan {
            day: to_day,
            slot: to_slot,
        });
    }

    conflict::check_span_free(
        state,
        to_day,
        to_slot,
        span,
        &lecturer_id,
        &classroom_id,
        Some(session_id),
    )?;
    capacity::check_caps(state, &lecturer_id)?;

    state.grid.remove(session_id, from_day, from_slot, span);
    if let Err(err) = state.grid.place(session_id, to_day, to_slot, span) {
        // Validation makes this unreachable; restore the source placement
        // rather than trusting that.
        let _ = state.grid.place(session_id, from_day, from_slot, span);
        return Err(err);
    }
    debug!(session = %session_id, %to_day, %to_slot, "relocated");
    Ok(())
}

/// Changes or clears a session's lecturer reference.
///
/// A placed session is unplaced first, so the grid can never hold a
/// placement validated against a previous lecturer; the caller re-places
/// through [`add_to_cell`]. The new lecturer's caps are checked before
/// anything changes.
pub fn assign_lecturer(
    state: &mut TimetableState,
    session_id: &str,
    lecturer_id: Option<&str>,
) -> Result<(), EngineError> {
    let session = state
        .session(session_id)
        .ok_or_else(|| EngineError::UnknownSession(session_id.to_string()))?
        .clone();
    reject_locked(state, session_id)?;
    if session.lecturer_id.as_deref() == lecturer_id {
        return Ok(());
    }

    if let Some(new_id) = lecturer_id {
        let lecturer = state
            .lecturer(new_id)
            .ok_or_else(|| EngineError::UnknownLecturer(new_id.to_string()))?;
        if !capacity::hours_capacity_ok(state, lecturer, &session) {
            return Err(EngineError::CapacityExceeded {
                lecturer: new_id.to_string(),
                cap: CapKind::WeeklyHours,
                limit: lecturer.max_weekly_hours,
            });
        }
        if !capacity::module_capacity_ok(state, lecturer, &session) {
            return Err(EngineError::CapacityExceeded {
                lecturer: new_id.to_string(),
                cap: CapKind::DistinctModules,
                limit: lecturer.max_distinct_modules,
            });
        }
    }

    unplace_if_needed(state, session_id);
    if let Some(s) = state.session_mut(session_id) {
        s.lecturer_id = lecturer_id.map(ToString::to_string);
    }
    Ok(())
}

/// Changes or clears a session's classroom reference, unplacing the
/// session first if it is in the grid.
pub fn assign_classroom(
    state: &mut TimetableState,
    session_id: &str,
    classroom_id: Option<&str>,
) -> Result<(), EngineError> {
    let current = state
        .session(session_id)
        .ok_or_else(|| EngineError::UnknownSession(session_id.to_string()))?
        .classroom_id
        .clone();
    reject_locked(state, session_id)?;
    if current.as_deref() == classroom_id {
        return Ok(());
    }

    if let Some(new_id) = classroom_id {
        if state.classroom(new_id).is_none() {
            return Err(EngineError::UnknownClassroom(new_id.to_string()));
        }
    }

    unplace_if_needed(state, session_id);
    if let Some(s) = state.session_mut(session_id) {
        s.classroom_id = classroom_id.map(ToString::to_string);
    }
    Ok(())
}

fn reject_locked(state: &TimetableState, session_id: &str) -> Result<(), EngineError> {
    let Some(session) = state.session(session_id) else {
        return Ok(());
    };
    match session.cohort.as_deref() {
        Some(cohort) if state.is_cohort_locked(cohort) => {
            Err(EngineError::CohortLocked(cohort.to_string()))
        }
        _ => Ok(()),
    }
}

fn unplace_if_needed(state: &mut TimetableState, session_id: &str) {
    if state.grid.is_placed(session_id) {
        state.grid.clear_session(session_id);
        debug!(session = %session_id, "unplaced on reassignment");
    }
}
