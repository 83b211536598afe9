//! Derived lecturer load.
//!
//! Weekly hours and distinct-module counts are always recomputed from
//! the session collection; nothing here is cached, so the numbers cannot
//! drift from the placements. A session counts from the moment its
//! lecturer reference is set — placed or still pending placement — and
//! counts once regardless of how many cells it occupies.

use std::collections::BTreeSet;

use crate::error::{CapKind, EngineError};
use crate::models::{Lecturer, Session, TimetableState};

/// Summed span units over the distinct sessions assigned to a lecturer.
pub fn weekly_hours(state: &TimetableState, lecturer_id: &str) -> u32 {
    assigned_sessions(state, lecturer_id)
        .map(|s| s.span.units())
        .sum()
}

/// Number of unique module identities among a lecturer's sessions.
pub fn distinct_modules(state: &TimetableState, lecturer_id: &str) -> usize {
    assigned_sessions(state, lecturer_id)
        .map(|s| s.module_code.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Whether assigning `session` would keep the lecturer inside the
/// weekly-hour cap. Assumes the session is not yet assigned to this
/// lecturer.
pub fn hours_capacity_ok(state: &TimetableState, lecturer: &Lecturer, session: &Session) -> bool {
    weekly_hours(state, &lecturer.id) + session.span.units() <= lecturer.max_weekly_hours
}

/// Whether assigning `session` would keep the lecturer inside the
/// distinct-module cap. Repeats of a module the lecturer already
/// teaches cost nothing.
pub fn module_capacity_ok(state: &TimetableState, lecturer: &Lecturer, session: &Session) -> bool {
    let already_teaches = assigned_sessions(state, &lecturer.id)
        .any(|s| s.module_code == session.module_code);
    already_teaches
        || distinct_modules(state, &lecturer.id) < lecturer.max_distinct_modules as usize
}

/// Whether the lecturer can take `session` without breaching either cap.
pub fn has_capacity_for(state: &TimetableState, lecturer: &Lecturer, session: &Session) -> bool {
    hours_capacity_ok(state, lecturer, session) && module_capacity_ok(state, lecturer, session)
}

/// Re-checks both caps against the lecturer's current assignments.
///
/// Used by mutation paths to enforce the caps as invariants rather than
/// trusting that earlier assignment-time checks still hold. A dangling
/// lecturer id passes; dangling references are the validation module's
/// concern.
pub fn check_caps(state: &TimetableState, lecturer_id: &str) -> Result<(), EngineError> {
    let Some(lecturer) = state.lecturer(lecturer_id) else {
        return Ok(());
    };
    if weekly_hours(state, lecturer_id) > lecturer.max_weekly_hours {
        return Err(EngineError::CapacityExceeded {
            lecturer: lecturer_id.to_string(),
            cap: CapKind::WeeklyHours,
            limit: lecturer.max_weekly_hours,
        });
    }
    if distinct_modules(state, lecturer_id) > lecturer.max_distinct_modules as usize {
        return Err(EngineError::CapacityExceeded {
            lecturer: lecturer_id.to_string(),
            cap: CapKind::DistinctModules,
            limit: lecturer.max_distinct_modules,
        });
    }
    Ok(())
}

fn assigned_sessions<'a>(
    state: &'a TimetableState,
    lecturer_id: &'a str,
) -> impl Iterator<Item = &'a Session> + 'a {
    state
        .sessions
        .iter()
        .filter(move |s| s.lecturer_id.as_deref() == Some(lecturer_id))
}
