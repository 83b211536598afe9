//! Automatic timetable generation.
//!
//! # Algorithm
//!
//! 1. Reset grid cells and session assignments for every unlocked session.
//! 2. Order unplaced sessions largest-first (two-unit sessions are harder
//!    to place, so they go early).
//! 3. Assign each session the least-loaded lecturer with capacity.
//! 4. Place each assigned session by bounded randomized trials: uniform
//!    random day and slot, conflict checks, then a uniform random pick
//!    among the classrooms free across the span.
//!
//! Infeasibility is never a fatal error. Each failed session becomes an
//! entry in the [`AllocationReport`] and the run continues; the caller
//! decides how to surface the report.
//!
//! # Complexity
//! O(sessions × (lecturers + trials × classrooms)) with a fixed trial
//! bound, so linear in the number of sessions.

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::capacity;
use crate::conflict;
use crate::models::{Day, Slot, Span, TimetableState};

/// Randomized placement trials per session.
pub const DEFAULT_TRIAL_BOUND: usize = 400;

/// Why a session could not be given a lecturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentFailure {
    /// No lecturer has room for another distinct module.
    ModuleCapacity,
    /// Every lecturer with module capacity would exceed its weekly-hour cap.
    WeeklyHours,
}

/// A session left without a lecturer during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentProblem {
    pub session_id: String,
    pub session_name: String,
    pub reason: AssignmentFailure,
}

/// A session whose placement trials were exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementProblem {
    pub session_id: String,
    pub session_name: String,
    /// Duration in grid units, for the notifier's message.
    pub units: u32,
}

/// Outcome of a generation run: the partial-failure diagnostics.
///
/// The grid and session state are updated in place; this report only
/// carries what could *not* be done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Sessions left without a lecturer, in scheduling order.
    pub assignment_problems: Vec<AssignmentProblem>,
    /// Sessions left unplaced, in scheduling order.
    pub placement_problems: Vec<PlacementProblem>,
}

impl AllocationReport {
    /// Whether every session was assigned and placed.
    pub fn is_clean(&self) -> bool {
        self.assignment_problems.is_empty() && self.placement_problems.is_empty()
    }

    /// Total number of recorded problems.
    pub fn problem_count(&self) -> usize {
        self.assignment_problems.len() + self.placement_problems.len()
    }

    /// Human-readable problem list for the notifier, assignment problems
    /// first, each group in recorded order.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.problem_count());
        for p in &self.assignment_problems {
            let reason = match p.reason {
                AssignmentFailure::ModuleCapacity => {
                    "every lecturer is at its distinct-module cap"
                }
                AssignmentFailure::WeeklyHours => {
                    "every eligible lecturer would exceed its weekly-hour cap"
                }
            };
            out.push(format!(
                "No lecturer available for '{}': {reason}",
                p.session_name
            ));
        }
        for p in &self.placement_problems {
            out.push(format!(
                "Could not place '{}' ({}h) within the trial bound",
                p.session_name, p.units
            ));
        }
        out
    }
}

/// The scheduling algorithm: resets non-locked state, assigns lecturers,
/// then places sessions via bounded randomized search.
///
/// The random source is injected so tests can run deterministic
/// sequences.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use timetabler::allocator::Allocator;
/// use timetabler::models::{Classroom, Lecturer, Session, TimetableState};
///
/// let mut state = TimetableState::new();
/// state.add_session(Session::new("S1", "MATH101"));
/// state.add_lecturer(Lecturer::new("L1").with_name("Dr. Ada"));
/// state.add_classroom(Classroom::new("C1"));
///
/// let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(7));
/// assert!(report.is_clean());
/// assert!(state.grid.is_placed("S1"));
/// ```
#[derive(Debug, Clone)]
pub struct Allocator {
    trial_bound: usize,
}

impl Allocator {
    /// Creates an allocator with the default trial bound.
    pub fn new() -> Self {
        Self {
            trial_bound: DEFAULT_TRIAL_BOUND,
        }
    }

    /// Overrides the placement trial bound.
    pub fn with_trial_bound(mut self, trial_bound: usize) -> Self {
        self.trial_bound = trial_bound;
        self
    }

    /// Regenerates the timetable for all unlocked sessions.
    ///
    /// Locked-cohort sessions keep their assignments and placements and
    /// constrain everything scheduled around them.
    pub fn generate<R: Rng>(&self, state: &mut TimetableState, rng: &mut R) -> AllocationReport {
        let mut report = AllocationReport::default();

        self.reset_unlocked(state);
        let order = self.placement_order(state);
        debug!(sessions = order.len(), "starting generation");

        self.assign_lecturers(state, &order, &mut report);
        self.place_sessions(state, &order, rng, &mut report);

        if !report.is_clean() {
            warn!(problems = report.problem_count(), "generation finished with problems");
        }
        report
    }

    /// Clears placements and assignments for every session outside a
    /// locked cohort.
    fn reset_unlocked(&self, state: &mut TimetableState) {
        let locked: BTreeSet<String> = state
            .sessions
            .iter()
            .filter(|s| state.is_session_locked(s))
            .map(|s| s.id.clone())
            .collect();
        state.grid.reset(|id| locked.contains(id));
        for session in &mut state.sessions {
            if !locked.contains(&session.id) {
                session.lecturer_id = None;
                session.classroom_id = None;
            }
        }
    }

    /// Unlocked session ids, two-unit sessions first (largest-first
    /// packing), otherwise in collection order.
    fn placement_order(&self, state: &TimetableState) -> Vec<String> {
        let mut ids: Vec<(String, u32)> = state
            .sessions
            .iter()
            .filter(|s| !state.is_session_locked(s))
            .map(|s| (s.id.clone(), s.span.units()))
            .collect();
        ids.sort_by_key(|(_, units)| std::cmp::Reverse(*units));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    fn assign_lecturers(
        &self,
        state: &mut TimetableState,
        order: &[String],
        report: &mut AllocationReport,
    ) {
        for id in order {
            let Some(session) = state.session(id).cloned() else {
                continue;
            };
            let chosen = state
                .lecturers
                .iter()
                .filter(|l| capacity::has_capacity_for(state, l, &session))
                .min_by_key(|l| capacity::weekly_hours(state, &l.id))
                .map(|l| l.id.clone());

            match chosen {
                Some(lecturer_id) => {
                    debug!(session = %id, lecturer = %lecturer_id, "assigned lecturer");
                    if let Some(s) = state.session_mut(id) {
                        s.lecturer_id = Some(lecturer_id);
                    }
                }
                None => {
                    // A lecturer with module capacity exists but is out of
                    // hours; otherwise the module caps themselves are full.
                    let eligible_exists = state
                        .lecturers
                        .iter()
                        .any(|l| capacity::module_capacity_ok(state, l, &session));
                    let reason = if eligible_exists {
                        AssignmentFailure::WeeklyHours
                    } else {
                        AssignmentFailure::ModuleCapacity
                    };
                    warn!(session = %id, ?reason, "no lecturer available");
                    report.assignment_problems.push(AssignmentProblem {
                        session_id: session.id,
                        session_name: session.name,
                        reason,
                    });
                }
            }
        }
    }

    fn place_sessions<R: Rng>(
        &self,
        state: &mut TimetableState,
        order: &[String],
        rng: &mut R,
        report: &mut AllocationReport,
    ) {
        for id in order {
            let Some(session) = state.session(id).cloned() else {
                continue;
            };
            // Sessions without a lecturer were already reported.
            let Some(lecturer_id) = session.lecturer_id.clone() else {
                continue;
            };
            let span = session.span;

            let mut placed = false;
            for _ in 0..self.trial_bound {
                let day = Day::ALL[rng.random_range(0..Day::ALL.len())];
                let slot = Slot::ALL[rng.random_range(0..Slot::ALL.len())];
                if span == Span::Two && slot.is_last() {
                    continue;
                }
                if !conflict::lecturer_free_for_span(state, day, slot, span, Some(&lecturer_id)) {
                    continue;
                }
                let rooms = conflict::free_classrooms(state, day, slot, span);
                let Some(room) = rooms.choose(rng) else {
                    continue;
                };
                if state.grid.place(id, day, slot, span).is_err() {
                    continue;
                }
                if let Some(s) = state.session_mut(id) {
                    s.classroom_id = Some(room.clone());
                }
                debug!(session = %id, %day, %slot, classroom = %room, "placed session");
                placed = true;
                break;
            }

            if !placed {
                warn!(session = %id, "placement trials exhausted");
                report.placement_problems.push(PlacementProblem {
                    session_id: session.id,
                    session_name: session.name,
                    units: span.units(),
                });
            }
        }
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Lecturer, Session};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// No two sessions in a cell share a non-null lecturer or classroom.
    fn assert_no_cell_conflicts(state: &TimetableState) {
        for day in Day::ALL {
            for slot in Slot::ALL {
                let ids: Vec<&str> = state.grid.sessions_in(day, slot).collect();
                for (i, a) in ids.iter().enumerate() {
                    for b in &ids[i + 1..] {
                        let sa = state.session(a).unwrap();
                        let sb = state.session(b).unwrap();
                        if sa.lecturer_id.is_some() {
                            assert_ne!(sa.lecturer_id, sb.lecturer_id, "{day} {slot}");
                        }
                        if sa.classroom_id.is_some() {
                            assert_ne!(sa.classroom_id, sb.classroom_id, "{day} {slot}");
                        }
                    }
                }
            }
        }
    }

    /// Every placed session occupies exactly `units` cells; two-unit
    /// sessions sit in adjacent slots of one day, never starting last.
    fn assert_span_invariant(state: &TimetableState) {
        for session in &state.sessions {
            let cells = state.grid.occupied_cells(&session.id);
            if cells.is_empty() {
                continue;
            }
            assert_eq!(cells.len(), session.span.units() as usize, "{}", session.id);
            if session.span == Span::Two {
                let (d1, s1) = cells[0];
                let (d2, s2) = cells[1];
                assert_eq!(d1, d2);
                assert_eq!(s1.next(), Some(s2));
                assert!(!s1.is_last());
            }
        }
    }

    fn assert_caps_respected(state: &TimetableState) {
        for lecturer in &state.lecturers {
            assert!(capacity::weekly_hours(state, &lecturer.id) <= lecturer.max_weekly_hours);
            assert!(
                capacity::distinct_modules(state, &lecturer.id)
                    <= lecturer.max_distinct_modules as usize
            );
        }
    }

    fn roomy_state() -> TimetableState {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1"));
        state.add_lecturer(Lecturer::new("L2"));
        state.add_lecturer(Lecturer::new("L3"));
        state.add_classroom(Classroom::new("C1"));
        state.add_classroom(Classroom::new("C2"));
        state.add_session(Session::new("S1", "MATH101"));
        state.add_session(Session::new("S2", "PHYS201").with_span(Span::Two));
        state.add_session(Session::new("S3", "CHEM101"));
        state.add_session(Session::new("S4", "BIO110").with_span(Span::Two));
        state.add_session(Session::new("S5", "MATH101"));
        state.add_session(Session::new("S6", "CS150"));
        state
    }

    #[test]
    fn test_generate_places_everything_and_keeps_invariants() {
        for seed in 0..8 {
            let mut state = roomy_state();
            let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(seed));
            assert!(report.is_clean(), "seed {seed}: {:?}", report.messages());
            for session in &state.sessions {
                assert!(state.grid.is_placed(&session.id), "seed {seed}");
                assert!(session.is_fully_assigned(), "seed {seed}");
            }
            assert_no_cell_conflicts(&state);
            assert_span_invariant(&state);
            assert_caps_respected(&state);
        }
    }

    #[test]
    fn test_placement_order_is_largest_first() {
        let state = roomy_state();
        let order = Allocator::new().placement_order(&state);
        assert_eq!(order, vec!["S2", "S4", "S1", "S3", "S5", "S6"]);
    }

    #[test]
    fn test_reset_clears_unlocked_assignments() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1"));
        state.add_classroom(Classroom::new("C1"));
        state.add_session(
            Session::new("S1", "MATH101")
                .with_lecturer("L1")
                .with_classroom("C1"),
        );
        state
            .grid
            .place("S1", Day::Monday, Slot::EightToTen, Span::One)
            .unwrap();

        Allocator::new().reset_unlocked(&mut state);
        let s1 = state.session("S1").unwrap();
        assert_eq!(s1.lecturer_id, None);
        assert_eq!(s1.classroom_id, None);
        assert!(!state.grid.is_placed("S1"));
    }

    #[test]
    fn test_locked_cohort_survives_generation() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1"));
        state.add_lecturer(Lecturer::new("L2"));
        state.add_classroom(Classroom::new("C1"));
        state.add_classroom(Classroom::new("C2"));
        state.add_session(
            Session::new("FIXED", "MATH101")
                .with_lecturer("L1")
                .with_classroom("C1")
                .with_cohort("2026-spring"),
        );
        state
            .grid
            .place("FIXED", Day::Monday, Slot::EightToTen, Span::One)
            .unwrap();
        state.lock_cohort("2026-spring");
        state.add_session(Session::new("FREE", "PHYS201"));

        let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(11));
        assert!(report.is_clean());

        let fixed = state.session("FIXED").unwrap();
        assert_eq!(fixed.lecturer_id.as_deref(), Some("L1"));
        assert_eq!(fixed.classroom_id.as_deref(), Some("C1"));
        assert!(state.grid.contains(Day::Monday, Slot::EightToTen, "FIXED"));
        assert!(state.grid.is_placed("FREE"));
        assert_no_cell_conflicts(&state);
    }

    #[test]
    fn test_least_loaded_lecturer_wins_ties_toward_first() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1"));
        state.add_lecturer(Lecturer::new("L2"));
        state.add_classroom(Classroom::new("C1"));
        state.add_session(Session::new("S1", "MATH101"));
        state.add_session(Session::new("S2", "PHYS201"));

        let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(2));
        assert!(report.is_clean());
        // Load balancing: one session each, first lecturer first.
        assert_eq!(state.session("S1").unwrap().lecturer_id.as_deref(), Some("L1"));
        assert_eq!(state.session("S2").unwrap().lecturer_id.as_deref(), Some("L2"));
    }

    // One two-unit session, one eligible lecturer, one classroom. The
    // classroom is pre-booked (locked cohort) in the second and fourth
    // slot of every day, so no adjacent pair exists anywhere and the
    // trial bound must be exhausted regardless of the random sequence.
    #[test]
    fn test_infeasible_double_session_reports_placement_problem() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1").with_max_hours(2));
        state.add_lecturer(Lecturer::new("L2").with_max_modules(1));
        state.add_classroom(Classroom::new("C1"));
        state.add_session(Session::new("X", "ALGO301").with_span(Span::Two));

        for (i, day) in Day::ALL.iter().enumerate() {
            for slot in [Slot::TenToTwelve, Slot::ThreeToFive] {
                let id = format!("B{}{}", i, slot.index());
                state.add_session(
                    Session::new(&id, "BLOCK")
                        .with_lecturer("L2")
                        .with_classroom("C1")
                        .with_cohort("intake-b"),
                );
                state.grid.place(&id, *day, slot, Span::One).unwrap();
            }
        }
        state.lock_cohort("intake-b");

        let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(5));
        assert!(report.assignment_problems.is_empty());
        assert_eq!(report.placement_problems.len(), 1);
        assert_eq!(report.placement_problems[0].session_id, "X");
        assert_eq!(report.placement_problems[0].units, 2);

        // The lecturer was assigned; only placement failed.
        assert_eq!(state.session("X").unwrap().lecturer_id.as_deref(), Some("L1"));
        assert!(!state.grid.is_placed("X"));
        // Blockers untouched.
        assert!(state.grid.contains(Day::Monday, Slot::TenToTwelve, "B01"));
        assert!(state.grid.contains(Day::Friday, Slot::ThreeToFive, "B43"));
    }

    // Two sessions of one module fit a lecturer capped at one distinct
    // module; a third session of another module does not.
    #[test]
    fn test_module_repeats_do_not_count_twice() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1").with_max_modules(1));
        state.add_classroom(Classroom::new("C1"));
        state.add_classroom(Classroom::new("C2"));
        state.add_session(Session::new("S1", "MATH101"));
        state.add_session(Session::new("S2", "MATH101"));
        state.add_session(Session::new("S3", "PHYS201").with_name("Mechanics"));

        let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(3));

        assert_eq!(state.session("S1").unwrap().lecturer_id.as_deref(), Some("L1"));
        assert_eq!(state.session("S2").unwrap().lecturer_id.as_deref(), Some("L1"));
        assert_eq!(state.session("S3").unwrap().lecturer_id, None);
        assert!(state.grid.is_placed("S1"));
        assert!(state.grid.is_placed("S2"));
        assert!(!state.grid.is_placed("S3"));

        assert_eq!(report.placement_problems.len(), 0);
        assert_eq!(
            report.assignment_problems,
            vec![AssignmentProblem {
                session_id: "S3".into(),
                session_name: "Mechanics".into(),
                reason: AssignmentFailure::ModuleCapacity,
            }]
        );
    }

    #[test]
    fn test_weekly_hours_exhaustion_is_distinguished() {
        let mut state = TimetableState::new();
        state.add_lecturer(Lecturer::new("L1").with_max_hours(1));
        state.add_classroom(Classroom::new("C1"));
        state.add_session(Session::new("S1", "MATH101").with_span(Span::Two));

        let report = Allocator::new().generate(&mut state, &mut SmallRng::seed_from_u64(4));
        assert_eq!(report.assignment_problems.len(), 1);
        assert_eq!(
            report.assignment_problems[0].reason,
            AssignmentFailure::WeeklyHours
        );
    }

    #[test]
    fn test_report_messages() {
        let report = AllocationReport {
            assignment_problems: vec![AssignmentProblem {
                session_id: "S3".into(),
                session_name: "Mechanics".into(),
                reason: AssignmentFailure::ModuleCapacity,
            }],
            placement_problems: vec![PlacementProblem {
                session_id: "X".into(),
                session_name: "Algorithms".into(),
                units: 2,
            }],
        };
        assert_eq!(
            report.messages(),
            vec![
                "No lecturer available for 'Mechanics': every lecturer is at its distinct-module cap"
                    .to_string(),
                "Could not place 'Algorithms' (2h) within the trial bound".to_string(),
            ]
        );
        assert!(!report.is_clean());
        assert_eq!(report.problem_count(), 2);
        assert!(AllocationReport::default().is_clean());
    }
}
