//! The weekly grid.
//!
//! A fixed 5-day × 4-slot structure where each cell holds an unordered
//! set of session ids. The grid stores ids only — it knows nothing about
//! lecturers or classrooms. A two-unit session occupies two adjacent
//! cells of one day; both cells hold the same id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::EngineError;

use super::Span;

/// One of the five fixed teaching days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        write!(f, "{name}")
    }
}

/// One of the four fixed, ordered time windows in a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    EightToTen,
    TenToTwelve,
    OneToThree,
    ThreeToFive,
}

impl Slot {
    /// All slots in day order.
    pub const ALL: [Slot; 4] = [
        Slot::EightToTen,
        Slot::TenToTwelve,
        Slot::OneToThree,
        Slot::ThreeToFive,
    ];

    /// Zero-based position within the day.
    pub fn index(self) -> usize {
        match self {
            Slot::EightToTen => 0,
            Slot::TenToTwelve => 1,
            Slot::OneToThree => 2,
            Slot::ThreeToFive => 3,
        }
    }

    /// Slot at a given position, if in range.
    pub fn from_index(index: usize) -> Option<Slot> {
        Slot::ALL.get(index).copied()
    }

    /// The following slot of the same day, if any.
    pub fn next(self) -> Option<Slot> {
        Slot::from_index(self.index() + 1)
    }

    /// The preceding slot of the same day, if any.
    pub fn prev(self) -> Option<Slot> {
        self.index().checked_sub(1).and_then(Slot::from_index)
    }

    /// Whether this is the day's last slot (no room for a companion cell).
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Slot::EightToTen => "8-10am",
            Slot::TenToTwelve => "10-12pm",
            Slot::OneToThree => "1-3pm",
            Slot::ThreeToFive => "3-5pm",
        };
        write!(f, "{label}")
    }
}

/// The authoritative store of placements.
///
/// A well-formed grid has all 20 cells present (possibly empty); loaders
/// are responsible for guaranteeing this, see `validation::ensure_complete`
/// and `validation::repair_grid`. Invariant: a session id occurs in exactly
/// as many cells as its span has units, and a two-unit session's cells are
/// adjacent within one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: BTreeMap<Day, BTreeMap<Slot, BTreeSet<String>>>,
}

impl Grid {
    /// Creates an empty grid with all 20 cells present.
    pub fn new() -> Self {
        let mut cells = BTreeMap::new();
        for day in Day::ALL {
            let mut slots = BTreeMap::new();
            for slot in Slot::ALL {
                slots.insert(slot, BTreeSet::new());
            }
            cells.insert(day, slots);
        }
        Self { cells }
    }

    /// Session ids present in a cell. An absent cell reads as empty.
    pub fn sessions_in(&self, day: Day, slot: Slot) -> impl Iterator<Item = &str> + '_ {
        self.cells
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Whether a cell holds the given session id.
    pub fn contains(&self, day: Day, slot: Slot, session_id: &str) -> bool {
        self.cells
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .is_some_and(|cell| cell.contains(session_id))
    }

    /// Whether the session id occurs in any cell.
    pub fn is_placed(&self, session_id: &str) -> bool {
        Day::ALL
            .iter()
            .any(|&day| Slot::ALL.iter().any(|&slot| self.contains(day, slot, session_id)))
    }

    /// All cells holding the session id, in day/slot order.
    pub fn occupied_cells(&self, session_id: &str) -> Vec<(Day, Slot)> {
        let mut out = Vec::new();
        for day in Day::ALL {
            for slot in Slot::ALL {
                if self.contains(day, slot, session_id) {
                    out.push((day, slot));
                }
            }
        }
        out
    }

    /// Whether this cell is the covered (second) cell of a two-unit
    /// session. Derived from the id sets: the same id in the previous
    /// slot of the same day marks this one as the continuation.
    pub fn is_continuation(&self, day: Day, slot: Slot, session_id: &str) -> bool {
        self.contains(day, slot, session_id)
            && slot
                .prev()
                .is_some_and(|prev| self.contains(day, prev, session_id))
    }

    /// Inserts the id into the cell and, for a two-unit span, into the
    /// next slot of the same day.
    ///
    /// Fails with [`EngineError::InvalidSpan`] if a two-unit session is
    /// asked to start in the day's last slot.
    pub fn place(&mut self, session_id: &str, day: Day, slot: Slot, span: Span) -> Result<(), EngineError> {
        let companion = match span {
            Span::One => None,
            Span::Two => Some(slot.next().ok_or(EngineError::InvalidSpan { day, slot })?),
        };
        self.insert(day, slot, session_id);
        if let Some(next) = companion {
            self.insert(day, next, session_id);
        }
        Ok(())
    }

    /// Removes the id from the cell; for a two-unit span, also from
    /// whichever adjacent cell currently holds it. Removing from a cell
    /// the id does not occupy is a no-op, even when an adjacent cell
    /// holds it.
    pub fn remove(&mut self, session_id: &str, day: Day, slot: Slot, span: Span) {
        if !self.take(day, slot, session_id) {
            return;
        }
        if span == Span::Two {
            let removed_next = slot.next().is_some_and(|next| self.take(day, next, session_id));
            if !removed_next {
                if let Some(prev) = slot.prev() {
                    self.take(day, prev, session_id);
                }
            }
        }
    }

    /// Removes the id from every cell it occupies (cascade for session
    /// deletion).
    pub fn clear_session(&mut self, session_id: &str) {
        for slots in self.cells.values_mut() {
            for cell in slots.values_mut() {
                cell.remove(session_id);
            }
        }
    }

    /// Clears every cell except ids the predicate keeps.
    pub fn reset<F: Fn(&str) -> bool>(&mut self, keep: F) {
        for slots in self.cells.values_mut() {
            for cell in slots.values_mut() {
                cell.retain(|id| keep(id));
            }
        }
    }

    /// The first cell missing from the fixed 5 × 4 structure, if any.
    pub fn missing_cell(&self) -> Option<(Day, Slot)> {
        for day in Day::ALL {
            for slot in Slot::ALL {
                if self.cells.get(&day).and_then(|slots| slots.get(&slot)).is_none() {
                    return Some((day, slot));
                }
            }
        }
        None
    }

    /// Inserts an empty set for every missing cell; returns how many were
    /// synthesized.
    pub fn fill_missing_cells(&mut self) -> usize {
        let mut added = 0;
        for day in Day::ALL {
            let slots = self.cells.entry(day).or_default();
            for slot in Slot::ALL {
                if !slots.contains_key(&slot) {
                    slots.insert(slot, BTreeSet::new());
                    added += 1;
                }
            }
        }
        added
    }

    fn insert(&mut self, day: Day, slot: Slot, session_id: &str) {
        self.cells
            .entry(day)
            .or_default()
            .entry(slot)
            .or_default()
            .insert(session_id.to_string());
    }

    fn take(&mut self, day: Day, slot: Slot, session_id: &str) -> bool {
        self.cells
            .get_mut(&day)
            .and_then(|slots| slots.get_mut(&slot))
            .is_some_and(|cell| cell.remove(session_id))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
