//! Timetabling domain models.
//!
//! Core data types for the weekly grid and the entities scheduled into
//! it. The collections live together in [`TimetableState`], which every
//! engine operation takes by reference.

mod classroom;
mod grid;
mod lecturer;
mod session;
mod state;

pub use classroom::Classroom;
pub use grid::{Day, Grid, Slot};
pub use lecturer::{Lecturer, DEFAULT_MAX_DISTINCT_MODULES, DEFAULT_MAX_WEEKLY_HOURS};
pub use session::{Session, Span};
pub use state::TimetableState;
