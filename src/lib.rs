//! Weekly timetabling engine.
//!
//! Assigns teaching sessions to a lecturer, a classroom, and a day/slot
//! cell inside a fixed 5 × 4 weekly grid, subject to capacity and
//! non-overlap constraints. Best-effort, not an optimal solver: automatic
//! generation degrades to a partial schedule plus a problem report when
//! it cannot place everything.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Session`, `Lecturer`, `Classroom`,
//!   `Grid`, `Day`, `Slot`, `Span`, and the shared `TimetableState`
//! - **`capacity`**: Derived lecturer load (weekly hours, distinct modules)
//! - **`conflict`**: Pure availability predicates used by every mutation path
//! - **`allocator`**: Automatic generation via bounded randomized search
//! - **`edit`**: Validated single-session operations (add, remove, relocate,
//!   reassign)
//! - **`validation`**: Integrity checks for state handed over by the store
//!
//! # Architecture
//!
//! All shared state lives in one [`models::TimetableState`] value passed
//! by reference, so the allocator and the edit layer are functions of
//! (state, request). Rendering, persistence mechanics, and user prompts
//! are the caller's concern: the engine returns typed results and the
//! allocator's problem report, and the full state serializes with serde.

pub mod allocator;
pub mod capacity;
pub mod conflict;
pub mod edit;
pub mod error;
pub mod models;
pub mod validation;

pub use allocator::{AllocationReport, Allocator};
pub use error::EngineError;
pub use models::TimetableState;
