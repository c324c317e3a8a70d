//! Weekly shift assignment engine.
//!
//! Assigns workers to (day, shift) cells honoring per-worker preferences,
//! per-shift staffing bounds and a weekly day limit. See [`scheduler`] for
//! the three-phase algorithm.

pub mod grid;
pub mod model;
pub mod report;
pub mod rules;
pub mod scheduler;
pub mod validator;
pub mod worker;

pub use scheduler::{solve, Scheduler, ScheduleError};
