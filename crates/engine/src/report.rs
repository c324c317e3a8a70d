//! Structured output of a scheduling run.
//!
//! Nothing in a run is fatal. Shortfalls are collected here as warnings and
//! the caller decides how to present them.

use serde::{Deserialize, Serialize};

use crate::model::{Day, Shift};

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WarningKind {
    /// A preference could not be placed anywhere by conflict resolution.
    UnresolvedPreference,
    /// A cell is still below minimum after backfill ran out of workers.
    Understaffed { assigned: usize, required: usize },
}

/// A non-fatal shortfall. `day`/`shift` name the preference that could not be
/// placed or the cell that stayed short; `worker` is set only for the former.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub day: Day,
    pub shift: Shift,
    pub worker: Option<String>,
    pub kind: WarningKind,
}

impl Warning {
    pub fn unresolved(worker: &str, day: Day, shift: Shift) -> Self {
        Self {
            day,
            shift,
            worker: Some(worker.to_string()),
            kind: WarningKind::UnresolvedPreference,
        }
    }

    pub fn understaffed(day: Day, shift: Shift, assigned: usize, required: usize) -> Self {
        Self {
            day,
            shift,
            worker: None,
            kind: WarningKind::Understaffed { assigned, required },
        }
    }
}

// ---------------------------------------------------------------------------
// Conflict resolutions
// ---------------------------------------------------------------------------

/// Which fallback placed a worker whose preferred cell was unavailable.
/// Variants are listed in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    SameDayOtherShift,
    OtherDayPreferredShift,
    OtherDayAnyShift,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub worker: String,
    pub preferred_day: Day,
    pub preferred_shift: Shift,
    pub assigned_day: Day,
    pub assigned_shift: Shift,
    pub strategy: Strategy,
}

// ---------------------------------------------------------------------------
// Run report and statistics
// ---------------------------------------------------------------------------

/// Everything a run produced besides the grid itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub resolutions: Vec<Resolution>,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn unresolved(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| w.kind == WarningKind::UnresolvedPreference)
    }

    pub fn understaffed(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w.kind, WarningKind::Understaffed { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total_cells: usize,
    /// Cells at or above the minimum.
    pub staffed_cells: usize,
    /// Cells at the maximum.
    pub full_cells: usize,
    pub total_assignments: usize,
    /// Assignments that landed on the worker's preferred shift for that day.
    pub preference_matches: usize,
}
