//! Capacity rules: how many workers a shift needs and holds, and how many
//! days a worker may be scheduled in one week.

use serde::{Deserialize, Serialize};

/// Minimum occupants the backfill phase tries to reach in every cell.
pub const MIN_WORKERS_PER_SHIFT: usize = 2;
/// Hard cap on occupants of a single cell.
pub const MAX_WORKERS_PER_SHIFT: usize = 8;
/// Hard cap on days a worker is scheduled per week.
pub const MAX_DAYS_PER_WEEK: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("maxWorkersPerShift must be at least 1")]
    ZeroShiftCapacity,
    #[error("minWorkersPerShift ({min}) exceeds maxWorkersPerShift ({max})")]
    MinAboveMax { min: usize, max: usize },
    #[error("maxDaysPerWeek must be between 1 and 7, got {0}")]
    DaysPerWeekOutOfRange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityRules {
    pub min_workers_per_shift: usize,
    pub max_workers_per_shift: usize,
    pub max_days_per_week: usize,
}

impl Default for CapacityRules {
    fn default() -> Self {
        Self {
            min_workers_per_shift: MIN_WORKERS_PER_SHIFT,
            max_workers_per_shift: MAX_WORKERS_PER_SHIFT,
            max_days_per_week: MAX_DAYS_PER_WEEK,
        }
    }
}

impl CapacityRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_workers_per_shift == 0 {
            return Err(RulesError::ZeroShiftCapacity);
        }
        if self.min_workers_per_shift > self.max_workers_per_shift {
            return Err(RulesError::MinAboveMax {
                min: self.min_workers_per_shift,
                max: self.max_workers_per_shift,
            });
        }
        if !(1..=7).contains(&self.max_days_per_week) {
            return Err(RulesError::DaysPerWeekOutOfRange(self.max_days_per_week));
        }
        Ok(())
    }

    /// Total worker-slots needed to bring every cell of the week to minimum.
    pub fn weekly_minimum_slots(&self) -> usize {
        7 * 3 * self.min_workers_per_shift
    }
}
