use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Day, Shift};
use crate::rules::MAX_DAYS_PER_WEEK;

/// Comparison key for worker names: trimmed and lowercased, so "Élan" and
/// " élan" name the same worker.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Position of a worker in the scheduler's roster (insertion order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WorkerId(pub usize);

/// A worker with their preferred shifts and the shifts they were given.
///
/// `days_worked` always equals `assignments.len()` and never exceeds
/// `max_days`. It only moves through `assign`, `unassign` and `reset`.
#[derive(Debug, Clone)]
pub struct Worker {
    name: String,
    preferences: BTreeMap<Day, Shift>,
    assignments: BTreeMap<Day, Shift>,
    days_worked: usize,
    max_days: usize,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_max_days(name, MAX_DAYS_PER_WEEK)
    }

    pub fn with_max_days(name: impl Into<String>, max_days: usize) -> Self {
        Self {
            name: name.into(),
            preferences: BTreeMap::new(),
            assignments: BTreeMap::new(),
            days_worked: 0,
            max_days,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn days_worked(&self) -> usize {
        self.days_worked
    }

    pub fn assignments(&self) -> &BTreeMap<Day, Shift> {
        &self.assignments
    }

    /// Overwrites any existing preference for `day`.
    pub fn set_preference(&mut self, day: Day, shift: Shift) {
        self.preferences.insert(day, shift);
    }

    pub fn preference(&self, day: Day) -> Option<Shift> {
        self.preferences.get(&day).copied()
    }

    pub fn assigned_shift(&self, day: Day) -> Option<Shift> {
        self.assignments.get(&day).copied()
    }

    /// Free on `day` and still under the weekly limit.
    pub fn can_work_day(&self, day: Day) -> bool {
        !self.assignments.contains_key(&day) && self.days_worked < self.max_days
    }

    pub fn is_at_limit(&self) -> bool {
        self.days_worked >= self.max_days
    }

    /// Records the assignment if `can_work_day(day)`; otherwise leaves the
    /// worker untouched and returns false.
    pub fn assign(&mut self, day: Day, shift: Shift) -> bool {
        if !self.can_work_day(day) {
            return false;
        }
        self.assignments.insert(day, shift);
        self.days_worked += 1;
        true
    }

    pub fn unassign(&mut self, day: Day) -> bool {
        if self.assignments.remove(&day).is_some() {
            self.days_worked -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_preference_match(&self, day: Day) -> bool {
        match (self.assigned_shift(day), self.preference(day)) {
            (Some(assigned), Some(preferred)) => assigned == preferred,
            _ => false,
        }
    }

    /// Clears assignments. Preferences survive across runs.
    pub fn reset(&mut self) {
        self.assignments.clear();
        self.days_worked = 0;
    }
}
