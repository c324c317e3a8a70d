use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::model::{Day, Roster, Shift};
use crate::worker::name_key;

// ---------------------------------------------------------------------------
// Validation result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validate implementation
// ---------------------------------------------------------------------------

/// Validate a roster, returning errors (block generation) and warnings
/// (advisory). Errors are listed before warnings.
pub fn validate(roster: &Roster) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let rules = &roster.rules;

    // -----------------------------------------------------------------------
    // Errors: rules and roster identity
    // -----------------------------------------------------------------------
    if let Err(e) = rules.validate() {
        errors.push(format!("Invalid rules -- {}", e));
    }

    if roster.workers.is_empty() {
        errors.push(
            "No workers -- add at least one worker before generating a schedule".to_string(),
        );
    }

    {
        let mut seen: HashSet<String> = HashSet::new();
        for (i, worker) in roster.workers.iter().enumerate() {
            let name = worker.name.trim();
            if name.is_empty() {
                errors.push(format!("Worker #{} has an empty name", i + 1));
                continue;
            }
            if !seen.insert(name_key(name)) {
                errors.push(format!(
                    "Duplicate worker '{}' -- names must be unique (case-insensitive)",
                    name
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Warnings: per worker
    // -----------------------------------------------------------------------
    for worker in &roster.workers {
        if worker.preferences.is_empty() {
            warnings.push(format!(
                "Worker '{}' has no preferences -- they will only be used to backfill short shifts",
                worker.name.trim()
            ));
        } else if worker.preferences.len() > rules.max_days_per_week {
            // Preferences are walked Monday first, so the tail is what gets dropped.
            let dropped: Vec<&str> = worker
                .preferences
                .keys()
                .skip(rules.max_days_per_week)
                .map(|d| d.name())
                .collect();
            warnings.push(format!(
                "Worker '{}' prefers {} days but may work at most {} -- {} will not be honored",
                worker.name.trim(),
                worker.preferences.len(),
                rules.max_days_per_week,
                dropped.join(", ")
            ));
        }
    }

    // -----------------------------------------------------------------------
    // Warnings: oversubscribed cells
    // -----------------------------------------------------------------------
    {
        let mut demand: BTreeMap<(Day, Shift), usize> = BTreeMap::new();
        for worker in &roster.workers {
            for (&day, &shift) in &worker.preferences {
                *demand.entry((day, shift)).or_insert(0) += 1;
            }
        }
        for ((day, shift), count) in demand {
            if count > rules.max_workers_per_shift {
                warnings.push(format!(
                    "{} {} is preferred by {} workers but holds {} -- {} will be moved by conflict resolution",
                    day,
                    shift,
                    count,
                    rules.max_workers_per_shift,
                    count - rules.max_workers_per_shift
                ));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Warning: roster too small to reach minimum staffing
    // -----------------------------------------------------------------------
    let capacity = roster.workers.len() * rules.max_days_per_week;
    let needed = rules.weekly_minimum_slots();
    if !roster.workers.is_empty() && capacity < needed {
        warnings.push(format!(
            "Roster can cover at most {} worker-days but minimum staffing needs {} -- some shifts will be understaffed",
            capacity, needed
        ));
    }

    ValidationResult { errors, warnings }
}
