use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::grid::AssignmentGrid;
use crate::model::{
    AssignmentView, CellStatus, CellView, Day, Roster, Shift, SolvedSchedule, WorkerView,
};
use crate::report::{Resolution, RunReport, ScheduleStats, Strategy, Warning};
use crate::rules::{CapacityRules, RulesError};
use crate::worker::{name_key, Worker, WorkerId};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("Worker name cannot be empty")]
    EmptyName,
    #[error("Worker '{0}' already exists -- names must be unique (case-insensitive)")]
    DuplicateName(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("No workers in roster -- add workers before generating a schedule")]
    EmptyRoster,
    #[error("Invalid rules: {0}")]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Owns the roster and the assignment grid and runs the weekly assignment.
///
/// A run has three phases, always executed together by [`Scheduler::generate`]:
///
/// 1. Reset every worker's assignments and clear the grid.
/// 2. Walk workers in roster order and their days in calendar order, placing
///    each preference directly or through conflict resolution.
/// 3. Top up every cell below the minimum with randomly chosen free workers.
///
/// The only source of nondeterminism is `R`, used to shuffle backfill
/// candidates. Inject a seeded generator to make runs reproducible.
#[derive(Debug, Clone)]
pub struct Scheduler<R = StdRng> {
    rules: CapacityRules,
    workers: Vec<Worker>,
    grid: AssignmentGrid,
    rng: R,
}

impl Scheduler<StdRng> {
    /// Scheduler whose backfill shuffle is seeded from OS entropy.
    pub fn new(rules: CapacityRules) -> Result<Self, RulesError> {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Scheduler whose backfill shuffle is reproducible for a given seed.
    pub fn seeded(rules: CapacityRules, seed: u64) -> Result<Self, RulesError> {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn with_rng(rules: CapacityRules, rng: R) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            rules,
            workers: Vec::new(),
            grid: AssignmentGrid::new(),
            rng,
        })
    }

    pub fn rules(&self) -> &CapacityRules {
        &self.rules
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.get(id.0)
    }

    /// Case-insensitive lookup by name.
    pub fn worker_id(&self, name: &str) -> Option<WorkerId> {
        let key = name_key(name);
        self.workers
            .iter()
            .position(|w| name_key(w.name()) == key)
            .map(WorkerId)
    }

    pub fn grid(&self) -> &AssignmentGrid {
        &self.grid
    }

    /// Appends a worker to the roster. The name is trimmed and must be unique
    /// ignoring case.
    pub fn add_worker(
        &mut self,
        name: &str,
        preferences: impl IntoIterator<Item = (Day, Shift)>,
    ) -> Result<WorkerId, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.worker_id(name).is_some() {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        let mut worker = Worker::with_max_days(name, self.rules.max_days_per_week);
        for (day, shift) in preferences {
            worker.set_preference(day, shift);
        }
        self.workers.push(worker);
        Ok(WorkerId(self.workers.len() - 1))
    }

    /// Returns false if `id` is not in the roster.
    pub fn set_preference(&mut self, id: WorkerId, day: Day, shift: Shift) -> bool {
        match self.workers.get_mut(id.0) {
            Some(worker) => {
                worker.set_preference(day, shift);
                true
            }
            None => false,
        }
    }

    /// The worker is free that day and under their weekly limit, and the cell
    /// has room.
    pub fn can_assign(&self, id: WorkerId, day: Day, shift: Shift) -> bool {
        let Some(worker) = self.workers.get(id.0) else {
            return false;
        };
        worker.can_work_day(day)
            && self.grid.occupancy(day, shift) < self.rules.max_workers_per_shift
    }

    /// Places the worker in the cell, updating their assignment map and the
    /// grid together. Returns false and changes nothing when not allowed.
    pub fn assign(&mut self, id: WorkerId, day: Day, shift: Shift) -> bool {
        if !self.can_assign(id, day, shift) {
            return false;
        }
        if !self.workers[id.0].assign(day, shift) {
            return false;
        }
        self.grid.push(day, shift, id);
        true
    }

    /// Removes the worker's assignment on `day` from both their map and the
    /// grid. Returns false if they were not assigned that day.
    pub fn unassign(&mut self, id: WorkerId, day: Day) -> bool {
        let Some(worker) = self.workers.get_mut(id.0) else {
            return false;
        };
        let Some(shift) = worker.assigned_shift(day) else {
            return false;
        };
        worker.unassign(day);
        self.grid.remove(day, shift, id);
        true
    }

    /// Runs all three phases and returns the resolutions and warnings
    /// collected along the way.
    pub fn generate(&mut self) -> RunReport {
        info!(workers = self.workers.len(), "generating schedule");
        let mut report = RunReport::default();

        self.reset();
        info!("step 1: reset all schedules");

        self.assign_preferences(&mut report);
        info!(
            resolutions = report.resolutions.len(),
            unresolved = report.unresolved().count(),
            "step 2: assigned preferred shifts"
        );

        self.backfill(&mut report);
        info!(
            understaffed = report.understaffed().count(),
            assignments = self.grid.total_assignments(),
            "step 3: ensured minimum staffing"
        );

        report
    }

    // -----------------------------------------------------------------------
    // Phase 1: reset
    // -----------------------------------------------------------------------

    pub(crate) fn reset(&mut self) {
        for worker in self.workers.iter_mut() {
            worker.reset();
        }
        self.grid.clear();
    }

    // -----------------------------------------------------------------------
    // Phase 2: preferences with conflict resolution
    // -----------------------------------------------------------------------

    pub(crate) fn assign_preferences(&mut self, report: &mut RunReport) {
        for idx in 0..self.workers.len() {
            let id = WorkerId(idx);
            for day in Day::ALL {
                if self.workers[idx].is_at_limit() {
                    break;
                }
                let Some(preferred) = self.workers[idx].preference(day) else {
                    continue;
                };

                if self.assign(id, day, preferred) {
                    debug!(
                        worker = self.workers[idx].name(),
                        %day,
                        shift = %preferred,
                        "assigned preferred shift"
                    );
                    continue;
                }

                match self.resolve_conflict(id, day, preferred) {
                    Some(resolution) => {
                        debug!(
                            worker = %resolution.worker,
                            day = %resolution.assigned_day,
                            shift = %resolution.assigned_shift,
                            strategy = ?resolution.strategy,
                            "conflict resolved"
                        );
                        report.resolutions.push(resolution);
                    }
                    None => {
                        let name = self.workers[idx].name();
                        warn!(
                            worker = name,
                            %day,
                            shift = %preferred,
                            "could not place preference anywhere"
                        );
                        report.warnings.push(Warning::unresolved(name, day, preferred));
                    }
                }
            }
        }
    }

    /// Tries, in order: another shift the same day, the preferred shift on
    /// another day, any shift on another day. First success wins.
    fn resolve_conflict(
        &mut self,
        id: WorkerId,
        day: Day,
        preferred: Shift,
    ) -> Option<Resolution> {
        for shift in Shift::ALL {
            if shift != preferred && self.assign(id, day, shift) {
                return Some(self.resolution(
                    id,
                    day,
                    preferred,
                    day,
                    shift,
                    Strategy::SameDayOtherShift,
                ));
            }
        }

        for other in Day::ALL {
            if other != day && self.assign(id, other, preferred) {
                return Some(self.resolution(
                    id,
                    day,
                    preferred,
                    other,
                    preferred,
                    Strategy::OtherDayPreferredShift,
                ));
            }
        }

        for other in Day::ALL {
            if other == day {
                continue;
            }
            for shift in Shift::ALL {
                if self.assign(id, other, shift) {
                    return Some(self.resolution(
                        id,
                        day,
                        preferred,
                        other,
                        shift,
                        Strategy::OtherDayAnyShift,
                    ));
                }
            }
        }

        None
    }

    fn resolution(
        &self,
        id: WorkerId,
        preferred_day: Day,
        preferred_shift: Shift,
        assigned_day: Day,
        assigned_shift: Shift,
        strategy: Strategy,
    ) -> Resolution {
        Resolution {
            worker: self.workers[id.0].name().to_string(),
            preferred_day,
            preferred_shift,
            assigned_day,
            assigned_shift,
            strategy,
        }
    }

    // -----------------------------------------------------------------------
    // Phase 3: minimum staffing backfill
    // -----------------------------------------------------------------------

    pub(crate) fn backfill(&mut self, report: &mut RunReport) {
        let min = self.rules.min_workers_per_shift;

        for day in Day::ALL {
            for shift in Shift::ALL {
                let current = self.grid.occupancy(day, shift);
                if current >= min {
                    continue;
                }
                let needed = min - current;

                let mut available = self.available_workers(day);
                available.shuffle(&mut self.rng);

                let mut added = 0;
                for id in available {
                    if added >= needed {
                        break;
                    }
                    if self.assign(id, day, shift) {
                        debug!(worker = self.workers[id.0].name(), %day, %shift, "backfilled");
                        added += 1;
                    }
                }

                if added < needed {
                    let assigned = current + added;
                    warn!(%day, %shift, assigned, required = min, "shift understaffed");
                    report.warnings.push(Warning::understaffed(day, shift, assigned, min));
                }
            }
        }
    }

    /// Workers free on `day`, in roster order.
    fn available_workers(&self, day: Day) -> Vec<WorkerId> {
        self.workers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.can_work_day(day))
            .map(|(i, _)| WorkerId(i))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    pub fn stats(&self) -> ScheduleStats {
        let mut stats = ScheduleStats::default();
        for (_, _, ids) in self.grid.cells() {
            stats.total_cells += 1;
            stats.total_assignments += ids.len();
            if ids.len() >= self.rules.min_workers_per_shift {
                stats.staffed_cells += 1;
            }
            if ids.len() == self.rules.max_workers_per_shift {
                stats.full_cells += 1;
            }
        }
        stats.preference_matches = self
            .workers
            .iter()
            .map(|w| Day::ALL.iter().filter(|&&d| w.has_preference_match(d)).count())
            .sum();
        stats
    }

    /// Snapshot of the grid and every worker, with names resolved, for the
    /// presentation layer.
    pub fn solved(&self, report: RunReport, seed: Option<u64>) -> SolvedSchedule {
        let cells = self
            .grid
            .cells()
            .map(|(day, shift, ids)| CellView {
                day,
                shift,
                workers: ids
                    .iter()
                    .map(|id| self.workers[id.0].name().to_string())
                    .collect(),
                status: CellStatus::classify(ids.len(), &self.rules),
            })
            .collect();

        let workers = self
            .workers
            .iter()
            .map(|w| WorkerView {
                name: w.name().to_string(),
                days_worked: w.days_worked(),
                assignments: w
                    .assignments()
                    .iter()
                    .map(|(&day, &shift)| AssignmentView {
                        day,
                        shift,
                        preferred: w.preference(day),
                        matched: w.has_preference_match(day),
                    })
                    .collect(),
            })
            .collect();

        SolvedSchedule {
            rules: self.rules,
            seed,
            cells,
            workers,
            resolutions: report.resolutions,
            warnings: report.warnings,
            stats: self.stats(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Builds a scheduler from `roster`, runs one full generation and returns the
/// resulting schedule.
///
/// With `seed` set the backfill phase is reproducible; otherwise it draws
/// from OS entropy.
pub fn solve(roster: &Roster, seed: Option<u64>) -> Result<SolvedSchedule, ScheduleError> {
    if roster.workers.is_empty() {
        return Err(ScheduleError::EmptyRoster);
    }

    let mut scheduler = match seed {
        Some(seed) => Scheduler::seeded(roster.rules, seed)?,
        None => Scheduler::new(roster.rules)?,
    };
    for spec in &roster.workers {
        scheduler.add_worker(&spec.name, spec.preferences.iter().map(|(&d, &s)| (d, s)))?;
    }

    let report = scheduler.generate();
    Ok(scheduler.solved(report, seed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
