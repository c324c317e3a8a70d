use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::report::{Resolution, ScheduleStats, Warning};
use crate::rules::CapacityRules;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A day of the working week. Declaration order is calendar order, which is
/// also the order every scheduling phase walks the week in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Zero-based position in the week (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Day {
    fn from(w: chrono::Weekday) -> Self {
        Day::ALL[w.num_days_from_monday() as usize]
    }
}

impl From<Day> for chrono::Weekday {
    fn from(d: Day) -> Self {
        match d {
            Day::Monday => chrono::Weekday::Mon,
            Day::Tuesday => chrono::Weekday::Tue,
            Day::Wednesday => chrono::Weekday::Wed,
            Day::Thursday => chrono::Weekday::Thu,
            Day::Friday => chrono::Weekday::Fri,
            Day::Saturday => chrono::Weekday::Sat,
            Day::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts full or abbreviated English day names in any case ("Monday", "mon").
impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<chrono::Weekday>()
            .map(Day::from)
            .map_err(|_| format!("unknown day '{}'", s))
    }
}

impl TryFrom<String> for Day {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Day> for String {
    fn from(d: Day) -> Self {
        d.name().to_string()
    }
}

/// A segment of the working day. Order only matters for iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Evening];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Evening => "Evening",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a shift name in any case, or its menu index ("0", "1", "2").
impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(idx) = t.parse::<usize>() {
            return Shift::ALL
                .get(idx)
                .copied()
                .ok_or_else(|| format!("shift index {} out of range (0-2)", idx));
        }
        Shift::ALL
            .iter()
            .find(|shift| shift.name().eq_ignore_ascii_case(t))
            .copied()
            .ok_or_else(|| format!("unknown shift '{}'", s))
    }
}

impl TryFrom<String> for Shift {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Shift> for String {
    fn from(s: Shift) -> Self {
        s.name().to_string()
    }
}

/// Staffing level of a single (day, shift) cell relative to the rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CellStatus {
    /// Fewer occupants than the minimum.
    Understaffed,
    /// At or above the minimum, below the maximum.
    Staffed,
    /// At the maximum; accepts no further assignments.
    Full,
}

impl CellStatus {
    pub fn classify(occupancy: usize, rules: &CapacityRules) -> Self {
        if occupancy < rules.min_workers_per_shift {
            CellStatus::Understaffed
        } else if occupancy < rules.max_workers_per_shift {
            CellStatus::Staffed
        } else {
            CellStatus::Full
        }
    }
}

// ---------------------------------------------------------------------------
// Roster input
// ---------------------------------------------------------------------------

/// A worker as supplied by the caller: a name plus the days they have a
/// preferred shift for. Days without an entry carry no preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSpec {
    pub name: String,
    #[serde(default)]
    pub preferences: BTreeMap<Day, Shift>,
}

/// Everything needed for one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub workers: Vec<WorkerSpec>,
    #[serde(default)]
    pub rules: CapacityRules,
}

// ---------------------------------------------------------------------------
// Solver output types
// ---------------------------------------------------------------------------

/// One (day, shift) cell with its occupants in assignment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub day: Day,
    pub shift: Shift,
    pub workers: Vec<String>,
    pub status: CellStatus,
}

/// A single day a worker was scheduled for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    pub day: Day,
    pub shift: Shift,
    /// The shift the worker asked for on this day, if any.
    pub preferred: Option<Shift>,
    /// True when `preferred == Some(shift)`.
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerView {
    pub name: String,
    pub days_worked: usize,
    /// Assigned days in calendar order.
    pub assignments: Vec<AssignmentView>,
}

/// The complete output of one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedSchedule {
    pub rules: CapacityRules,
    /// Seed used for the backfill shuffle, when the caller supplied one.
    pub seed: Option<u64>,
    /// Cells in day-then-shift order.
    pub cells: Vec<CellView>,
    /// Workers in roster order.
    pub workers: Vec<WorkerView>,
    pub resolutions: Vec<Resolution>,
    pub warnings: Vec<Warning>,
    pub stats: ScheduleStats,
}
