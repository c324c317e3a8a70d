use crate::model::{Day, Shift};
use crate::worker::WorkerId;

/// Day x shift table of who is assigned where.
///
/// Each cell lists worker IDs in the order they were assigned. The grid does
/// not enforce capacity; the scheduler checks the rules before every push and
/// updates the worker's own assignment map in the same step.
#[derive(Debug, Clone, Default)]
pub struct AssignmentGrid {
    cells: [[Vec<WorkerId>; 3]; 7],
}

impl AssignmentGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupants(&self, day: Day, shift: Shift) -> &[WorkerId] {
        &self.cells[day.index()][shift.index()]
    }

    pub fn occupancy(&self, day: Day, shift: Shift) -> usize {
        self.occupants(day, shift).len()
    }

    pub fn contains(&self, day: Day, shift: Shift, id: WorkerId) -> bool {
        self.occupants(day, shift).contains(&id)
    }

    /// All cells in day-then-shift order.
    pub fn cells(&self) -> impl Iterator<Item = (Day, Shift, &[WorkerId])> + '_ {
        Day::ALL.into_iter().flat_map(move |day| {
            Shift::ALL
                .into_iter()
                .map(move |shift| (day, shift, self.occupants(day, shift)))
        })
    }

    pub fn total_assignments(&self) -> usize {
        self.cells().map(|(_, _, ids)| ids.len()).sum()
    }

    pub(crate) fn push(&mut self, day: Day, shift: Shift, id: WorkerId) {
        self.cells[day.index()][shift.index()].push(id);
    }

    /// Removes `id` from the cell, preserving the order of the others.
    pub(crate) fn remove(&mut self, day: Day, shift: Shift, id: WorkerId) -> bool {
        let cell = &mut self.cells[day.index()][shift.index()];
        match cell.iter().position(|&w| w == id) {
            Some(pos) => {
                cell.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                cell.clear();
            }
        }
    }
}
