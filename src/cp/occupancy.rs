//! Checkpointable occupancy tables.
//!
//! The partial assignment of a search, stored as flat tables indexed by
//! handle: staff × cell, classroom × cell, cell → subject, plus per-staff
//! load counters. Every placement is pushed onto a trail; rolling back
//! to a checkpoint pops and reverses placements, so the search never
//! clones the tables.
//!
//! Staff tables start seeded with ledger commitments from other
//! departments; rollback never goes below that baseline.

use super::{Candidate, Placement, TimetableModel};

/// Occupancy of one department search.
#[derive(Debug, Clone)]
pub struct Occupancy {
    cells: usize,
    subjects: usize,
    staff_cells: Vec<bool>,
    classroom_cells: Vec<bool>,
    cell_subject: Vec<Option<usize>>,
    staff_hours: Vec<u32>,
    staff_distinct: Vec<u32>,
    staff_subject_units: Vec<u32>,
    trail: Vec<Placement>,
}

impl Occupancy {
    /// Creates tables seeded with the model's ledger commitments.
    pub fn new(model: &TimetableModel) -> Self {
        let cells = model.grid.len();
        let subjects = model.subjects.len();
        let staff_cells = model
            .staff
            .iter()
            .flat_map(|s| s.busy.iter().copied())
            .collect();
        Self {
            cells,
            subjects,
            staff_cells,
            classroom_cells: vec![false; model.classrooms.len() * cells],
            cell_subject: vec![None; cells],
            staff_hours: model.staff.iter().map(|s| s.committed_hours).collect(),
            staff_distinct: model.staff.iter().map(|s| s.committed_subjects).collect(),
            staff_subject_units: vec![0; model.staff.len() * subjects],
            trail: Vec::new(),
        }
    }

    /// Records a placement.
    pub fn place(&mut self, subject: usize, candidate: Candidate) {
        let Candidate {
            staff,
            classroom,
            cell,
        } = candidate;
        self.staff_cells[staff * self.cells + cell] = true;
        self.classroom_cells[classroom * self.cells + cell] = true;
        self.cell_subject[cell] = Some(subject);
        self.staff_hours[staff] += 1;
        let units = &mut self.staff_subject_units[staff * self.subjects + subject];
        if *units == 0 {
            self.staff_distinct[staff] += 1;
        }
        *units += 1;
        self.trail.push(Placement { subject, candidate });
    }

    /// Current trail position.
    #[inline]
    pub fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every placement made after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: usize) {
        while self.trail.len() > checkpoint {
            let Some(Placement { subject, candidate }) = self.trail.pop() else {
                break;
            };
            let Candidate {
                staff,
                classroom,
                cell,
            } = candidate;
            self.staff_cells[staff * self.cells + cell] = false;
            self.classroom_cells[classroom * self.cells + cell] = false;
            self.cell_subject[cell] = None;
            self.staff_hours[staff] -= 1;
            let units = &mut self.staff_subject_units[staff * self.subjects + subject];
            *units -= 1;
            if *units == 0 {
                self.staff_distinct[staff] -= 1;
            }
        }
    }

    /// Placements in the order they were made.
    pub fn placements(&self) -> &[Placement] {
        &self.trail
    }

    /// Whether a staff member is taken at a cell (here or elsewhere).
    #[inline]
    pub fn staff_busy(&self, staff: usize, cell: usize) -> bool {
        self.staff_cells[staff * self.cells + cell]
    }

    /// Whether a classroom is taken at a cell.
    #[inline]
    pub fn classroom_busy(&self, classroom: usize, cell: usize) -> bool {
        self.classroom_cells[classroom * self.cells + cell]
    }

    /// Subject occupying a cell of this department.
    #[inline]
    pub fn subject_at(&self, cell: usize) -> Option<usize> {
        self.cell_subject[cell]
    }

    /// Units taught by a staff member, including commitments.
    #[inline]
    pub fn staff_hours(&self, staff: usize) -> u32 {
        self.staff_hours[staff]
    }

    /// Distinct subjects taught by a staff member, including commitments.
    #[inline]
    pub fn staff_subject_count(&self, staff: usize) -> u32 {
        self.staff_distinct[staff]
    }

    /// Units of one subject taught by a staff member in this department.
    #[inline]
    pub fn staff_subject_units(&self, staff: usize, subject: usize) -> u32 {
        self.staff_subject_units[staff * self.subjects + subject]
    }
}
