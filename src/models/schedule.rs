//! Schedule (solution) model.
//!
//! A schedule is one department's weekly timetable: a set of rows
//! mapping a (day, slot) cell to the subject taught there, by whom and
//! in which room. It is the only entity written back to storage, and it
//! is always replaced as a whole.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A department timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Department this timetable belongs to.
    pub department_id: String,
    /// Timetable rows, in grid order.
    pub assignments: Vec<Assignment>,
}

/// One timetable row: (department, day, slot) → (subject, staff, classroom).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Department ID (denormalized for storage rows).
    pub department_id: String,
    /// Day label.
    pub day: String,
    /// Slot label.
    pub slot: String,
    /// Subject taught.
    pub subject_id: String,
    /// Teaching staff member.
    pub staff_id: String,
    /// Classroom used.
    pub classroom_id: String,
}

impl Assignment {
    /// Creates a row.
    pub fn new(
        department_id: impl Into<String>,
        day: impl Into<String>,
        slot: impl Into<String>,
        subject_id: impl Into<String>,
        staff_id: impl Into<String>,
        classroom_id: impl Into<String>,
    ) -> Self {
        Self {
            department_id: department_id.into(),
            day: day.into(),
            slot: slot.into(),
            subject_id: subject_id.into(),
            staff_id: staff_id.into(),
            classroom_id: classroom_id.into(),
        }
    }

    /// Whether two rows occupy the same (day, slot).
    #[inline]
    pub fn same_cell(&self, other: &Self) -> bool {
        self.day == other.day && self.slot == other.slot
    }
}

impl Schedule {
    /// Creates an empty timetable for a department.
    pub fn new(department_id: impl Into<String>) -> Self {
        Self {
            department_id: department_id.into(),
            assignments: Vec::new(),
        }
    }

    /// Adds a row.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of rows (= scheduled units).
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the timetable has no rows.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Row at a (day, slot) cell.
    pub fn assignment_at(&self, day: &str, slot: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.day == day && a.slot == slot)
    }

    /// Rows taught by a staff member.
    pub fn assignments_for_staff(&self, staff_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.staff_id == staff_id)
            .collect()
    }

    /// Rows of a subject.
    pub fn assignments_for_subject(&self, subject_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.subject_id == subject_id)
            .collect()
    }

    /// Rows held in a classroom.
    pub fn assignments_for_classroom(&self, classroom_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.classroom_id == classroom_id)
            .collect()
    }

    /// Units taught per staff member.
    pub fn staff_loads(&self) -> BTreeMap<String, u32> {
        let mut loads = BTreeMap::new();
        for a in &self.assignments {
            *loads.entry(a.staff_id.clone()).or_insert(0) += 1;
        }
        loads
    }

    /// Distinct subjects taught per staff member.
    pub fn staff_subjects(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut subjects: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for a in &self.assignments {
            subjects
                .entry(a.staff_id.clone())
                .or_default()
                .insert(a.subject_id.clone());
        }
        subjects
    }

    /// Units scheduled per subject.
    pub fn subject_units(&self) -> BTreeMap<String, u32> {
        let mut units = BTreeMap::new();
        for a in &self.assignments {
            *units.entry(a.subject_id.clone()).or_insert(0) += 1;
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new("D1");
        s.add_assignment(Assignment::new("D1", "Mon", "09:00", "S1", "U1", "R1"));
        s.add_assignment(Assignment::new("D1", "Mon", "10:00", "S2", "U1", "R2"));
        s.add_assignment(Assignment::new("D1", "Tue", "09:00", "S1", "U2", "R1"));
        s
    }

    #[test]
    fn test_lookup() {
        let s = sample_schedule();
        assert_eq!(s.assignment_count(), 3);
        assert_eq!(s.assignment_at("Mon", "10:00").unwrap().subject_id, "S2");
        assert!(s.assignment_at("Wed", "09:00").is_none());
        assert_eq!(s.assignments_for_staff("U1").len(), 2);
        assert_eq!(s.assignments_for_subject("S1").len(), 2);
        assert_eq!(s.assignments_for_classroom("R2").len(), 1);
    }

    #[test]
    fn test_aggregates() {
        let s = sample_schedule();
        assert_eq!(s.staff_loads()["U1"], 2);
        assert_eq!(s.staff_subjects()["U1"].len(), 2);
        assert_eq!(s.subject_units()["S1"], 2);
    }

    #[test]
    fn test_same_cell() {
        let a = Assignment::new("D1", "Mon", "09:00", "S1", "U1", "R1");
        let b = Assignment::new("D2", "Mon", "09:00", "S9", "U1", "R9");
        assert!(a.same_cell(&b));
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new("D1");
        assert!(s.is_empty());
        assert!(s.staff_loads().is_empty());
    }
}
