//! Cross-department staff commitments.
//!
//! Staff are the only resource shared between departments. The ledger
//! holds the rows of every department generated so far, so that the
//! next department's search starts with those staff cells, hours, and
//! subjects already occupied.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Assignment, GridCell, Schedule};

/// Committed timetables, keyed by department.
#[derive(Debug, Clone, Default)]
pub struct StaffLedger {
    rows: BTreeMap<String, Vec<Assignment>>,
}

/// One staff member's commitments outside a department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffCommitment {
    /// Occupied (day, slot) cells.
    pub cells: BTreeSet<GridCell>,
    /// Subjects taught.
    pub subjects: BTreeSet<String>,
}

impl StaffCommitment {
    /// Units taught.
    #[inline]
    pub fn hours(&self) -> u32 {
        self.cells.len() as u32
    }
}

impl StaffLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a department timetable, replacing any earlier one.
    pub fn commit(&mut self, schedule: &Schedule) {
        self.rows
            .insert(schedule.department_id.clone(), schedule.assignments.clone());
    }

    /// Removes a department's timetable.
    pub fn release(&mut self, department_id: &str) -> bool {
        self.rows.remove(department_id).is_some()
    }

    /// Departments with committed timetables.
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// All committed rows.
    pub fn rows(&self) -> impl Iterator<Item = &Assignment> {
        self.rows.values().flatten()
    }

    /// Per-staff commitments from every department except `department_id`.
    pub fn commitments_excluding(&self, department_id: &str) -> BTreeMap<String, StaffCommitment> {
        let mut out: BTreeMap<String, StaffCommitment> = BTreeMap::new();
        for (dept, rows) in &self.rows {
            if dept == department_id {
                continue;
            }
            for row in rows {
                let entry = out.entry(row.staff_id.clone()).or_default();
                entry.cells.insert(GridCell::new(&row.day, &row.slot));
                entry.subjects.insert(row.subject_id.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(dept: &str, rows: &[(&str, &str, &str, &str)]) -> Schedule {
        let mut s = Schedule::new(dept);
        for (day, slot, subject, staff) in rows {
            s.add_assignment(Assignment::new(dept, *day, *slot, *subject, *staff, "R1"));
        }
        s
    }

    #[test]
    fn test_commitments_exclude_own_department() {
        let mut ledger = StaffLedger::new();
        ledger.commit(&schedule("D1", &[("Mon", "1", "S1", "U1"), ("Mon", "2", "S1", "U1")]));
        ledger.commit(&schedule("D2", &[("Tue", "1", "E1", "U1")]));

        let for_d3 = ledger.commitments_excluding("D3");
        assert_eq!(for_d3["U1"].hours(), 3);
        assert_eq!(for_d3["U1"].subjects.len(), 2);

        let for_d1 = ledger.commitments_excluding("D1");
        assert_eq!(for_d1["U1"].hours(), 1);
        assert!(for_d1["U1"].cells.contains(&GridCell::new("Tue", "1")));
    }

    #[test]
    fn test_commit_replaces() {
        let mut ledger = StaffLedger::new();
        ledger.commit(&schedule("D1", &[("Mon", "1", "S1", "U1")]));
        ledger.commit(&schedule("D1", &[("Wed", "1", "S1", "U2")]));
        assert_eq!(ledger.rows().count(), 1);
        assert!(ledger.commitments_excluding("X").get("U1").is_none());
        assert!(ledger.release("D1"));
        assert_eq!(ledger.departments().count(), 0);
    }
}
