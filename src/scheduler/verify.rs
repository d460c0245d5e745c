//! Last-line self-verification of generated timetables.
//!
//! Re-checks every timetable invariant against the snapshot directly,
//! independent of the search tables. A breach here is an internal
//! defect, never a user error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::{CapacityPolicy, GenerationConfig};
use crate::cp::StaffLedger;
use crate::models::{Schedule, ScheduleSnapshot};

/// Invariant kinds checked by [`verify_schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Row references a cell outside the grid.
    UnknownCell,
    /// Row belongs to another department or references unknown entities.
    ForeignEntity,
    /// Staff appears twice at a cell (including other departments).
    StaffDoubleBooked,
    /// Classroom appears twice at a cell.
    ClassroomDoubleBooked,
    /// Department cell carries more than one row.
    SlotDoubleFilled,
    /// Subject unit count differs from its requirement.
    UnitCountMismatch,
    /// Staff hours exceed the role limit.
    StaffOverHours,
    /// Staff distinct subjects exceed the role limit.
    StaffOverSubjectCount,
    /// Staff did not select (or did not lock) the subject.
    StaffNotQualified,
    /// Classroom smaller than the cohort under hard capacity.
    CapacityInsufficient,
}

/// One failed invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantBreach {
    /// Invariant kind.
    pub kind: InvariantKind,
    /// What was observed.
    pub message: String,
}

impl InvariantBreach {
    fn new(kind: InvariantKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for InvariantBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Verifies a department timetable against the snapshot, the grid, and
/// other departments' commitments in `ledger`.
///
/// # Returns
/// `Ok(())` or every breach found.
pub fn verify_schedule(
    snapshot: &ScheduleSnapshot,
    schedule: &Schedule,
    config: &GenerationConfig,
    ledger: &StaffLedger,
) -> Result<(), Vec<InvariantBreach>> {
    let dept = schedule.department_id.as_str();
    let commitments = ledger.commitments_excluding(dept);
    let mut breaches = Vec::new();

    let mut staff_cells = BTreeSet::new();
    let mut room_cells = BTreeSet::new();
    let mut filled = BTreeSet::new();

    for row in &schedule.assignments {
        let at = format!("({}, {})", row.day, row.slot);
        if config.time_grid.position(&row.day, &row.slot).is_none() {
            breaches.push(InvariantBreach::new(
                InvariantKind::UnknownCell,
                format!("cell {at} is not in the grid"),
            ));
        }
        if row.department_id != dept {
            breaches.push(InvariantBreach::new(
                InvariantKind::ForeignEntity,
                format!("row at {at} belongs to department '{}'", row.department_id),
            ));
        }

        let committed_elsewhere = commitments.get(&row.staff_id).is_some_and(|c| {
            c.cells
                .iter()
                .any(|cell| cell.day == row.day && cell.slot == row.slot)
        });
        if !staff_cells.insert((&row.staff_id, &row.day, &row.slot)) || committed_elsewhere {
            breaches.push(InvariantBreach::new(
                InvariantKind::StaffDoubleBooked,
                format!("staff '{}' is double-booked at {at}", row.staff_id),
            ));
        }
        if !room_cells.insert((&row.classroom_id, &row.day, &row.slot)) {
            breaches.push(InvariantBreach::new(
                InvariantKind::ClassroomDoubleBooked,
                format!("classroom '{}' is double-booked at {at}", row.classroom_id),
            ));
        }
        if !filled.insert((&row.day, &row.slot)) {
            breaches.push(InvariantBreach::new(
                InvariantKind::SlotDoubleFilled,
                format!("cell {at} has more than one subject"),
            ));
        }

        let subject = snapshot.subject(&row.subject_id);
        let room = snapshot
            .classrooms()
            .iter()
            .find(|r| r.id == row.classroom_id);
        match (subject, room) {
            (Some(subject), Some(room)) if subject.department_id == dept && room.department_id == dept => {
                let cohort = subject.cohort_size.or(config.default_cohort_size);
                if config.capacity_policy == CapacityPolicy::Hard && !room.seats(cohort) {
                    breaches.push(InvariantBreach::new(
                        InvariantKind::CapacityInsufficient,
                        format!(
                            "classroom '{}' ({} seats) is too small for subject '{}'",
                            room.id, room.capacity, subject.id
                        ),
                    ));
                }
            }
            _ => breaches.push(InvariantBreach::new(
                InvariantKind::ForeignEntity,
                format!(
                    "row at {at} references subject '{}' / classroom '{}' outside the department",
                    row.subject_id, row.classroom_id
                ),
            )),
        }

        let qualified = snapshot
            .staff_member(&row.staff_id)
            .is_some_and(|m| m.is_schedulable() && m.has_selected(&row.subject_id));
        if !qualified {
            breaches.push(InvariantBreach::new(
                InvariantKind::StaffNotQualified,
                format!(
                    "staff '{}' is not eligible for subject '{}'",
                    row.staff_id, row.subject_id
                ),
            ));
        }
    }

    let units = schedule.subject_units();
    for subject in snapshot.subjects_of(dept) {
        let required =
            subject.required_units(config.units_per_credit, config.max_units_per_subject);
        let assigned = units.get(&subject.id).copied().unwrap_or(0);
        if assigned != required {
            breaches.push(InvariantBreach::new(
                InvariantKind::UnitCountMismatch,
                format!(
                    "subject '{}' has {assigned} units, requires {required}",
                    subject.id
                ),
            ));
        }
    }

    let loads = schedule.staff_loads();
    let mut subjects: BTreeMap<String, BTreeSet<String>> = schedule.staff_subjects();
    for (staff_id, taught) in &mut subjects {
        let Some(limits) = snapshot.limits(staff_id) else {
            continue;
        };
        let committed = commitments.get(staff_id);
        let hours = loads.get(staff_id).copied().unwrap_or(0)
            + committed.map_or(0, |c| c.hours());
        if let Some(c) = committed {
            taught.extend(c.subjects.iter().cloned());
        }
        if hours > limits.max_hours {
            breaches.push(InvariantBreach::new(
                InvariantKind::StaffOverHours,
                format!(
                    "staff '{staff_id}' teaches {hours} units, limit {}",
                    limits.max_hours
                ),
            ));
        }
        if taught.len() as u32 > limits.max_subjects {
            breaches.push(InvariantBreach::new(
                InvariantKind::StaffOverSubjectCount,
                format!(
                    "staff '{staff_id}' teaches {} subjects, limit {}",
                    taught.len(),
                    limits.max_subjects
                ),
            ));
        }
    }

    if breaches.is_empty() {
        Ok(())
    } else {
        Err(breaches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Assignment, Classroom, Department, RoleConstraint, Staff, StaffRole, Subject, SubjectType,
        TimeGrid,
    };

    fn snapshot() -> ScheduleSnapshot {
        ScheduleSnapshot::new(
            vec![Department::new("D1", "CSE"), Department::new("D2", "ECE")],
            vec![
                Subject::new("S1", "A", "D1").with_credits(2).with_cohort_size(30),
                Subject::new("E1", "B", "D2").with_credits(1),
            ],
            vec![
                Staff::new("U1", StaffRole::Professor, "D1")
                    .with_subject("S1")
                    .with_subject("E1")
                    .locked(),
                Staff::new("U2", StaffRole::Professor, "D1").with_subject("S1"),
            ],
            vec![Classroom::new("R1", 40, "D1"), Classroom::new("R2", 20, "D1")],
            vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both).with_limits(2, 2)],
        )
        .unwrap()
    }

    fn config() -> GenerationConfig {
        GenerationConfig::new().with_time_grid(TimeGrid::weekly(&["Mon", "Tue"], &["1", "2"]))
    }

    fn row(day: &str, slot: &str, staff: &str, room: &str) -> Assignment {
        Assignment::new("D1", day, slot, "S1", staff, room)
    }

    fn kinds(result: Result<(), Vec<InvariantBreach>>) -> Vec<InvariantKind> {
        result.unwrap_err().into_iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_valid_schedule_passes() {
        let mut s = Schedule::new("D1");
        s.add_assignment(row("Mon", "1", "U1", "R1"));
        s.add_assignment(row("Tue", "1", "U1", "R1"));
        assert_eq!(verify_schedule(&snapshot(), &s, &config(), &StaffLedger::new()), Ok(()));
    }

    #[test]
    fn test_detects_double_booking_and_missing_unit() {
        let mut s = Schedule::new("D1");
        s.add_assignment(row("Mon", "1", "U1", "R1"));
        s.add_assignment(row("Mon", "1", "U1", "R1"));
        s.add_assignment(row("Tue", "1", "U1", "R1"));
        let found = kinds(verify_schedule(&snapshot(), &s, &config(), &StaffLedger::new()));
        assert!(found.contains(&InvariantKind::StaffDoubleBooked));
        assert!(found.contains(&InvariantKind::ClassroomDoubleBooked));
        assert!(found.contains(&InvariantKind::SlotDoubleFilled));
        assert!(found.contains(&InvariantKind::UnitCountMismatch));
        assert!(found.contains(&InvariantKind::StaffOverHours));
    }

    #[test]
    fn test_detects_capacity_and_qualification() {
        let mut s = Schedule::new("D1");
        s.add_assignment(row("Mon", "1", "U1", "R2"));
        s.add_assignment(row("Tue", "1", "U2", "R1"));
        let found = kinds(verify_schedule(&snapshot(), &s, &config(), &StaffLedger::new()));
        assert_eq!(
            found,
            vec![InvariantKind::CapacityInsufficient, InvariantKind::StaffNotQualified]
        );
    }

    #[test]
    fn test_ledger_conflicts_count() {
        let mut other = Schedule::new("D2");
        other.add_assignment(Assignment::new("D2", "Mon", "1", "E1", "U1", "X1"));
        let mut ledger = StaffLedger::new();
        ledger.commit(&other);

        let mut s = Schedule::new("D1");
        s.add_assignment(row("Mon", "1", "U1", "R1"));
        s.add_assignment(row("Tue", "1", "U1", "R1"));
        let found = kinds(verify_schedule(&snapshot(), &s, &config(), &ledger));
        // Mon/1 clash with D2, and 3 hours against a limit of 2.
        assert_eq!(
            found,
            vec![InvariantKind::StaffDoubleBooked, InvariantKind::StaffOverHours]
        );
    }

    #[test]
    fn test_unknown_cell() {
        let mut s = Schedule::new("D1");
        s.add_assignment(row("Sun", "9", "U1", "R1"));
        s.add_assignment(row("Mon", "1", "U1", "R1"));
        let found = kinds(verify_schedule(&snapshot(), &s, &config(), &StaffLedger::new()));
        assert_eq!(found, vec![InvariantKind::UnknownCell]);
    }
}
