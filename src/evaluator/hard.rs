//! Hard-constraint checks.
//!
//! Checks run in a fixed short-circuit order so that the reported kind is
//! stable for diagnostics:
//!
//! 1. Staff double-booked (any department, via ledger seeding)
//! 2. Classroom double-booked
//! 3. Department cell already filled
//! 4. Staff did not select the subject
//! 5. Staff over weekly hours
//! 6. Staff over distinct-subject count
//! 7. Classroom too small for the cohort (hard capacity only)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CapacityPolicy;
use crate::cp::{Candidate, Occupancy, TimetableModel};

/// A violated hard constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Staff already teaches at this cell somewhere.
    StaffDoubleBooked,
    /// Classroom already used at this cell.
    ClassroomDoubleBooked,
    /// Department already has a subject at this cell.
    SlotAlreadyFilled,
    /// Staff has not selected this subject.
    StaffNotQualified,
    /// Placing would exceed the staff member's max hours.
    StaffOverHours,
    /// A new subject would exceed the staff member's max subjects.
    StaffOverSubjectCount,
    /// Classroom capacity below the subject's cohort.
    CapacityInsufficient,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConstraintKind::StaffDoubleBooked => "staff double-booked",
            ConstraintKind::ClassroomDoubleBooked => "classroom double-booked",
            ConstraintKind::SlotAlreadyFilled => "slot already filled",
            ConstraintKind::StaffNotQualified => "staff not qualified",
            ConstraintKind::StaffOverHours => "staff over hours",
            ConstraintKind::StaffOverSubjectCount => "staff over subject count",
            ConstraintKind::CapacityInsufficient => "capacity insufficient",
        };
        f.write_str(text)
    }
}

/// Decides whether a unit of `subject` may be placed at `candidate`.
///
/// # Returns
/// `Ok(())` if every hard constraint holds, otherwise the first violation.
pub fn can_place(
    model: &TimetableModel,
    occupancy: &Occupancy,
    subject: usize,
    candidate: Candidate,
) -> Result<(), ConstraintKind> {
    let Candidate {
        staff,
        classroom,
        cell,
    } = candidate;

    if occupancy.staff_busy(staff, cell) {
        return Err(ConstraintKind::StaffDoubleBooked);
    }
    if occupancy.classroom_busy(classroom, cell) {
        return Err(ConstraintKind::ClassroomDoubleBooked);
    }
    if occupancy.subject_at(cell).is_some() {
        return Err(ConstraintKind::SlotAlreadyFilled);
    }

    let entry = &model.subjects[subject];
    if entry.qualified_staff.binary_search(&staff).is_err() {
        return Err(ConstraintKind::StaffNotQualified);
    }

    let limits = model.staff[staff].limits;
    if occupancy.staff_hours(staff) + 1 > limits.max_hours {
        return Err(ConstraintKind::StaffOverHours);
    }
    if occupancy.staff_subject_units(staff, subject) == 0
        && occupancy.staff_subject_count(staff) + 1 > limits.max_subjects
    {
        return Err(ConstraintKind::StaffOverSubjectCount);
    }

    if model.capacity_policy == CapacityPolicy::Hard {
        let capacity = model.classrooms[classroom].capacity;
        if entry.cohort.is_some_and(|cohort| capacity < cohort) {
            return Err(ConstraintKind::CapacityInsufficient);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::cp::StaffLedger;
    use crate::models::{
        Assignment, Classroom, Department, RoleConstraint, Schedule, ScheduleSnapshot, Staff,
        StaffRole, Subject, SubjectType, TimeGrid,
    };

    // S1 (cohort 50), S2, S3; U1 teaches all three, U2 only S2.
    // Limits: 2 subjects, 3 hours. R1 seats 30, R2 seats 60.
    fn model_with(policy: CapacityPolicy, ledger: &StaffLedger) -> TimetableModel {
        let snapshot = ScheduleSnapshot::new(
            vec![Department::new("D1", "CSE"), Department::new("D2", "ECE")],
            vec![
                Subject::new("S1", "CS101", "D1").with_cohort_size(50),
                Subject::new("S2", "CS102", "D1"),
                Subject::new("S3", "CS103", "D1"),
            ],
            vec![
                Staff::new("U1", StaffRole::Professor, "D1")
                    .with_subject("S1")
                    .with_subject("S2")
                    .with_subject("S3")
                    .locked(),
                Staff::new("U2", StaffRole::Professor, "D1").with_subject("S2").locked(),
            ],
            vec![Classroom::new("R1", 30, "D1"), Classroom::new("R2", 60, "D1")],
            vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both).with_limits(2, 3)],
        )
        .unwrap();
        let config = GenerationConfig::new()
            .with_time_grid(TimeGrid::weekly(&["Mon", "Tue"], &["1", "2", "3"]))
            .with_capacity_policy(policy);
        TimetableModel::build(&snapshot, "D1", &config, ledger).unwrap()
    }

    fn at(staff: usize, classroom: usize, cell: usize) -> Candidate {
        Candidate {
            staff,
            classroom,
            cell,
        }
    }

    #[test]
    fn test_empty_department_accepts_eligible() {
        let model = model_with(CapacityPolicy::Hard, &StaffLedger::new());
        let occ = Occupancy::new(&model);
        assert_eq!(can_place(&model, &occ, 1, at(1, 0, 0)), Ok(()));
    }

    #[test]
    fn test_double_booking_order() {
        let model = model_with(CapacityPolicy::Hard, &StaffLedger::new());
        let mut occ = Occupancy::new(&model);
        occ.place(1, at(0, 0, 0));

        // Same staff + same room + same cell: staff reported first.
        assert_eq!(
            can_place(&model, &occ, 1, at(0, 0, 0)),
            Err(ConstraintKind::StaffDoubleBooked)
        );
        assert_eq!(
            can_place(&model, &occ, 1, at(1, 0, 0)),
            Err(ConstraintKind::ClassroomDoubleBooked)
        );
        assert_eq!(
            can_place(&model, &occ, 1, at(1, 1, 0)),
            Err(ConstraintKind::SlotAlreadyFilled)
        );
    }

    #[test]
    fn test_not_qualified() {
        let model = model_with(CapacityPolicy::Hard, &StaffLedger::new());
        let occ = Occupancy::new(&model);
        assert_eq!(
            can_place(&model, &occ, 2, at(1, 1, 0)),
            Err(ConstraintKind::StaffNotQualified)
        );
    }

    #[test]
    fn test_load_limits() {
        let model = model_with(CapacityPolicy::Ignored, &StaffLedger::new());
        let mut occ = Occupancy::new(&model);
        occ.place(0, at(0, 0, 0));
        occ.place(1, at(0, 0, 1));

        // Third distinct subject exceeds max_subjects = 2.
        assert_eq!(
            can_place(&model, &occ, 2, at(0, 0, 2)),
            Err(ConstraintKind::StaffOverSubjectCount)
        );
        // Repeating a taught subject is fine until hours run out.
        assert_eq!(can_place(&model, &occ, 1, at(0, 0, 2)), Ok(()));
        occ.place(1, at(0, 0, 2));
        assert_eq!(
            can_place(&model, &occ, 1, at(0, 0, 3)),
            Err(ConstraintKind::StaffOverHours)
        );
    }

    #[test]
    fn test_capacity_policy() {
        let hard = model_with(CapacityPolicy::Hard, &StaffLedger::new());
        let occ = Occupancy::new(&hard);
        assert_eq!(
            can_place(&hard, &occ, 0, at(0, 0, 0)),
            Err(ConstraintKind::CapacityInsufficient)
        );
        assert_eq!(can_place(&hard, &occ, 0, at(0, 1, 0)), Ok(()));

        let soft = model_with(CapacityPolicy::Soft, &StaffLedger::new());
        let occ = Occupancy::new(&soft);
        assert_eq!(can_place(&soft, &occ, 0, at(0, 0, 0)), Ok(()));
    }

    #[test]
    fn test_ledger_commitment_blocks_staff() {
        let mut other = Schedule::new("D2");
        other.add_assignment(Assignment::new("D2", "Tue", "1", "E1", "U2", "X1"));
        let mut ledger = StaffLedger::new();
        ledger.commit(&other);

        let model = model_with(CapacityPolicy::Hard, &ledger);
        let occ = Occupancy::new(&model);
        assert_eq!(
            can_place(&model, &occ, 1, at(1, 0, 3)),
            Err(ConstraintKind::StaffDoubleBooked)
        );
        assert_eq!(can_place(&model, &occ, 1, at(1, 0, 4)), Ok(()));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConstraintKind::StaffOverHours.to_string(), "staff over hours");
    }
}
