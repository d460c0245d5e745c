//! Unsatisfiable-by-construction checks.
//!
//! Run on the compiled model before any search, so provably infeasible
//! departments fail fast and name the offending subject instead of
//! burning the backtrack budget.
//!
//! | Check | Scope |
//! |-------|-------|
//! | No qualified, locked staff | subject |
//! | No capacity-eligible classroom | subject |
//! | Qualified staff lack remaining hours | subject |
//! | More units than grid cells | department |

use thiserror::Error;

use crate::cp::TimetableModel;

/// Why a department cannot be scheduled whatever the search does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsatisfiableReason {
    /// Nobody eligible selected the subject.
    #[error("subject '{subject_id}' has no qualified locked staff")]
    NoQualifiedStaff { subject_id: String },

    /// No department classroom can host the subject.
    #[error("subject '{subject_id}' has no eligible classroom{}", cohort_note(.cohort_size))]
    NoEligibleClassroom {
        subject_id: String,
        cohort_size: Option<u32>,
    },

    /// Qualified staff cannot cover the subject's units within their limits.
    #[error(
        "subject '{subject_id}' needs {required} units but its qualified staff \
         have {available} hours left"
    )]
    InsufficientStaffHours {
        subject_id: String,
        required: u32,
        available: u32,
    },

    /// The department needs more units than the grid has cells.
    #[error("department needs {required} units but the grid has {available} cells")]
    InsufficientTimeSlots { required: usize, available: usize },
}

impl UnsatisfiableReason {
    /// Subject named by this reason, if it is subject-scoped.
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            UnsatisfiableReason::NoQualifiedStaff { subject_id }
            | UnsatisfiableReason::NoEligibleClassroom { subject_id, .. }
            | UnsatisfiableReason::InsufficientStaffHours { subject_id, .. } => {
                Some(subject_id)
            }
            UnsatisfiableReason::InsufficientTimeSlots { .. } => None,
        }
    }
}

fn cohort_note(cohort: &Option<u32>) -> String {
    match cohort {
        Some(n) => format!(" seating {n}"),
        None => String::new(),
    }
}

/// Collects every construction-level reason the model cannot be solved.
///
/// Subject reasons come first, in subject ID order.
pub fn check_constructible(model: &TimetableModel) -> Vec<UnsatisfiableReason> {
    let mut reasons = Vec::new();

    for subject in &model.subjects {
        if subject.qualified_staff.is_empty() {
            reasons.push(UnsatisfiableReason::NoQualifiedStaff {
                subject_id: subject.id.clone(),
            });
        }
        if subject.eligible_classrooms.is_empty() {
            reasons.push(UnsatisfiableReason::NoEligibleClassroom {
                subject_id: subject.id.clone(),
                cohort_size: subject.cohort,
            });
        }
        if subject.qualified_staff.is_empty() {
            continue;
        }

        // Staff already at their subject limit elsewhere cannot take this one.
        let available: u32 = subject
            .qualified_staff
            .iter()
            .map(|&s| &model.staff[s])
            .filter(|s| s.committed_subjects < s.limits.max_subjects)
            .map(|s| s.limits.max_hours.saturating_sub(s.committed_hours))
            .fold(0u32, u32::saturating_add);
        if available < subject.required_units {
            reasons.push(UnsatisfiableReason::InsufficientStaffHours {
                subject_id: subject.id.clone(),
                required: subject.required_units,
                available,
            });
        }
    }

    let required = model.total_units();
    if required > model.grid.len() {
        reasons.push(UnsatisfiableReason::InsufficientTimeSlots {
            required,
            available: model.grid.len(),
        });
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::cp::StaffLedger;
    use crate::models::{
        Classroom, Department, RoleConstraint, ScheduleSnapshot, Staff, StaffRole, Subject,
        SubjectType, TimeGrid,
    };

    fn model(subjects: Vec<Subject>, staff: Vec<Staff>, max_hours: u32, cells: usize) -> TimetableModel {
        let snapshot = ScheduleSnapshot::new(
            vec![Department::new("D1", "CSE")],
            subjects,
            staff,
            vec![Classroom::new("R1", 40, "D1")],
            vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both)
                .with_limits(2, max_hours)],
        )
        .unwrap();
        let slots: Vec<String> = (1..=cells).map(|i| i.to_string()).collect();
        let config = GenerationConfig::new().with_time_grid(TimeGrid::weekly(&["Mon"], &slots));
        TimetableModel::build(&snapshot, "D1", &config, &StaffLedger::new()).unwrap()
    }

    #[test]
    fn test_constructible_department() {
        let m = model(
            vec![Subject::new("S1", "A", "D1").with_credits(2)],
            vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
            8,
            5,
        );
        assert!(check_constructible(&m).is_empty());
    }

    #[test]
    fn test_no_qualified_staff() {
        let m = model(
            vec![Subject::new("S1", "A", "D1"), Subject::new("S2", "B", "D1")],
            vec![
                Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked(),
                // Selected S2 but never locked.
                Staff::new("U2", StaffRole::Professor, "D1").with_subject("S2"),
            ],
            8,
            10,
        );
        let reasons = check_constructible(&m);
        assert_eq!(
            reasons,
            vec![UnsatisfiableReason::NoQualifiedStaff {
                subject_id: "S2".into()
            }]
        );
        assert_eq!(reasons[0].subject_id(), Some("S2"));
    }

    #[test]
    fn test_no_eligible_classroom() {
        let m = model(
            vec![Subject::new("S1", "A", "D1").with_credits(1).with_cohort_size(90)],
            vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
            8,
            5,
        );
        let reasons = check_constructible(&m);
        assert_eq!(
            reasons,
            vec![UnsatisfiableReason::NoEligibleClassroom {
                subject_id: "S1".into(),
                cohort_size: Some(90),
            }]
        );
        assert_eq!(
            reasons[0].to_string(),
            "subject 'S1' has no eligible classroom seating 90"
        );
    }

    #[test]
    fn test_insufficient_hours() {
        let m = model(
            vec![Subject::new("S1", "A", "D1").with_credits(2)],
            vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
            1,
            5,
        );
        assert_eq!(
            check_constructible(&m),
            vec![UnsatisfiableReason::InsufficientStaffHours {
                subject_id: "S1".into(),
                required: 2,
                available: 1,
            }]
        );
    }

    #[test]
    fn test_unbounded_hours_saturate() {
        let m = model(
            vec![Subject::new("S1", "A", "D1").with_credits(2)],
            vec![
                Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked(),
                Staff::new("U2", StaffRole::Professor, "D1").with_subject("S1").locked(),
            ],
            u32::MAX,
            5,
        );
        assert!(check_constructible(&m).is_empty());
    }

    #[test]
    fn test_insufficient_time_slots() {
        let m = model(
            vec![Subject::new("S1", "A", "D1").with_credits(4)],
            vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
            8,
            3,
        );
        assert_eq!(
            check_constructible(&m),
            vec![UnsatisfiableReason::InsufficientTimeSlots {
                required: 4,
                available: 3,
            }]
        );
    }
}
