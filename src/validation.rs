//! Input validation for timetable snapshots.
//!
//! Checks structural integrity of departments, subjects, staff,
//! classrooms, and role constraints before any generation. Detects:
//! - Duplicate IDs (and duplicate department codes)
//! - References to unknown departments or subjects
//! - Non-positive credit counts and classroom capacities
//! - Staff whose role/subject-kind combination has no role constraint
//!
//! All problems are collected; validation never stops at the first one.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::models::role_constraint_coverage;
use crate::models::{Classroom, Department, RoleConstraint, Staff, Subject};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description naming the offending entity.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID (or two departments the same code).
    DuplicateId,
    /// An entity references a department that doesn't exist.
    UnknownDepartment,
    /// A staff selection references a subject that doesn't exist.
    UnknownSubject,
    /// A subject has zero credits.
    InvalidCredits,
    /// A classroom has zero capacity.
    InvalidCapacity,
    /// A staff role/subject-kind combination has no matching role constraint.
    MissingRoleConstraint,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a snapshot's entities.
///
/// Checks:
/// 1. No duplicate department IDs or codes
/// 2. No duplicate subject, staff, or classroom IDs
/// 3. Subjects, classrooms, staff, and scoped constraints reference existing departments
/// 4. Subjects have positive credits; classrooms have positive capacity
/// 5. Staff selections reference existing subjects
/// 6. Every staff role × selected subject kind is covered by a role constraint
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(
    departments: &[Department],
    subjects: &[Subject],
    staff: &[Staff],
    classrooms: &[Classroom],
    constraints: &[RoleConstraint],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut department_ids = HashSet::new();
    let mut department_codes = HashSet::new();
    for d in departments {
        if !department_ids.insert(d.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate department ID: {}", d.id),
            ));
        }
        if !department_codes.insert(d.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate department code: {}", d.code),
            ));
        }
    }

    let mut subject_ids = HashSet::new();
    for s in subjects {
        if !subject_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
        if !department_ids.contains(s.department_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDepartment,
                format!(
                    "Subject '{}' references unknown department '{}'",
                    s.id, s.department_id
                ),
            ));
        }
        if s.credits == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCredits,
                format!("Subject '{}' has zero credits", s.id),
            ));
        }
    }

    let mut classroom_ids = HashSet::new();
    for c in classrooms {
        if !classroom_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate classroom ID: {}", c.id),
            ));
        }
        if !department_ids.contains(c.department_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDepartment,
                format!(
                    "Classroom '{}' references unknown department '{}'",
                    c.id, c.department_id
                ),
            ));
        }
        if c.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Classroom '{}' has zero capacity", c.id),
            ));
        }
    }

    let mut staff_ids = HashSet::new();
    for member in staff {
        if !staff_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate staff ID: {}", member.id),
            ));
        }
        if !department_ids.contains(member.department_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDepartment,
                format!(
                    "Staff '{}' references unknown department '{}'",
                    member.id, member.department_id
                ),
            ));
        }
        for selected in &member.selected_subjects {
            if !subject_ids.contains(selected.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSubject,
                    format!(
                        "Staff '{}' selected unknown subject '{}'",
                        member.id, selected
                    ),
                ));
            }
        }
    }

    for c in constraints {
        if let Some(scope) = &c.department_id {
            if !department_ids.contains(scope.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDepartment,
                    format!(
                        "Role constraint for {:?} references unknown department '{}'",
                        c.role, scope
                    ),
                ));
            }
        }
    }

    // Role coverage: one error per (staff, kind) gap.
    for member in staff {
        let kinds: BTreeSet<_> = member
            .selected_subjects
            .iter()
            .filter_map(|id| subjects.iter().find(|s| &s.id == id))
            .map(|s| s.kind)
            .collect();
        for kind in role_constraint_coverage(constraints, member, kinds) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingRoleConstraint,
                format!(
                    "Staff '{}' ({:?}) has no role constraint covering {:?} subjects",
                    member.id, member.role, kind
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StaffRole, SubjectKind, SubjectType};

    fn departments() -> Vec<Department> {
        vec![Department::new("D1", "CSE"), Department::new("D2", "ECE")]
    }

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("S1", "CS101", "D1"),
            Subject::new("S2", "CS102L", "D1").with_kind(SubjectKind::Lab),
        ]
    }

    fn classrooms() -> Vec<Classroom> {
        vec![Classroom::new("R1", 60, "D1")]
    }

    fn constraints() -> Vec<RoleConstraint> {
        vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both)]
    }

    fn staff() -> Vec<Staff> {
        vec![Staff::new("U1", StaffRole::Professor, "D1")
            .with_subject("S1")
            .with_subject("S2")
            .locked()]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_snapshot(
            &departments(),
            &subjects(),
            &staff(),
            &classrooms(),
            &constraints()
        )
        .is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut subjects = subjects();
        subjects.push(Subject::new("S1", "DUP", "D1"));
        let mut departments = departments();
        departments.push(Department::new("D3", "CSE"));

        let errors = validate_snapshot(
            &departments,
            &subjects,
            &staff(),
            &classrooms(),
            &constraints(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("subject")));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("code")));
    }

    #[test]
    fn test_unknown_department_reference() {
        let classrooms = vec![Classroom::new("R9", 30, "NOPE")];
        let errors = validate_snapshot(
            &departments(),
            &subjects(),
            &staff(),
            &classrooms,
            &constraints(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownDepartment && e.message.contains("R9")));
    }

    #[test]
    fn test_unknown_subject_selection() {
        let staff = vec![Staff::new("U1", StaffRole::Professor, "D1")
            .with_subject("S404")
            .locked()];
        let errors =
            validate_snapshot(&departments(), &subjects(), &staff, &classrooms(), &constraints())
                .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownSubject));
    }

    #[test]
    fn test_zero_credits_and_capacity() {
        let subjects = vec![Subject::new("S1", "CS101", "D1").with_credits(0)];
        let classrooms = vec![Classroom::new("R1", 0, "D1")];
        let errors = validate_snapshot(&departments(), &subjects, &[], &classrooms, &[])
            .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCredits));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCapacity));
    }

    #[test]
    fn test_missing_role_coverage_names_staff() {
        let constraints = vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Theory)];
        let errors = validate_snapshot(
            &departments(),
            &subjects(),
            &staff(),
            &classrooms(),
            &constraints,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingRoleConstraint);
        assert!(errors[0].message.contains("U1"));
        assert!(errors[0].message.contains("Lab"));
    }

    #[test]
    fn test_multiple_errors() {
        let subjects = vec![Subject::new("S1", "CS101", "NOPE").with_credits(0)];
        let errors = validate_snapshot(&departments(), &subjects, &[], &[], &[]).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
