//! Validated, read-only snapshot of the timetabling entities.
//!
//! Constructed once per generation invocation, never mutated, and
//! discarded after the result is emitted. Construction runs
//! [`validate_snapshot`](crate::validation::validate_snapshot) and
//! resolves every staff member's role limits up front, so search only
//! ever sees plain numbers.

use std::collections::{BTreeMap, BTreeSet};

use super::{resolve_limits, Classroom, Department, RoleConstraint, RoleLimits, Staff, Subject};
use crate::error::{GenerationError, GenerationResult};
use crate::store::EntityStore;
use crate::validation::{validate_snapshot, ValidationError, ValidationErrorKind};

/// Immutable entity snapshot.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    departments: Vec<Department>,
    subjects: Vec<Subject>,
    staff: Vec<Staff>,
    classrooms: Vec<Classroom>,
    role_constraints: Vec<RoleConstraint>,
    limits: BTreeMap<String, RoleLimits>,
}

impl ScheduleSnapshot {
    /// Validates the entities and builds a snapshot.
    ///
    /// # Errors
    /// [`GenerationError::Configuration`] listing every validation issue,
    /// including role/subject-kind combinations without a role constraint.
    pub fn new(
        departments: Vec<Department>,
        subjects: Vec<Subject>,
        staff: Vec<Staff>,
        classrooms: Vec<Classroom>,
        role_constraints: Vec<RoleConstraint>,
    ) -> GenerationResult<Self> {
        validate_snapshot(&departments, &subjects, &staff, &classrooms, &role_constraints)
            .map_err(|issues| GenerationError::Configuration { issues })?;

        let mut limits = BTreeMap::new();
        let mut issues = Vec::new();
        for member in &staff {
            let kinds: Vec<_> = member
                .selected_subjects
                .iter()
                .filter_map(|id| subjects.iter().find(|s| &s.id == id))
                .map(|s| s.kind)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            match resolve_limits(&role_constraints, member, &kinds) {
                Ok(Some(resolved)) => {
                    limits.insert(member.id.clone(), resolved);
                }
                Ok(None) => {}
                Err(kind) => issues.push(ValidationError::new(
                    ValidationErrorKind::MissingRoleConstraint,
                    format!(
                        "Staff '{}' ({:?}) has no role constraint covering {:?} subjects",
                        member.id, member.role, kind
                    ),
                )),
            }
        }
        if !issues.is_empty() {
            return Err(GenerationError::Configuration { issues });
        }

        Ok(Self {
            departments,
            subjects,
            staff,
            classrooms,
            role_constraints,
            limits,
        })
    }

    /// Loads every department's entities from a store and validates them.
    ///
    /// # Errors
    /// As [`ScheduleSnapshot::new`].
    pub fn from_store<S: EntityStore + ?Sized>(store: &S) -> GenerationResult<Self> {
        let departments = store.departments();
        let mut subjects = Vec::new();
        let mut staff = Vec::new();
        let mut classrooms = Vec::new();
        for dept in &departments {
            subjects.extend(store.subjects(&dept.id));
            staff.extend(store.staff(&dept.id));
            classrooms.extend(store.classrooms(&dept.id));
        }
        Self::new(
            departments,
            subjects,
            staff,
            classrooms,
            store.role_constraints(),
        )
    }

    /// All departments, in input order.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Department by ID.
    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    /// All subjects.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Subject by ID.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Subjects of a department, sorted by ID.
    pub fn subjects_of(&self, department_id: &str) -> Vec<&Subject> {
        let mut subjects: Vec<_> = self
            .subjects
            .iter()
            .filter(|s| s.department_id == department_id)
            .collect();
        subjects.sort_by(|a, b| a.id.cmp(&b.id));
        subjects
    }

    /// All staff.
    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    /// Staff member by ID.
    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    /// All classrooms.
    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    /// Classrooms of a department, sorted by ID.
    pub fn classrooms_of(&self, department_id: &str) -> Vec<&Classroom> {
        let mut rooms: Vec<_> = self
            .classrooms
            .iter()
            .filter(|c| c.department_id == department_id)
            .collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    /// All role constraints.
    pub fn role_constraints(&self) -> &[RoleConstraint] {
        &self.role_constraints
    }

    /// Resolved limits of a staff member (`None` if they selected nothing).
    pub fn limits(&self, staff_id: &str) -> Option<RoleLimits> {
        self.limits.get(staff_id).copied()
    }

    /// Departments whose subjects a staff member selected, sorted.
    pub fn departments_taught_by(&self, staff: &Staff) -> BTreeSet<String> {
        staff
            .selected_subjects
            .iter()
            .filter_map(|id| self.subject(id))
            .map(|s| s.department_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::cp::{StaffLedger, TimetableModel};
    use crate::models::{StaffRole, SubjectKind, SubjectType};

    fn snapshot() -> GenerationResult<ScheduleSnapshot> {
        ScheduleSnapshot::new(
            vec![Department::new("D1", "CSE"), Department::new("D2", "ECE")],
            vec![
                Subject::new("S2", "CS102", "D1"),
                Subject::new("S1", "CS101", "D1"),
                Subject::new("E1", "EC101", "D2").with_kind(SubjectKind::Lab),
            ],
            vec![
                Staff::new("U1", StaffRole::Professor, "D1")
                    .with_subject("S1")
                    .with_subject("E1")
                    .locked(),
                Staff::new("U2", StaffRole::Hod, "D1"),
            ],
            vec![Classroom::new("R2", 40, "D1"), Classroom::new("R1", 40, "D1")],
            vec![
                RoleConstraint::global(StaffRole::Professor, SubjectType::Theory).with_limits(2, 10),
                RoleConstraint::global(StaffRole::Professor, SubjectType::Lab).with_limits(3, 6),
            ],
        )
    }

    #[test]
    fn test_accessors_sorted() {
        let snap = snapshot().unwrap();
        let ids: Vec<_> = snap.subjects_of("D1").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        let rooms: Vec<_> = snap.classrooms_of("D1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(rooms, vec!["R1", "R2"]);
        assert!(snap.department("D2").is_some());
        assert!(snap.classrooms_of("D2").is_empty());
    }

    #[test]
    fn test_limits_resolved_once() {
        let snap = snapshot().unwrap();
        assert_eq!(
            snap.limits("U1"),
            Some(RoleLimits { max_subjects: 2, max_hours: 6 })
        );
        // No selection, no limits (and no coverage requirement).
        assert_eq!(snap.limits("U2"), None);
    }

    #[test]
    fn test_departments_taught_by() {
        let snap = snapshot().unwrap();
        let u1 = snap.staff_member("U1").unwrap();
        let depts: Vec<_> = snap.departments_taught_by(u1).into_iter().collect();
        assert_eq!(depts, vec!["D1".to_string(), "D2".to_string()]);
    }

    #[test]
    fn test_model_rejects_staff_without_limits() {
        let mut snap = snapshot().unwrap();
        snap.limits.remove("U1");
        let err = TimetableModel::build(
            &snap,
            "D1",
            &GenerationConfig::default(),
            &StaffLedger::new(),
        )
        .unwrap_err();
        match err {
            GenerationError::Configuration { issues } => {
                assert_eq!(issues[0].kind, ValidationErrorKind::MissingRoleConstraint);
                assert!(issues[0].message.contains("U1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_snapshot_is_configuration_error() {
        let err = ScheduleSnapshot::new(
            vec![Department::new("D1", "CSE")],
            vec![Subject::new("S1", "CS101", "D1")],
            vec![Staff::new("U1", StaffRole::Hod, "D1").with_subject("S1").locked()],
            vec![],
            vec![],
        )
        .unwrap_err();
        match err {
            GenerationError::Configuration { issues } => {
                assert_eq!(issues[0].kind, ValidationErrorKind::MissingRoleConstraint);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
