//! Storage collaborators.
//!
//! The generator neither loads nor persists anything itself. An
//! [`EntityStore`] supplies the entities a snapshot is built from, and a
//! [`ScheduleSink`] receives each finished department timetable as one
//! atomic replace.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{Assignment, Classroom, Department, RoleConstraint, Staff, Subject};

/// Read access to timetabling entities, keyed by department.
///
/// Implementations load eagerly; a snapshot is built once per run.
pub trait EntityStore {
    /// All departments.
    fn departments(&self) -> Vec<Department>;
    /// Subjects owned by a department.
    fn subjects(&self, department_id: &str) -> Vec<Subject>;
    /// Staff whose home is a department, with selection and lock state.
    fn staff(&self, department_id: &str) -> Vec<Staff>;
    /// Classrooms owned by a department.
    fn classrooms(&self, department_id: &str) -> Vec<Classroom>;
    /// Global and department-scoped role constraints.
    fn role_constraints(&self) -> Vec<RoleConstraint>;
}

/// Persistence sink rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink refused the rows.
    #[error("sink rejected schedule for department '{department_id}': {message}")]
    Rejected {
        department_id: String,
        message: String,
    },
}

/// Receiver of finished timetables.
pub trait ScheduleSink {
    /// Replaces a department's whole timetable with `rows`.
    ///
    /// Implementations must apply all rows or none.
    fn replace_department_schedule(
        &mut self,
        department_id: &str,
        rows: &[Assignment],
    ) -> Result<(), SinkError>;
}

/// In-memory [`EntityStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    departments: Vec<Department>,
    subjects: Vec<Subject>,
    staff: Vec<Staff>,
    classrooms: Vec<Classroom>,
    role_constraints: Vec<RoleConstraint>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a department.
    pub fn with_department(mut self, department: Department) -> Self {
        self.departments.push(department);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a staff member.
    pub fn with_staff(mut self, staff: Staff) -> Self {
        self.staff.push(staff);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    /// Adds a role constraint.
    pub fn with_role_constraint(mut self, constraint: RoleConstraint) -> Self {
        self.role_constraints.push(constraint);
        self
    }
}

impl EntityStore for MemoryStore {
    fn departments(&self) -> Vec<Department> {
        self.departments.clone()
    }

    fn subjects(&self, department_id: &str) -> Vec<Subject> {
        self.subjects
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect()
    }

    fn staff(&self, department_id: &str) -> Vec<Staff> {
        self.staff
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect()
    }

    fn classrooms(&self, department_id: &str) -> Vec<Classroom> {
        self.classrooms
            .iter()
            .filter(|c| c.department_id == department_id)
            .cloned()
            .collect()
    }

    fn role_constraints(&self) -> Vec<RoleConstraint> {
        self.role_constraints.clone()
    }
}

/// In-memory [`ScheduleSink`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    schedules: BTreeMap<String, Vec<Assignment>>,
    replacements: usize,
}

impl InMemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored rows of a department.
    pub fn rows(&self, department_id: &str) -> Option<&[Assignment]> {
        self.schedules.get(department_id).map(Vec::as_slice)
    }

    /// Departments with a stored timetable.
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.schedules.keys().map(String::as_str)
    }

    /// Number of replace operations applied.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl ScheduleSink for InMemorySink {
    fn replace_department_schedule(
        &mut self,
        department_id: &str,
        rows: &[Assignment],
    ) -> Result<(), SinkError> {
        if let Some(row) = rows.iter().find(|r| r.department_id != department_id) {
            return Err(SinkError::Rejected {
                department_id: department_id.to_string(),
                message: format!("row belongs to department '{}'", row.department_id),
            });
        }
        self.schedules
            .insert(department_id.to_string(), rows.to_vec());
        self.replacements += 1;
        Ok(())
    }
}
