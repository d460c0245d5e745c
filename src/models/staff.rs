//! Teaching staff model.

use serde::{Deserialize, Serialize};

/// Academic role; selects which [`RoleConstraint`](super::RoleConstraint) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Assistant professor.
    AssistantProfessor,
    /// Professor.
    Professor,
    /// Head of department.
    Hod,
}

/// A teaching staff member with their subject selection.
///
/// A staff member is schedulable only once `locked` is set: the
/// selection is then final and the orchestrator may rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Academic role.
    pub role: StaffRole,
    /// Home department (selects department-scoped role constraints).
    pub department_id: String,
    /// Subjects this staff member selected to teach.
    pub selected_subjects: Vec<String>,
    /// Whether the selection is final.
    pub locked: bool,
}

impl Staff {
    /// Creates an unlocked staff member with no selection.
    pub fn new(id: impl Into<String>, role: StaffRole, department_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role,
            department_id: department_id.into(),
            selected_subjects: Vec::new(),
            locked: false,
        }
    }

    /// Sets the staff name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a selected subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.selected_subjects.push(subject_id.into());
        self
    }

    /// Marks the selection as final.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Whether this staff member selected the subject.
    pub fn has_selected(&self, subject_id: &str) -> bool {
        self.selected_subjects.iter().any(|s| s == subject_id)
    }

    /// Whether this staff member may be scheduled at all.
    #[inline]
    pub fn is_schedulable(&self) -> bool {
        self.locked && !self.selected_subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_builder() {
        let s = Staff::new("U1", StaffRole::Professor, "D1")
            .with_name("Dr. Rao")
            .with_subject("S1")
            .with_subject("S2");
        assert!(s.has_selected("S2"));
        assert!(!s.has_selected("S3"));
        assert!(!s.is_schedulable());
        assert!(s.locked().is_schedulable());
    }

    #[test]
    fn test_locked_without_selection_is_not_schedulable() {
        let s = Staff::new("U1", StaffRole::Hod, "D1").locked();
        assert!(!s.is_schedulable());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&StaffRole::AssistantProfessor).unwrap();
        assert_eq!(json, "\"assistant_professor\"");
    }
}
