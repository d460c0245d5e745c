//! Department model.

use serde::{Deserialize, Serialize};

/// An academic department: the scope of one generated timetable.
///
/// Owns its subjects and classrooms; staff belong to a home department
/// but may teach any subject they selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique department identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short unique code (e.g., "CSE").
    pub code: String,
}

impl Department {
    /// Creates a department with the given id and code.
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            code: code.into(),
        }
    }

    /// Sets the department name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_builder() {
        let d = Department::new("D1", "CSE").with_name("Computer Science");
        assert_eq!(d.id, "D1");
        assert_eq!(d.code, "CSE");
        assert_eq!(d.name, "Computer Science");
    }
}
