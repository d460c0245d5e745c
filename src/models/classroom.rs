//! Classroom model.

use serde::{Deserialize, Serialize};

/// A classroom owned by one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Seating capacity (positive).
    pub capacity: u32,
    /// Owning department.
    pub department_id: String,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>, capacity: u32, department_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            department_id: department_id.into(),
        }
    }

    /// Sets the classroom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the room seats a cohort of the given size.
    ///
    /// An unknown cohort always fits.
    #[inline]
    pub fn seats(&self, cohort: Option<u32>) -> bool {
        cohort.map_or(true, |c| self.capacity >= c)
    }
}
