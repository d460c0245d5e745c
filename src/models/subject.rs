//! Subject model.
//!
//! A subject's credit count determines how many weekly teaching units
//! (one unit = one grid cell) it needs. The conversion policy lives in
//! [`Subject::required_units`] so it is explicit at every call site.

use serde::{Deserialize, Serialize};

/// Teaching format of a subject, matched against
/// [`SubjectType`](super::SubjectType) in role constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// Lecture-style subject.
    Theory,
    /// Laboratory subject.
    Lab,
}

/// A subject taught within one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Course code (e.g., "CS101").
    pub code: String,
    /// Owning department.
    pub department_id: String,
    /// Credit count (positive).
    pub credits: u32,
    /// Teaching format (default: theory).
    pub kind: SubjectKind,
    /// Expected number of students, compared against classroom capacity.
    pub cohort_size: Option<u32>,
}

impl Subject {
    /// Creates a theory subject with the default of 3 credits.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        department_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            code: code.into(),
            department_id: department_id.into(),
            credits: 3,
            kind: SubjectKind::Theory,
            cohort_size: None,
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the teaching format.
    pub fn with_kind(mut self, kind: SubjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the expected cohort size.
    pub fn with_cohort_size(mut self, size: u32) -> Self {
        self.cohort_size = Some(size);
        self
    }

    /// Weekly teaching units required by this subject.
    ///
    /// `credits * units_per_credit`, raised to at least 1 and capped at
    /// `max_units` when a department cap is configured.
    pub fn required_units(&self, units_per_credit: u32, max_units: Option<u32>) -> u32 {
        let units = self.credits.saturating_mul(units_per_credit).max(1);
        match max_units {
            Some(cap) => units.min(cap.max(1)),
            None => units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_defaults() {
        let s = Subject::new("S1", "CS101", "D1");
        assert_eq!(s.credits, 3);
        assert_eq!(s.kind, SubjectKind::Theory);
        assert!(s.cohort_size.is_none());
    }

    #[test]
    fn test_required_units_policy() {
        let s = Subject::new("S1", "CS101", "D1").with_credits(4);
        assert_eq!(s.required_units(1, None), 4);
        assert_eq!(s.required_units(2, None), 8);
        assert_eq!(s.required_units(2, Some(5)), 5);
        assert_eq!(s.required_units(0, None), 1); // floor of one unit
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&SubjectKind::Lab).unwrap();
        assert_eq!(json, "\"lab\"");
    }
}
