//! Role-based teaching-load constraints.
//!
//! Each constraint bounds how many distinct subjects and how many weekly
//! units a staff member of a given role may teach. Constraints are either
//! global or scoped to one department; a department-scoped constraint
//! shadows global ones of the same role for staff of that department.
//!
//! # Resolution
//! For every subject kind a staff member selected, the most specific
//! matching constraint is chosen (department scope over global, exact
//! kind over `both`). The staff member's limit pair is the component-wise
//! minimum over those matches, so search never consults roles again.

use serde::{Deserialize, Serialize};

use super::{Staff, StaffRole, SubjectKind};

/// Subject formats a role constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// Theory subjects only.
    Theory,
    /// Lab subjects only.
    Lab,
    /// Both theory and lab subjects.
    Both,
}

impl SubjectType {
    /// Whether this type covers the given subject kind.
    #[inline]
    pub fn covers(self, kind: SubjectKind) -> bool {
        matches!(
            (self, kind),
            (SubjectType::Both, _)
                | (SubjectType::Theory, SubjectKind::Theory)
                | (SubjectType::Lab, SubjectKind::Lab)
        )
    }

    fn is_exact(self) -> bool {
        !matches!(self, SubjectType::Both)
    }
}

/// A teaching-load rule for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConstraint {
    /// Department scope; `None` means global.
    pub department_id: Option<String>,
    /// Role the rule applies to.
    pub role: StaffRole,
    /// Subject formats the rule applies to.
    pub subject_type: SubjectType,
    /// Maximum distinct subjects per staff member.
    pub max_subjects: u32,
    /// Maximum weekly teaching units per staff member.
    pub max_hours: u32,
}

/// Resolved numeric limits for one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLimits {
    /// Maximum distinct subjects.
    pub max_subjects: u32,
    /// Maximum weekly units.
    pub max_hours: u32,
}

impl RoleConstraint {
    /// Creates a global constraint with the stock defaults
    /// (1 subject, 8 hours).
    pub fn global(role: StaffRole, subject_type: SubjectType) -> Self {
        Self {
            department_id: None,
            role,
            subject_type,
            max_subjects: 1,
            max_hours: 8,
        }
    }

    /// Creates a department-scoped constraint.
    pub fn for_department(
        department_id: impl Into<String>,
        role: StaffRole,
        subject_type: SubjectType,
    ) -> Self {
        Self {
            department_id: Some(department_id.into()),
            ..Self::global(role, subject_type)
        }
    }

    /// Sets both limits.
    pub fn with_limits(mut self, max_subjects: u32, max_hours: u32) -> Self {
        self.max_subjects = max_subjects;
        self.max_hours = max_hours;
        self
    }

    /// Whether this is a global-scope constraint.
    #[inline]
    pub fn is_global(&self) -> bool {
        self.department_id.is_none()
    }

    /// Numeric limit pair of this constraint.
    #[inline]
    pub fn limits(&self) -> RoleLimits {
        RoleLimits {
            max_subjects: self.max_subjects,
            max_hours: self.max_hours,
        }
    }
}

impl RoleLimits {
    /// Component-wise minimum.
    pub fn tightest(self, other: Self) -> Self {
        Self {
            max_subjects: self.max_subjects.min(other.max_subjects),
            max_hours: self.max_hours.min(other.max_hours),
        }
    }
}

/// Finds the most specific constraint for a role and subject kind.
///
/// Returns `None` when no constraint covers the combination.
pub(crate) fn matching_constraint<'a>(
    constraints: &'a [RoleConstraint],
    role: StaffRole,
    department_id: &str,
    kind: SubjectKind,
) -> Option<&'a RoleConstraint> {
    let candidates = |scoped: bool| {
        constraints.iter().filter(move |c| {
            c.role == role
                && c.subject_type.covers(kind)
                && if scoped {
                    c.department_id.as_deref() == Some(department_id)
                } else {
                    c.is_global()
                }
        })
    };

    let scoped = candidates(true).next().is_some();

    // Exact kind first, then `both`; first declared wins within a tier.
    candidates(scoped)
        .find(|c| c.subject_type.is_exact())
        .or_else(|| candidates(scoped).next())
}

/// Resolves a staff member's limit pair over the kinds they teach.
///
/// # Errors
/// Returns the first uncovered subject kind.
pub(crate) fn resolve_limits(
    constraints: &[RoleConstraint],
    staff: &Staff,
    kinds: &[SubjectKind],
) -> Result<Option<RoleLimits>, SubjectKind> {
    let mut resolved: Option<RoleLimits> = None;
    for &kind in kinds {
        let constraint = matching_constraint(constraints, staff.role, &staff.department_id, kind)
            .ok_or(kind)?;
        let limits = constraint.limits();
        resolved = Some(match resolved {
            Some(prev) => prev.tightest(limits),
            None => limits,
        });
    }
    Ok(resolved)
}

/// Subject kinds a staff member teaches that no constraint covers.
pub(crate) fn role_constraint_coverage(
    constraints: &[RoleConstraint],
    staff: &Staff,
    kinds: impl IntoIterator<Item = SubjectKind>,
) -> Vec<SubjectKind> {
    kinds
        .into_iter()
        .filter(|&k| matching_constraint(constraints, staff.role, &staff.department_id, k).is_none())
        .collect()
}
