//! Generation configuration.
//!
//! Option names follow the storage/API vocabulary (`timeGrid`,
//! `unitsPerCredit`, `capacityPolicy`, ...) so a configuration file can
//! be shared with the service that triggers generation.
//!
//! ```
//! use u_timetable::config::{CapacityPolicy, GenerationConfig};
//!
//! let config = GenerationConfig::from_toml_str(r#"
//!     unitsPerCredit = 2
//!     capacityPolicy = "soft"
//!     backtrackBudget = 5000
//!
//!     [softConstraintWeights]
//!     same_subject_same_day = 3
//! "#).unwrap();
//! assert_eq!(config.units_per_credit, 2);
//! assert_eq!(config.capacity_policy, CapacityPolicy::Soft);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::TimeGrid;

/// How classroom capacity relates to cohort size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Rooms smaller than the cohort are never used.
    #[default]
    Hard,
    /// Undersized rooms are allowed but penalized.
    Soft,
    /// Capacity is not consulted.
    Ignored,
}

/// Soft-constraint kinds, as reported in penalty breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftConstraintKind {
    /// A subject taught more than once on the same day.
    SameSubjectSameDay,
    /// A staff member's daily load varies across the week.
    UnevenStaffLoad,
    /// Department classrooms are used unevenly.
    UnevenClassroomUtilization,
    /// A unit placed in a room smaller than its cohort (soft capacity only).
    CapacityShortfall,
}

impl SoftConstraintKind {
    /// All kinds, in reporting order.
    pub const ALL: [SoftConstraintKind; 4] = [
        SoftConstraintKind::SameSubjectSameDay,
        SoftConstraintKind::UnevenStaffLoad,
        SoftConstraintKind::UnevenClassroomUtilization,
        SoftConstraintKind::CapacityShortfall,
    ];
}

/// Penalty weight per soft-constraint kind.
///
/// Serialized as a table keyed by kind name; missing kinds weigh 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoftConstraintWeights {
    /// Weight of [`SoftConstraintKind::SameSubjectSameDay`].
    pub same_subject_same_day: u32,
    /// Weight of [`SoftConstraintKind::UnevenStaffLoad`].
    pub uneven_staff_load: u32,
    /// Weight of [`SoftConstraintKind::UnevenClassroomUtilization`].
    pub uneven_classroom_utilization: u32,
    /// Weight of [`SoftConstraintKind::CapacityShortfall`].
    pub capacity_shortfall: u32,
}

impl Default for SoftConstraintWeights {
    fn default() -> Self {
        Self {
            same_subject_same_day: 1,
            uneven_staff_load: 1,
            uneven_classroom_utilization: 1,
            capacity_shortfall: 1,
        }
    }
}

impl SoftConstraintWeights {
    /// Weight of a kind.
    pub fn weight(&self, kind: SoftConstraintKind) -> u32 {
        match kind {
            SoftConstraintKind::SameSubjectSameDay => self.same_subject_same_day,
            SoftConstraintKind::UnevenStaffLoad => self.uneven_staff_load,
            SoftConstraintKind::UnevenClassroomUtilization => self.uneven_classroom_utilization,
            SoftConstraintKind::CapacityShortfall => self.capacity_shortfall,
        }
    }

    /// Sets the weight of a kind.
    pub fn set(&mut self, kind: SoftConstraintKind, weight: u32) {
        let slot = match kind {
            SoftConstraintKind::SameSubjectSameDay => &mut self.same_subject_same_day,
            SoftConstraintKind::UnevenStaffLoad => &mut self.uneven_staff_load,
            SoftConstraintKind::UnevenClassroomUtilization => {
                &mut self.uneven_classroom_utilization
            }
            SoftConstraintKind::CapacityShortfall => &mut self.capacity_shortfall,
        };
        *slot = weight;
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration.
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An option has an unusable value.
    #[error("invalid value for '{option}': {message}")]
    InvalidValue {
        option: &'static str,
        message: String,
    },
}

/// Options for one generation run (or batch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Enumerated (day, slot) cells.
    pub time_grid: TimeGrid,
    /// Units per credit.
    pub units_per_credit: u32,
    /// Department cap on units per subject.
    pub max_units_per_subject: Option<u32>,
    /// Capacity handling.
    pub capacity_policy: CapacityPolicy,
    /// Cohort size for subjects that declare none.
    pub default_cohort_size: Option<u32>,
    /// Maximum backtrack steps per search attempt.
    pub backtrack_budget: u64,
    /// Wall-clock budget per search attempt (ms).
    pub time_budget_ms: Option<u64>,
    /// Extra attempts with a randomized tie-break after budget exhaustion.
    pub restart_attempts: u32,
    /// Seed for randomized tie-breaking.
    pub random_seed: u64,
    /// Feasible solutions enumerated per attempt before keeping the best.
    pub max_solutions: usize,
    /// Penalty weight per soft-constraint kind.
    pub soft_constraint_weights: SoftConstraintWeights,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            time_grid: TimeGrid::standard_week(),
            units_per_credit: 1,
            max_units_per_subject: None,
            capacity_policy: CapacityPolicy::Hard,
            default_cohort_size: None,
            backtrack_budget: 200_000,
            time_budget_ms: None,
            restart_attempts: 0,
            random_seed: 0,
            max_solutions: 1,
            soft_constraint_weights: SoftConstraintWeights::default(),
        }
    }
}

impl GenerationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the time grid.
    pub fn with_time_grid(mut self, grid: TimeGrid) -> Self {
        self.time_grid = grid;
        self
    }

    /// Sets units per credit.
    pub fn with_units_per_credit(mut self, units: u32) -> Self {
        self.units_per_credit = units;
        self
    }

    /// Sets the per-subject unit cap.
    pub fn with_max_units_per_subject(mut self, cap: u32) -> Self {
        self.max_units_per_subject = Some(cap);
        self
    }

    /// Sets the capacity policy.
    pub fn with_capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }

    /// Sets the fallback cohort size.
    pub fn with_default_cohort_size(mut self, size: u32) -> Self {
        self.default_cohort_size = Some(size);
        self
    }

    /// Sets the backtrack budget.
    pub fn with_backtrack_budget(mut self, budget: u64) -> Self {
        self.backtrack_budget = budget;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    /// Sets restart attempts and their seed.
    pub fn with_restarts(mut self, attempts: u32, seed: u64) -> Self {
        self.restart_attempts = attempts;
        self.random_seed = seed;
        self
    }

    /// Sets the number of solutions enumerated per attempt.
    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    /// Sets a soft-constraint weight.
    pub fn with_soft_weight(mut self, kind: SoftConstraintKind, weight: u32) -> Self {
        self.soft_constraint_weights.set(kind, weight);
        self
    }

    /// Weight of a soft-constraint kind.
    pub fn soft_weight(&self, kind: SoftConstraintKind) -> u32 {
        self.soft_constraint_weights.weight(kind)
    }

    /// Wall-clock budget as a duration.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Checks option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_grid.is_empty() {
            return Err(ConfigError::InvalidValue {
                option: "timeGrid",
                message: "grid has no cells".into(),
            });
        }
        if let Some(cell) = self.time_grid.first_duplicate() {
            return Err(ConfigError::InvalidValue {
                option: "timeGrid",
                message: format!("duplicate cell ({}, {})", cell.day, cell.slot),
            });
        }
        if self.units_per_credit == 0 {
            return Err(ConfigError::InvalidValue {
                option: "unitsPerCredit",
                message: "must be at least 1".into(),
            });
        }
        if self.max_units_per_subject == Some(0) {
            return Err(ConfigError::InvalidValue {
                option: "maxUnitsPerSubject",
                message: "must be at least 1".into(),
            });
        }
        if self.max_solutions == 0 {
            return Err(ConfigError::InvalidValue {
                option: "maxSolutions",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridCell;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.time_grid.len(), 30);
        assert_eq!(config.units_per_credit, 1);
        assert_eq!(config.capacity_policy, CapacityPolicy::Hard);
        assert_eq!(config.soft_weight(SoftConstraintKind::UnevenStaffLoad), 1);
        assert!(config.time_budget().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = GenerationConfig::from_toml_str(
            r#"
            capacityPolicy = "ignored"
            restartAttempts = 3
            randomSeed = 42
            timeBudgetMs = 250
            timeGrid = [
                { day = "Mon", slot = "1" },
                { day = "Mon", slot = "2" },
            ]

            [softConstraintWeights]
            uneven_staff_load = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.capacity_policy, CapacityPolicy::Ignored);
        assert_eq!(config.restart_attempts, 3);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.time_budget(), Some(Duration::from_millis(250)));
        assert_eq!(config.time_grid.cell(1), Some(&GridCell::new("Mon", "2")));
        assert_eq!(config.soft_weight(SoftConstraintKind::UnevenStaffLoad), 5);
        assert_eq!(config.soft_weight(SoftConstraintKind::SameSubjectSameDay), 1);
        // Unspecified options keep their defaults.
        assert_eq!(config.backtrack_budget, 200_000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GenerationConfig::from_toml_str("unitsPerCredit = 0").unwrap_err();
        assert!(err.to_string().contains("unitsPerCredit"));

        let grid = TimeGrid::new(vec![GridCell::new("Mon", "1"), GridCell::new("Mon", "1")]);
        let err = GenerationConfig::new().with_time_grid(grid).validate().unwrap_err();
        assert!(err.to_string().contains("duplicate cell"));

        let err = GenerationConfig::new()
            .with_time_grid(TimeGrid::default())
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { option: "timeGrid", .. }));
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let err = GenerationConfig::from_toml_str("backtrackBugdet = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("backtrackBugdet"));

        let err = GenerationConfig::from_toml_str(
            r#"
            [softConstraintWeights]
            same_subjet_same_day = 3
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = GenerationConfig::from_toml_str("capacityPolicy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
