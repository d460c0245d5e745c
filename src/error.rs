//! Error types for timetable generation.
//!
//! Uses `thiserror` for the library error taxonomy:
//!
//! | Variant | Meaning | Recoverable by |
//! |---------|---------|----------------|
//! | `Configuration` | Snapshot fails validation (incl. role coverage) | Fixing data |
//! | `UnknownDepartment` | No such department in the snapshot | Fixing the request |
//! | `Unsatisfiable` | Provably infeasible before search | Adding staff/rooms |
//! | `SearchExhausted` | Budget consumed without a timetable | Larger budget, new seed |
//! | `InvariantViolation` | Self-check failed on a search result | Never (internal defect) |

use thiserror::Error;

use crate::cp::SearchDiagnostic;
use crate::scheduler::{InvariantBreach, UnsatisfiableReason};
use crate::validation::ValidationError;

/// Result type alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Why a department timetable could not be produced.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    /// Snapshot is malformed or lacks role-constraint coverage.
    #[error("configuration error: {}", join(.issues))]
    Configuration { issues: Vec<ValidationError> },

    /// The requested department is not part of the snapshot.
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),

    /// Infeasible by construction; names every offending subject.
    #[error("department '{department_id}' is unsatisfiable: {}", join(.reasons))]
    Unsatisfiable {
        department_id: String,
        reasons: Vec<UnsatisfiableReason>,
    },

    /// Search budget consumed (or search space exhausted) without a timetable.
    #[error("{0}")]
    SearchExhausted(Box<SearchDiagnostic>),

    /// A search result failed self-verification.
    #[error("invariant violation in department '{department_id}': {}", join(.breaches))]
    InvariantViolation {
        department_id: String,
        breaches: Vec<InvariantBreach>,
    },
}

impl GenerationError {
    /// Whether a caller may succeed by retrying with a different budget or seed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::SearchExhausted(_))
    }

    /// Search diagnostic, if this is a search failure.
    pub fn diagnostic(&self) -> Option<&SearchDiagnostic> {
        match self {
            GenerationError::SearchExhausted(d) => Some(d),
            _ => None,
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
