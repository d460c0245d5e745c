//! Constraint-satisfaction formulation of a department timetable.
//!
//! Each teaching unit is a variable; each value is a
//! `(staff, classroom, cell)` triple. The search places one unit at a
//! time and prunes the remaining domains after every placement.
//!
//! | Type | Role |
//! |------|------|
//! | [`TimetableModel`] | Dense, index-based problem for one department |
//! | [`Occupancy`] | Partial assignment with checkpoint/rollback |
//! | [`StaffLedger`] | Staff commitments made by other departments |
//! | [`BacktrackingSolver`] | MRV/LCV search with forward checking |
//! | [`SearchDiagnostic`] | Report of a failed search |
//!
//! # Reference
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Dechter (2003), "Constraint Processing"

mod diagnostic;
mod ledger;
mod model;
mod occupancy;
mod solver;

pub use diagnostic::{BlockingUnit, SearchDiagnostic};
pub use ledger::{StaffCommitment, StaffLedger};
pub use model::{
    Candidate, ClassroomEntry, Placement, StaffEntry, SubjectEntry, TimetableModel, UnitVar,
};
pub use occupancy::Occupancy;
pub use solver::{
    BacktrackingSolver, BlockingVar, SearchLimits, SearchOutcome, SearchStats, Solution,
    StopReason,
};
