//! Timetabling domain models.
//!
//! Immutable snapshot types consumed by one generation run, plus the
//! schedule (output) types written back to storage.
//!
//! # Domain Mappings
//!
//! | u-timetable | Storage table | Role in search |
//! |-------------|----------------|----------------|
//! | Department | departments | Generation scope |
//! | Subject | subjects | Source of teaching units |
//! | Staff | users (staff) | Value component, globally exclusive |
//! | Classroom | classrooms | Value component, department-local |
//! | RoleConstraint | constraints | Per-staff load limits |
//! | TimeGrid | (fixed) | Value component (day, slot) |
//! | Schedule | timetables | Output rows |

mod classroom;
mod department;
mod role_constraint;
mod schedule;
mod snapshot;
mod staff;
mod subject;
mod time_grid;

pub use classroom::Classroom;
pub use department::Department;
pub use role_constraint::{RoleConstraint, RoleLimits, SubjectType};
pub(crate) use role_constraint::{resolve_limits, role_constraint_coverage};
pub use schedule::{Assignment, Schedule};
pub use snapshot::ScheduleSnapshot;
pub use staff::{Staff, StaffRole};
pub use subject::{Subject, SubjectKind};
pub use time_grid::{GridCell, TimeGrid};
