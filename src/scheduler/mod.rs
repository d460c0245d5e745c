//! Generation orchestration and timetable statistics.
//!
//! Drives the search for one department or a whole snapshot, guards it
//! with construction-level infeasibility checks and post-search
//! self-verification, and reports timetable KPIs.
//!
//! # Flow
//!
//! ```text
//! snapshot ─▶ TimetableModel ─▶ check_constructible ─▶ BacktrackingSolver
//!                                      │                    │ (restarts)
//!                                Unsatisfiable        verify_schedule
//!                                                           │
//!                                                 GeneratedSchedule / error
//! ```
//!
//! Multiple departments are generated in waves of staff-disjoint
//! departments ([`plan_waves`], [`TimetableGenerator::generate_all`]).
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod batch;
mod generator;
mod kpi;
mod precheck;
mod verify;
mod waves;

pub use batch::BatchReport;
pub use generator::{GeneratedSchedule, TimetableGenerator};
pub use kpi::ScheduleKpi;
pub use precheck::{check_constructible, UnsatisfiableReason};
pub use verify::{verify_schedule, InvariantBreach, InvariantKind};
pub use waves::{plan_waves, staff_conflicts};
