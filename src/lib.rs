//! Weekly class-timetable generation for academic departments.
//!
//! Assigns every required teaching unit of a department to a
//! (staff, classroom, day, slot) tuple such that no staff member, room,
//! or department cell is double-booked, staff teach only what they
//! selected, and per-role load limits hold. The problem is solved as a
//! constraint-satisfaction search with forward checking.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Department`, `Subject`, `Staff`,
//!   `Classroom`, `RoleConstraint`, `TimeGrid`, `Schedule`, and the
//!   validated `ScheduleSnapshot`
//! - **`validation`**: Snapshot integrity checks (duplicate IDs, references,
//!   role-constraint coverage)
//! - **`config`**: Generation options (`GenerationConfig`)
//! - **`evaluator`**: Hard-constraint checks and soft-constraint scoring
//! - **`cp`**: CSP model, occupancy tables, staff ledger, backtracking solver
//! - **`scheduler`**: Per-department and batch generation, self-checks, KPIs
//! - **`store`**: Entity store and persistence sink interfaces
//! - **`error`**: Generation error taxonomy
//!
//! # Example
//!
//! ```
//! use u_timetable::config::GenerationConfig;
//! use u_timetable::cp::StaffLedger;
//! use u_timetable::models::{
//!     Classroom, Department, RoleConstraint, ScheduleSnapshot, Staff, StaffRole, Subject,
//!     SubjectType,
//! };
//! use u_timetable::scheduler::TimetableGenerator;
//!
//! let snapshot = ScheduleSnapshot::new(
//!     vec![Department::new("D1", "CSE").with_name("Computer Science")],
//!     vec![Subject::new("S1", "CS101", "D1").with_credits(3)],
//!     vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
//!     vec![Classroom::new("R1", 60, "D1")],
//!     vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both).with_limits(2, 12)],
//! )
//! .unwrap();
//!
//! let generator = TimetableGenerator::new(GenerationConfig::default()).unwrap();
//! let mut ledger = StaffLedger::new();
//! let report = generator.generate_all(&snapshot, &mut ledger);
//! assert!(report.is_complete());
//! assert_eq!(report.schedule("D1").unwrap().assignment_count(), 3);
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod cp;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;
