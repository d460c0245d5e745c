//! Index-based CSP model of one department.
//!
//! Compiles a snapshot into dense tables the search can index directly:
//! subjects, staff, and classrooms become `usize` handles, and every
//! teaching unit becomes a variable with a precomputed static domain.
//!
//! # Static domain
//! A unit of subject `s` may take `(staff, classroom, cell)` iff
//! - the staff member is locked and selected `s`,
//! - the classroom belongs to the department (and, under hard capacity,
//!   seats the cohort),
//! - the placement passes every hard constraint against the empty
//!   department seeded with ledger commitments.
//!
//! # Ordering
//! Staff and classrooms are sorted by ID and cells keep grid order, so
//! candidate index order is (staff id, classroom id, day, slot): the
//! deterministic tie-break order of the search.

use std::collections::BTreeSet;

use tracing::warn;

use super::{Occupancy, StaffLedger};
use crate::config::{CapacityPolicy, GenerationConfig};
use crate::error::{GenerationError, GenerationResult};
use crate::evaluator::can_place;
use crate::models::{Assignment, RoleLimits, Schedule, ScheduleSnapshot, TimeGrid};
use crate::validation::{ValidationError, ValidationErrorKind};

/// A candidate value: who teaches, where, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Staff handle.
    pub staff: usize,
    /// Classroom handle.
    pub classroom: usize,
    /// Grid cell index.
    pub cell: usize,
}

/// A unit of a subject placed at a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Subject handle.
    pub subject: usize,
    /// Chosen value.
    pub candidate: Candidate,
}

/// Subject as seen by the search.
#[derive(Debug, Clone)]
pub struct SubjectEntry {
    /// Subject ID.
    pub id: String,
    /// Credit weight (variable-ordering tie-break).
    pub credits: u32,
    /// Units to place.
    pub required_units: u32,
    /// Effective cohort size.
    pub cohort: Option<u32>,
    /// Qualified staff handles, ascending.
    pub qualified_staff: Vec<usize>,
    /// Usable classroom handles, ascending.
    pub eligible_classrooms: Vec<usize>,
}

/// Staff member as seen by the search.
#[derive(Debug, Clone)]
pub struct StaffEntry {
    /// Staff ID.
    pub id: String,
    /// Resolved role limits.
    pub limits: RoleLimits,
    /// Units already taught in other departments.
    pub committed_hours: u32,
    /// Distinct subjects already taught in other departments.
    pub committed_subjects: u32,
    /// Cells already taken in other departments.
    pub busy: Vec<bool>,
}

/// Classroom as seen by the search.
#[derive(Debug, Clone)]
pub struct ClassroomEntry {
    /// Classroom ID.
    pub id: String,
    /// Seating capacity.
    pub capacity: u32,
}

/// One teaching unit: a CSP variable.
#[derive(Debug, Clone)]
pub struct UnitVar {
    /// Subject handle.
    pub subject: usize,
    /// Index among the subject's units (0-based).
    pub unit_index: u32,
    /// Static domain in tie-break order.
    pub candidates: Vec<Candidate>,
}

/// Compiled department problem.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    /// Department being scheduled.
    pub department_id: String,
    /// Subjects, sorted by ID.
    pub subjects: Vec<SubjectEntry>,
    /// Participating staff, sorted by ID.
    pub staff: Vec<StaffEntry>,
    /// Department classrooms, sorted by ID.
    pub classrooms: Vec<ClassroomEntry>,
    /// Shared grid.
    pub grid: TimeGrid,
    /// Day index of each cell.
    pub day_of_cell: Vec<usize>,
    /// Number of distinct days.
    pub day_count: usize,
    /// Variables, sorted by (subject ID, unit index).
    pub units: Vec<UnitVar>,
    /// Capacity handling.
    pub capacity_policy: CapacityPolicy,
}

impl TimetableModel {
    /// Compiles one department of a snapshot.
    ///
    /// `ledger` holds other departments' committed timetables; entries for
    /// this department itself are ignored.
    ///
    /// # Errors
    /// [`GenerationError::UnknownDepartment`] if the department is absent.
    pub fn build(
        snapshot: &ScheduleSnapshot,
        department_id: &str,
        config: &GenerationConfig,
        ledger: &StaffLedger,
    ) -> GenerationResult<Self> {
        if snapshot.department(department_id).is_none() {
            return Err(GenerationError::UnknownDepartment(department_id.to_string()));
        }

        let grid = config.time_grid.clone();
        let day_of_cell = grid.day_indices();
        let day_count = grid.days().len();
        let subjects = snapshot.subjects_of(department_id);
        let subject_ids: BTreeSet<&str> = subjects.iter().map(|s| s.id.as_str()).collect();

        // Staff who selected anything here; unlocked ones are reported and skipped.
        let mut participants: Vec<_> = snapshot
            .staff()
            .iter()
            .filter(|m| m.selected_subjects.iter().any(|s| subject_ids.contains(s.as_str())))
            .collect();
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        for member in participants.iter().filter(|m| !m.locked) {
            warn!(
                department = department_id,
                staff = %member.id,
                "staff selection not locked; excluded from generation"
            );
        }

        let commitments = ledger.commitments_excluding(department_id);
        let staff: Vec<StaffEntry> = participants
            .iter()
            .filter(|m| m.is_schedulable())
            .map(|m| {
                let limits = snapshot.limits(&m.id).ok_or_else(|| {
                    GenerationError::Configuration {
                        issues: vec![ValidationError::new(
                            ValidationErrorKind::MissingRoleConstraint,
                            format!("Staff '{}' ({:?}) has no resolved role limits", m.id, m.role),
                        )],
                    }
                })?;
                let committed = commitments.get(&m.id);
                let busy = grid
                    .cells()
                    .iter()
                    .map(|cell| committed.is_some_and(|c| c.cells.contains(cell)))
                    .collect();
                Ok(StaffEntry {
                    id: m.id.clone(),
                    limits,
                    committed_hours: committed.map_or(0, |c| c.hours()),
                    committed_subjects: committed.map_or(0, |c| c.subjects.len() as u32),
                    busy,
                })
            })
            .collect::<GenerationResult<_>>()?;

        let rooms = snapshot.classrooms_of(department_id);
        let classrooms: Vec<ClassroomEntry> = rooms
            .iter()
            .map(|r| ClassroomEntry {
                id: r.id.clone(),
                capacity: r.capacity,
            })
            .collect();

        let subjects: Vec<SubjectEntry> = subjects
            .iter()
            .map(|s| {
                let cohort = s.cohort_size.or(config.default_cohort_size);
                let qualified_staff = staff
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| {
                        snapshot
                            .staff_member(&e.id)
                            .is_some_and(|m| m.has_selected(&s.id))
                    })
                    .map(|(i, _)| i)
                    .collect();
                let eligible_classrooms = rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| config.capacity_policy != CapacityPolicy::Hard || r.seats(cohort))
                    .map(|(i, _)| i)
                    .collect();
                SubjectEntry {
                    id: s.id.clone(),
                    credits: s.credits,
                    required_units: s
                        .required_units(config.units_per_credit, config.max_units_per_subject),
                    cohort,
                    qualified_staff,
                    eligible_classrooms,
                }
            })
            .collect();

        let mut model = Self {
            department_id: department_id.to_string(),
            subjects,
            staff,
            classrooms,
            grid,
            day_of_cell,
            day_count,
            units: Vec::new(),
            capacity_policy: config.capacity_policy,
        };
        model.units = model.build_units();
        Ok(model)
    }

    fn build_units(&self) -> Vec<UnitVar> {
        let seeded = Occupancy::new(self);
        let mut units = Vec::new();
        for (subject, entry) in self.subjects.iter().enumerate() {
            let mut domain = Vec::new();
            for &staff in &entry.qualified_staff {
                for &classroom in &entry.eligible_classrooms {
                    for cell in 0..self.grid.len() {
                        let candidate = Candidate {
                            staff,
                            classroom,
                            cell,
                        };
                        if can_place(self, &seeded, subject, candidate).is_ok() {
                            domain.push(candidate);
                        }
                    }
                }
            }
            for unit_index in 0..entry.required_units {
                units.push(UnitVar {
                    subject,
                    unit_index,
                    candidates: domain.clone(),
                });
            }
        }
        units
    }

    /// Total units to place.
    pub fn total_units(&self) -> usize {
        self.units.len()
    }

    /// Converts placements into timetable rows, in grid order.
    pub fn to_schedule(&self, placements: &[Placement]) -> Schedule {
        let mut sorted: Vec<&Placement> = placements.iter().collect();
        sorted.sort_by_key(|p| p.candidate.cell);

        let mut schedule = Schedule::new(&self.department_id);
        for p in sorted {
            let Some(cell) = self.grid.cell(p.candidate.cell) else {
                continue;
            };
            schedule.add_assignment(Assignment::new(
                &self.department_id,
                &cell.day,
                &cell.slot,
                &self.subjects[p.subject].id,
                &self.staff[p.candidate.staff].id,
                &self.classrooms[p.candidate.classroom].id,
            ));
        }
        schedule
    }
}
