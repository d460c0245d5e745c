//! Per-department generation driver.
//!
//! # Algorithm
//!
//! 1. Compile the department into a [`TimetableModel`], seeded with the
//!    staff ledger.
//! 2. Reject provably infeasible departments ([`check_constructible`]).
//! 3. Run the deterministic search; on budget exhaustion, retry up to
//!    `restartAttempts` times with seeded tie-breaking.
//! 4. Self-verify the timetable ([`verify_schedule`]) before returning it.
//!
//! A search that explores its whole space is a proof of infeasibility,
//! so restarts stop there.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{check_constructible, verify_schedule};
use crate::config::{ConfigError, GenerationConfig};
use crate::cp::{
    BacktrackingSolver, BlockingUnit, Placement, SearchDiagnostic, SearchLimits, SearchOutcome,
    SearchStats, StaffLedger, StopReason, TimetableModel,
};
use crate::error::{GenerationError, GenerationResult};
use crate::evaluator::SoftScore;
use crate::models::{Schedule, ScheduleSnapshot};

/// A verified department timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    /// Timetable rows, in grid order.
    pub schedule: Schedule,
    /// Soft penalty of the timetable.
    pub penalty: SoftScore,
    /// Counters of the successful attempt.
    pub stats: SearchStats,
}

/// Generates department timetables under one configuration.
///
/// # Example
///
/// ```
/// use u_timetable::config::GenerationConfig;
/// use u_timetable::cp::StaffLedger;
/// use u_timetable::models::{
///     Classroom, Department, RoleConstraint, ScheduleSnapshot, Staff, StaffRole, Subject,
///     SubjectType,
/// };
/// use u_timetable::scheduler::TimetableGenerator;
///
/// let snapshot = ScheduleSnapshot::new(
///     vec![Department::new("D1", "CSE")],
///     vec![Subject::new("S1", "CS101", "D1").with_credits(2)],
///     vec![Staff::new("U1", StaffRole::Professor, "D1").with_subject("S1").locked()],
///     vec![Classroom::new("R1", 60, "D1")],
///     vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both).with_limits(2, 8)],
/// )
/// .unwrap();
///
/// let generator = TimetableGenerator::new(GenerationConfig::default()).unwrap();
/// let result = generator.generate(&snapshot, "D1", &StaffLedger::new()).unwrap();
/// assert_eq!(result.schedule.assignment_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGenerator {
    config: GenerationConfig,
}

struct Failure {
    deepest: Vec<Placement>,
    blocking: Vec<BlockingUnit>,
    stopped: Option<StopReason>,
    stats: SearchStats,
}

impl TimetableGenerator {
    /// Creates a generator after validating the configuration.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn limits(&self) -> SearchLimits {
        SearchLimits {
            backtrack_budget: self.config.backtrack_budget,
            time_budget: self.config.time_budget(),
            max_solutions: self.config.max_solutions,
        }
    }

    /// Generates one department's timetable.
    ///
    /// `ledger` carries the timetables already committed by other
    /// departments; their staff cells, hours, and subjects are treated as
    /// taken.
    ///
    /// # Errors
    /// - [`GenerationError::UnknownDepartment`]
    /// - [`GenerationError::Unsatisfiable`] naming each offending subject
    /// - [`GenerationError::SearchExhausted`] with the deepest partial
    ///   timetable and the blocking units
    /// - [`GenerationError::InvariantViolation`] if self-verification fails
    pub fn generate(
        &self,
        snapshot: &ScheduleSnapshot,
        department_id: &str,
        ledger: &StaffLedger,
    ) -> GenerationResult<GeneratedSchedule> {
        let model = TimetableModel::build(snapshot, department_id, &self.config, ledger)?;
        info!(
            department = department_id,
            units = model.total_units(),
            staff = model.staff.len(),
            classrooms = model.classrooms.len(),
            "generating timetable"
        );

        let reasons = check_constructible(&model);
        if !reasons.is_empty() {
            info!(
                department = department_id,
                reasons = reasons.len(),
                "department unsatisfiable by construction"
            );
            return Err(GenerationError::Unsatisfiable {
                department_id: department_id.to_string(),
                reasons,
            });
        }

        let attempts = self.config.restart_attempts.saturating_add(1);
        let mut failure: Option<Failure> = None;
        let mut ran = 0;

        for attempt in 0..attempts {
            ran += 1;
            let mut solver = BacktrackingSolver::new(&model)
                .with_limits(self.limits())
                .with_weights(self.config.soft_constraint_weights);
            if attempt > 0 {
                let seed = self.config.random_seed.wrapping_add(u64::from(attempt));
                debug!(department = department_id, attempt, seed, "restarting search");
                solver = solver.with_tie_seed(seed, attempt);
            }

            match solver.solve() {
                SearchOutcome::Solved { solution, stats } => {
                    debug!(
                        department = department_id,
                        attempt,
                        nodes = stats.nodes,
                        backtracks = stats.backtracks,
                        solutions = stats.solutions,
                        "search succeeded"
                    );
                    let schedule = model.to_schedule(&solution.placements);
                    if let Err(breaches) =
                        verify_schedule(snapshot, &schedule, &self.config, ledger)
                    {
                        for breach in &breaches {
                            error!(
                                target: "u_timetable::invariant",
                                department = department_id,
                                "{breach}"
                            );
                        }
                        return Err(GenerationError::InvariantViolation {
                            department_id: department_id.to_string(),
                            breaches,
                        });
                    }
                    info!(
                        department = department_id,
                        units = schedule.assignment_count(),
                        penalty = solution.score.total,
                        "timetable generated"
                    );
                    return Ok(GeneratedSchedule {
                        schedule,
                        penalty: solution.score,
                        stats,
                    });
                }
                SearchOutcome::Exhausted {
                    deepest,
                    blocking,
                    stopped,
                    stats,
                } => {
                    debug!(
                        department = department_id,
                        attempt,
                        depth = deepest.len(),
                        backtracks = stats.backtracks,
                        "search exhausted"
                    );
                    let deeper = failure
                        .as_ref()
                        .map_or(true, |f| deepest.len() > f.deepest.len());
                    if deeper {
                        let blocking = blocking
                            .iter()
                            .map(|b| {
                                let unit = &model.units[b.var];
                                BlockingUnit {
                                    subject_id: model.subjects[unit.subject].id.clone(),
                                    unit_index: unit.unit_index,
                                    wipeouts: b.wipeouts,
                                }
                            })
                            .collect();
                        failure = Some(Failure {
                            deepest,
                            blocking,
                            stopped,
                            stats,
                        });
                    }
                    if stopped.is_none() {
                        break;
                    }
                }
            }
        }

        let diagnostic = match failure {
            Some(f) => SearchDiagnostic {
                department_id: department_id.to_string(),
                partial: model.to_schedule(&f.deepest),
                blocking: f.blocking,
                required_units: model.total_units(),
                stopped: f.stopped,
                stats: f.stats,
                attempts: ran,
            },
            None => SearchDiagnostic {
                department_id: department_id.to_string(),
                partial: Schedule::new(department_id),
                blocking: Vec::new(),
                required_units: model.total_units(),
                stopped: None,
                stats: SearchStats::default(),
                attempts: ran,
            },
        };
        info!(department = department_id, "{diagnostic}");
        Err(GenerationError::SearchExhausted(Box::new(diagnostic)))
    }
}
