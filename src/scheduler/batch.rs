//! Multi-department generation.
//!
//! Departments are generated wave by wave (see [`plan_waves`]). Within a
//! wave each department runs on its own scoped thread against the same
//! read-only ledger; no two of them share staff, so their results cannot
//! collide. Successful timetables are committed to the ledger before the
//! next wave starts.

use std::collections::BTreeMap;
use std::thread;

use tracing::info;

use super::{plan_waves, GeneratedSchedule, TimetableGenerator};
use crate::cp::StaffLedger;
use crate::error::{GenerationError, GenerationResult};
use crate::models::{Schedule, ScheduleSnapshot};
use crate::store::{ScheduleSink, SinkError};

/// Outcome of generating every department of a snapshot.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Result per department.
    pub outcomes: BTreeMap<String, GenerationResult<GeneratedSchedule>>,
    /// Waves in execution order.
    pub waves: Vec<Vec<String>>,
}

impl BatchReport {
    /// Whether every department succeeded.
    pub fn is_complete(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }

    /// Timetable of a department, if it succeeded.
    pub fn schedule(&self, department_id: &str) -> Option<&Schedule> {
        match self.outcomes.get(department_id) {
            Some(Ok(generated)) => Some(&generated.schedule),
            _ => None,
        }
    }

    /// Successful departments.
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &GeneratedSchedule)> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.as_ref().ok().map(|g| (id.as_str(), g)))
    }

    /// Failed departments.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &GenerationError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (id.as_str(), e)))
    }

    /// Writes every successful timetable to a sink, one replace per
    /// department.
    ///
    /// # Returns
    /// Number of departments written.
    pub fn publish<S: ScheduleSink + ?Sized>(&self, sink: &mut S) -> Result<usize, SinkError> {
        let mut written = 0;
        for (department_id, generated) in self.succeeded() {
            sink.replace_department_schedule(department_id, &generated.schedule.assignments)?;
            written += 1;
        }
        Ok(written)
    }
}

impl TimetableGenerator {
    /// Generates every department of the snapshot.
    ///
    /// Timetables already in `ledger` for departments of this snapshot are
    /// released first, since they are being regenerated; entries for other
    /// departments stay as fixed commitments. On return the ledger holds
    /// every successful timetable.
    pub fn generate_all(&self, snapshot: &ScheduleSnapshot, ledger: &mut StaffLedger) -> BatchReport {
        let waves = plan_waves(snapshot);
        for dept in waves.iter().flatten() {
            ledger.release(dept);
        }

        let mut outcomes = BTreeMap::new();
        for (index, wave) in waves.iter().enumerate() {
            info!(wave = index, departments = ?wave, "starting wave");
            let shared: &StaffLedger = ledger;
            let results: Vec<(String, GenerationResult<GeneratedSchedule>)> =
                thread::scope(|scope| {
                    let handles: Vec<_> = wave
                        .iter()
                        .map(|dept| {
                            scope.spawn(move || (dept.clone(), self.generate(snapshot, dept, shared)))
                        })
                        .collect();
                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                        .collect()
                });

            for (dept, result) in results {
                if let Ok(generated) = &result {
                    ledger.commit(&generated.schedule);
                }
                outcomes.insert(dept, result);
            }
        }

        let report = BatchReport { outcomes, waves };
        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "batch finished"
        );
        report
    }
}
