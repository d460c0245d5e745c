//! Structured report of a failed search.

use std::fmt;

use super::{SearchStats, StopReason};
use crate::models::Schedule;

/// A unit whose domain kept emptying at the deepest point of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingUnit {
    /// Subject of the unit.
    pub subject_id: String,
    /// Unit index within the subject (0-based).
    pub unit_index: u32,
    /// Domain wipe-outs observed for this unit.
    pub wipeouts: u32,
}

/// Why a department search produced no timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDiagnostic {
    /// Department searched.
    pub department_id: String,
    /// Deepest partial timetable reached by the best attempt.
    pub partial: Schedule,
    /// Units that could not be placed from there, most-blocked first.
    pub blocking: Vec<BlockingUnit>,
    /// Units the department needed.
    pub required_units: usize,
    /// Limit that stopped the reported attempt; `None` if it explored its
    /// whole space.
    pub stopped: Option<StopReason>,
    /// Counters of the attempt that reached deepest.
    pub stats: SearchStats,
    /// Attempts run (first attempt plus restarts).
    pub attempts: u32,
}

impl SearchDiagnostic {
    /// Whether the search proved the department infeasible.
    pub fn space_exhausted(&self) -> bool {
        self.stopped.is_none()
    }
}

impl fmt::Display for BlockingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} unit {} ({} wipe-outs)",
            self.subject_id,
            self.unit_index + 1,
            self.wipeouts
        )
    }
}

impl fmt::Display for SearchDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "department '{}': no timetable after {} attempt(s), {} backtracks",
            self.department_id, self.attempts, self.stats.backtracks
        )?;
        match self.stopped {
            Some(reason) => write!(f, " ({reason})")?,
            None => write!(f, " (search space exhausted)")?,
        }
        write!(
            f,
            "; placed {}/{} units",
            self.partial.assignment_count(),
            self.required_units
        )?;
        if !self.blocking.is_empty() {
            let names: Vec<String> = self.blocking.iter().map(ToString::to_string).collect();
            write!(f, "; blocked: {}", names.join(", "))?;
        }
        Ok(())
    }
}
