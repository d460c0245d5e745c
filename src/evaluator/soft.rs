//! Soft-constraint scoring.
//!
//! All raw values are integers so scores are reproducible bit for bit.
//!
//! | Kind | Raw value |
//! |------|-----------|
//! | SameSubjectSameDay | Σ over (subject, day) of max(0, units − 1) |
//! | UnevenStaffLoad | Σ over teaching staff of (max − min) daily load |
//! | UnevenClassroomUtilization | max − min units over department rooms |
//! | CapacityShortfall | units in a room smaller than the cohort (soft policy) |
//!
//! Staff daily loads include ledger commitments from other departments,
//! so the score reflects each staff member's whole week.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{CapacityPolicy, SoftConstraintKind, SoftConstraintWeights};
use crate::cp::{Placement, TimetableModel};

/// Weighted soft penalty of a complete assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftScore {
    /// Σ weight × raw value.
    pub total: u64,
    /// Raw (unweighted) value per kind.
    pub breakdown: BTreeMap<SoftConstraintKind, u64>,
}

impl SoftScore {
    /// Raw value of one kind.
    pub fn raw(&self, kind: SoftConstraintKind) -> u64 {
        self.breakdown.get(&kind).copied().unwrap_or(0)
    }
}

/// Scores a complete assignment of a model.
pub fn score(
    model: &TimetableModel,
    placements: &[Placement],
    weights: &SoftConstraintWeights,
) -> SoftScore {
    let days = model.day_count.max(1);

    // (subject, day) → units
    let mut subject_day = vec![0u64; model.subjects.len() * days];
    // (staff, day) → units, seeded with commitments
    let mut staff_day = vec![0u64; model.staff.len() * days];
    let mut teaching = vec![false; model.staff.len()];
    let mut room_units = vec![0u64; model.classrooms.len()];
    let mut shortfall = 0u64;

    for (s, entry) in model.staff.iter().enumerate() {
        for (cell, &busy) in entry.busy.iter().enumerate() {
            if busy {
                staff_day[s * days + model.day_of_cell[cell]] += 1;
            }
        }
    }

    for p in placements {
        let c = p.candidate;
        let day = model.day_of_cell[c.cell];
        subject_day[p.subject * days + day] += 1;
        staff_day[c.staff * days + day] += 1;
        teaching[c.staff] = true;
        room_units[c.classroom] += 1;

        if model.capacity_policy == CapacityPolicy::Soft {
            let cohort = model.subjects[p.subject].cohort;
            if cohort.is_some_and(|n| model.classrooms[c.classroom].capacity < n) {
                shortfall += 1;
            }
        }
    }

    let same_day: u64 = subject_day.iter().map(|&n| n.saturating_sub(1)).sum();

    let uneven_staff: u64 = teaching
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t)
        .map(|(s, _)| spread(&staff_day[s * days..(s + 1) * days]))
        .sum();

    let uneven_rooms = spread(&room_units);

    let mut breakdown = BTreeMap::new();
    breakdown.insert(SoftConstraintKind::SameSubjectSameDay, same_day);
    breakdown.insert(SoftConstraintKind::UnevenStaffLoad, uneven_staff);
    breakdown.insert(SoftConstraintKind::UnevenClassroomUtilization, uneven_rooms);
    breakdown.insert(SoftConstraintKind::CapacityShortfall, shortfall);

    let total = breakdown
        .iter()
        .map(|(&kind, &raw)| raw * u64::from(weights.weight(kind)))
        .sum();

    SoftScore { total, breakdown }
}

fn spread(values: &[u64]) -> u64 {
    match (values.iter().max(), values.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}
