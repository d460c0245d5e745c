//! Timetable statistics (KPIs).
//!
//! Computes load and utilization indicators from a department timetable
//! and the grid it was generated on.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Units | Number of timetable rows |
//! | Staff Load | Units per staff member |
//! | Classroom Utilization | Units in the room / grid cells |
//! | Day Load | Units per grid day |
//! | Avg Utilization | Mean classroom utilization |
//! | Grid Fill | Units / grid cells |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, TimeGrid};

/// Timetable indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Units scheduled.
    pub total_units: usize,
    /// Units per staff member.
    pub staff_load: BTreeMap<String, u32>,
    /// Per-classroom utilization (0.0..1.0).
    pub utilization_by_classroom: BTreeMap<String, f64>,
    /// Units per day, for every grid day (zero days included).
    pub day_load: BTreeMap<String, u32>,
    /// Average classroom utilization over rooms in use (0.0..1.0).
    pub avg_utilization: f64,
    /// Fraction of grid cells carrying a unit (0.0..1.0).
    pub grid_fill: f64,
}

impl ScheduleKpi {
    /// Computes KPIs of a timetable.
    ///
    /// # Arguments
    /// * `schedule` - The department timetable.
    /// * `grid` - The grid it was generated on.
    pub fn calculate(schedule: &Schedule, grid: &TimeGrid) -> Self {
        let cells = grid.len();
        let ratio = |units: usize| {
            if cells == 0 {
                0.0
            } else {
                units as f64 / cells as f64
            }
        };

        let mut room_units: BTreeMap<String, usize> = BTreeMap::new();
        let mut day_load: BTreeMap<String, u32> = grid
            .days()
            .into_iter()
            .map(|d| (d.to_string(), 0))
            .collect();
        for row in &schedule.assignments {
            *room_units.entry(row.classroom_id.clone()).or_default() += 1;
            *day_load.entry(row.day.clone()).or_default() += 1;
        }

        let utilization_by_classroom: BTreeMap<String, f64> = room_units
            .into_iter()
            .map(|(room, units)| (room, ratio(units)))
            .collect();
        let avg_utilization = if utilization_by_classroom.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_classroom.values().sum();
            sum / utilization_by_classroom.len() as f64
        };

        Self {
            total_units: schedule.assignment_count(),
            staff_load: schedule.staff_loads(),
            utilization_by_classroom,
            day_load,
            avg_utilization,
            grid_fill: ratio(schedule.assignment_count()),
        }
    }

    /// Heaviest single-staff load.
    pub fn max_staff_load(&self) -> u32 {
        self.staff_load.values().copied().max().unwrap_or(0)
    }

    /// Whether the timetable meets the given thresholds.
    pub fn meets_thresholds(&self, max_staff_load: u32, min_utilization: f64) -> bool {
        self.max_staff_load() <= max_staff_load && self.avg_utilization >= min_utilization
    }
}
