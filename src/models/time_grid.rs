//! Weekly time grid.
//!
//! The grid is the fixed enumeration of (day, slot) cells shared by every
//! department. Cell order is significant: it is the deterministic
//! tie-break order for search and the order of generated rows.
//!
//! # Invariants
//! - Cells are unique.
//! - Days are grouped in first-appearance order (a day's slots need not
//!   be contiguous in the list, but they are reported together).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One (day, slot) cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Day label (e.g., "Monday").
    pub day: String,
    /// Slot label (e.g., "09:00").
    pub slot: String,
}

/// Ordered set of teaching cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeGrid {
    cells: Vec<GridCell>,
}

impl GridCell {
    /// Creates a cell.
    pub fn new(day: impl Into<String>, slot: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            slot: slot.into(),
        }
    }
}

impl TimeGrid {
    /// Creates a grid from an explicit cell list.
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    /// Creates the cross product `days × slots`, day-major.
    pub fn weekly<D, S>(days: &[D], slots: &[S]) -> Self
    where
        D: AsRef<str>,
        S: AsRef<str>,
    {
        let cells = days
            .iter()
            .flat_map(|d| slots.iter().map(move |s| GridCell::new(d.as_ref(), s.as_ref())))
            .collect();
        Self { cells }
    }

    /// Monday to Friday, six one-hour slots per day.
    pub fn standard_week() -> Self {
        Self::weekly(
            &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
            &["09:00", "10:00", "11:00", "13:00", "14:00", "15:00"],
        )
    }

    /// All cells in grid order.
    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at an index.
    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Index of a (day, slot) cell.
    pub fn position(&self, day: &str, slot: &str) -> Option<usize> {
        self.cells.iter().position(|c| c.day == day && c.slot == slot)
    }

    /// Distinct days in first-appearance order.
    pub fn days(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.cells
            .iter()
            .filter(|c| seen.insert(c.day.as_str()))
            .map(|c| c.day.as_str())
            .collect()
    }

    /// Day index (into [`days`](Self::days)) of every cell.
    pub fn day_indices(&self) -> Vec<usize> {
        let days = self.days();
        self.cells
            .iter()
            .map(|c| days.iter().position(|d| *d == c.day).unwrap_or(0))
            .collect()
    }

    /// First duplicated cell, if any.
    pub fn first_duplicate(&self) -> Option<&GridCell> {
        let mut seen = HashSet::new();
        self.cells.iter().find(|c| !seen.insert(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_is_day_major() {
        let grid = TimeGrid::weekly(&["Mon", "Tue"], &["1", "2", "3"]);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.cell(0), Some(&GridCell::new("Mon", "1")));
        assert_eq!(grid.cell(3), Some(&GridCell::new("Tue", "1")));
        assert_eq!(grid.position("Tue", "3"), Some(5));
        assert_eq!(grid.position("Wed", "1"), None);
    }

    #[test]
    fn test_standard_week() {
        let grid = TimeGrid::standard_week();
        assert_eq!(grid.len(), 30);
        assert_eq!(grid.days().len(), 5);
        assert!(grid.first_duplicate().is_none());
    }

    #[test]
    fn test_day_indices_with_interleaved_days() {
        let grid = TimeGrid::new(vec![
            GridCell::new("Mon", "1"),
            GridCell::new("Tue", "1"),
            GridCell::new("Mon", "2"),
        ]);
        assert_eq!(grid.days(), vec!["Mon", "Tue"]);
        assert_eq!(grid.day_indices(), vec![0, 1, 0]);
    }

    #[test]
    fn test_duplicate_detection() {
        let grid = TimeGrid::new(vec![GridCell::new("Mon", "1"), GridCell::new("Mon", "1")]);
        assert_eq!(grid.first_duplicate(), Some(&GridCell::new("Mon", "1")));
    }

    #[test]
    fn test_serde_transparent() {
        let grid = TimeGrid::weekly(&["Mon"], &["1"]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[{"day":"Mon","slot":"1"}]"#);
    }
}
