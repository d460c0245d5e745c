//! Department wave planning.
//!
//! Two departments conflict when some schedulable staff member selected
//! subjects in both. A greedy coloring of that conflict graph, visiting
//! departments in ID order, partitions them into waves: departments in
//! one wave share no staff and may be generated in parallel; waves run
//! one after another.
//!
//! # Reference
//! Welsh & Powell (1967), "An upper bound for the chromatic number of a
//! graph and its application to timetabling problems"

use std::collections::{BTreeMap, BTreeSet};

use crate::models::ScheduleSnapshot;

/// Pairs of departments sharing at least one schedulable staff member.
pub fn staff_conflicts(snapshot: &ScheduleSnapshot) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = snapshot
        .departments()
        .iter()
        .map(|d| (d.id.clone(), BTreeSet::new()))
        .collect();

    for member in snapshot.staff().iter().filter(|m| m.is_schedulable()) {
        let depts = snapshot.departments_taught_by(member);
        for a in &depts {
            for b in &depts {
                if a != b {
                    if let Some(neighbors) = graph.get_mut(a) {
                        neighbors.insert(b.clone());
                    }
                }
            }
        }
    }
    graph
}

/// Partitions every department into waves with pairwise-disjoint staff.
///
/// Deterministic: departments are visited in ID order and each takes the
/// lowest wave none of its already-placed neighbors occupies.
pub fn plan_waves(snapshot: &ScheduleSnapshot) -> Vec<Vec<String>> {
    let graph = staff_conflicts(snapshot);
    let mut wave_of: BTreeMap<&str, usize> = BTreeMap::new();
    let mut waves: Vec<Vec<String>> = Vec::new();

    for (dept, neighbors) in &graph {
        let taken: BTreeSet<usize> = neighbors
            .iter()
            .filter_map(|n| wave_of.get(n.as_str()).copied())
            .collect();
        let wave = (0..).find(|w| !taken.contains(w)).unwrap_or(waves.len());
        if wave == waves.len() {
            waves.push(Vec::new());
        }
        waves[wave].push(dept.clone());
        wave_of.insert(dept, wave);
    }
    waves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Department, RoleConstraint, Staff, StaffRole, Subject, SubjectType,
    };

    fn snapshot(staff: Vec<Staff>) -> ScheduleSnapshot {
        ScheduleSnapshot::new(
            vec![
                Department::new("D1", "CSE"),
                Department::new("D2", "ECE"),
                Department::new("D3", "MECH"),
            ],
            vec![
                Subject::new("A", "A", "D1"),
                Subject::new("B", "B", "D2"),
                Subject::new("C", "C", "D3"),
            ],
            staff,
            vec![],
            vec![RoleConstraint::global(StaffRole::Professor, SubjectType::Both)],
        )
        .unwrap()
    }

    fn prof(id: &str, subjects: &[&str]) -> Staff {
        subjects
            .iter()
            .fold(Staff::new(id, StaffRole::Professor, "D1"), |s, sub| s.with_subject(*sub))
            .locked()
    }

    #[test]
    fn test_disjoint_departments_share_one_wave() {
        let s = snapshot(vec![prof("U1", &["A"]), prof("U2", &["B"]), prof("U3", &["C"])]);
        assert_eq!(plan_waves(&s), vec![vec!["D1", "D2", "D3"]]);
    }

    #[test]
    fn test_shared_staff_split_waves() {
        // D1–D2 and D2–D3 share staff; D1 and D3 do not.
        let s = snapshot(vec![prof("U1", &["A", "B"]), prof("U2", &["B", "C"])]);
        assert_eq!(plan_waves(&s), vec![vec!["D1", "D3"], vec!["D2"]]);
        assert!(staff_conflicts(&s)["D2"].contains("D3"));
    }

    #[test]
    fn test_triangle_needs_three_waves() {
        let s = snapshot(vec![prof("U1", &["A", "B", "C"])]);
        assert_eq!(plan_waves(&s), vec![vec!["D1"], vec!["D2"], vec!["D3"]]);
    }

    #[test]
    fn test_unlocked_staff_do_not_conflict() {
        let unlocked = Staff::new("U1", StaffRole::Professor, "D1")
            .with_subject("A")
            .with_subject("B");
        let s = snapshot(vec![unlocked]);
        assert_eq!(plan_waves(&s).len(), 1);
    }
}
