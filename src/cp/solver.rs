//! Backtracking search with forward checking.
//!
//! # Algorithm
//!
//! 1. **Variable ordering**: most-constrained first (smallest live
//!    domain), ties by subject credits descending, then a stable rank.
//! 2. **Value ordering**: least-constraining value first, estimated as the
//!    number of live values in other domains the placement would remove;
//!    ties by a stable rank (candidate order: staff, classroom, day, slot).
//! 3. **Forward checking**: after each placement every unassigned domain
//!    is re-filtered through [`can_place`] and the unit-order symmetry
//!    rule (unit `k` of a subject sits in an earlier cell than unit `k+1`).
//!    A wiped-out domain backtracks immediately.
//! 4. **Limits**: a backtrack budget and an optional wall-clock budget,
//!    checked between steps.
//!
//! With a tie-break seed, both stable ranks are replaced by seeded
//! permutations; without one the search is fully deterministic.
//!
//! # Complexity
//! Each node costs O(Σ|Dᵢ|) for forward checking and value ordering.
//!
//! # Reference
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{Candidate, Occupancy, Placement, TimetableModel};
use crate::config::SoftConstraintWeights;
use crate::evaluator::{can_place, score, SoftScore};

/// Bounds on one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Backtrack steps before giving up.
    pub backtrack_budget: u64,
    /// Wall-clock budget.
    pub time_budget: Option<Duration>,
    /// Complete assignments to enumerate before stopping.
    pub max_solutions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            backtrack_budget: 200_000,
            time_budget: None,
            max_solutions: 1,
        }
    }
}

/// Counters of one search attempt.
///
/// Equality compares the search counters only; `elapsed` is wall-clock
/// time and differs between otherwise identical runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Attempt index (0 = deterministic first attempt).
    pub attempt: u32,
    /// Search nodes expanded.
    pub nodes: u64,
    /// Backtrack steps taken.
    pub backtracks: u64,
    /// Complete assignments found.
    pub solutions: u32,
    /// Deepest number of units placed at once.
    pub max_depth: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

impl PartialEq for SearchStats {
    fn eq(&self, other: &Self) -> bool {
        self.attempt == other.attempt
            && self.nodes == other.nodes
            && self.backtracks == other.backtracks
            && self.solutions == other.solutions
            && self.max_depth == other.max_depth
    }
}

impl Eq for SearchStats {}

/// Why a search stopped before exploring the whole space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Backtrack budget spent.
    BacktrackBudget,
    /// Wall-clock budget spent.
    TimeBudget,
    /// Enough solutions enumerated.
    SolutionLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::BacktrackBudget => write!(f, "backtrack budget spent"),
            StopReason::TimeBudget => write!(f, "time budget spent"),
            StopReason::SolutionLimit => write!(f, "solution limit reached"),
        }
    }
}

/// A unit variable that ran out of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingVar {
    /// Variable index into [`TimetableModel::units`].
    pub var: usize,
    /// How often its domain was wiped out.
    pub wipeouts: u32,
}

/// Best complete assignment of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// One placement per unit variable, in variable order.
    pub placements: Vec<Placement>,
    /// Soft penalty.
    pub score: SoftScore,
}

/// Result of one search attempt.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// At least one complete assignment was found.
    Solved {
        /// Lowest-penalty assignment found.
        solution: Solution,
        /// Attempt counters.
        stats: SearchStats,
    },
    /// No complete assignment was found.
    Exhausted {
        /// Deepest partial assignment reached.
        deepest: Vec<Placement>,
        /// Variables whose domains emptied at that depth (most-wiped first).
        blocking: Vec<BlockingVar>,
        /// Limit that stopped the search; `None` means the whole space was
        /// explored (proof of infeasibility).
        stopped: Option<StopReason>,
        /// Attempt counters.
        stats: SearchStats,
    },
}

impl SearchOutcome {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved { .. })
    }

    /// Attempt counters.
    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Solved { stats, .. } | SearchOutcome::Exhausted { stats, .. } => stats,
        }
    }
}

/// Depth-first CSP solver over a [`TimetableModel`].
#[derive(Debug, Clone)]
pub struct BacktrackingSolver<'m> {
    model: &'m TimetableModel,
    limits: SearchLimits,
    weights: SoftConstraintWeights,
    tie_seed: Option<u64>,
    attempt: u32,
}

impl<'m> BacktrackingSolver<'m> {
    /// Creates a deterministic solver with default limits.
    pub fn new(model: &'m TimetableModel) -> Self {
        Self {
            model,
            limits: SearchLimits::default(),
            weights: SoftConstraintWeights::default(),
            tie_seed: None,
            attempt: 0,
        }
    }

    /// Sets the search limits.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets soft-constraint weights used to rank solutions.
    pub fn with_weights(mut self, weights: SoftConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Randomizes tie-breaking with a seed, tagging stats with `attempt`.
    pub fn with_tie_seed(mut self, seed: u64, attempt: u32) -> Self {
        self.tie_seed = Some(seed);
        self.attempt = attempt;
        self
    }

    /// Runs the search.
    pub fn solve(&self) -> SearchOutcome {
        let mut search = Search::new(self);
        let flow = search.start();
        search.finish(flow)
    }
}

enum Flow {
    Continue,
    Halt(StopReason),
}

struct Search<'s, 'm> {
    solver: &'s BacktrackingSolver<'m>,
    model: &'m TimetableModel,
    occupancy: Occupancy,
    alive: Vec<Vec<bool>>,
    domain_size: Vec<usize>,
    prunes: Vec<(usize, usize)>,
    assigned: Vec<Option<usize>>,
    depth: usize,
    var_rank: Vec<usize>,
    value_rank: Vec<Vec<usize>>,
    wipeouts: Vec<u32>,
    deepest: Vec<Option<usize>>,
    deepest_depth: usize,
    deepest_wiped: Vec<usize>,
    best: Option<Solution>,
    stats: SearchStats,
    started: Instant,
}

impl<'s, 'm> Search<'s, 'm> {
    fn new(solver: &'s BacktrackingSolver<'m>) -> Self {
        let model = solver.model;
        let n = model.units.len();

        let mut var_rank: Vec<usize> = (0..n).collect();
        let mut value_rank: Vec<Vec<usize>> = model
            .units
            .iter()
            .map(|u| (0..u.candidates.len()).collect())
            .collect();
        if let Some(seed) = solver.tie_seed {
            let mut rng = SmallRng::seed_from_u64(seed);
            var_rank.shuffle(&mut rng);
            for ranks in &mut value_rank {
                ranks.shuffle(&mut rng);
            }
        }

        Self {
            solver,
            model,
            occupancy: Occupancy::new(model),
            alive: model
                .units
                .iter()
                .map(|u| vec![true; u.candidates.len()])
                .collect(),
            domain_size: model.units.iter().map(|u| u.candidates.len()).collect(),
            prunes: Vec::new(),
            assigned: vec![None; n],
            depth: 0,
            var_rank,
            value_rank,
            wipeouts: vec![0; n],
            deepest: vec![None; n],
            deepest_depth: 0,
            deepest_wiped: Vec::new(),
            best: None,
            stats: SearchStats {
                attempt: solver.attempt,
                ..SearchStats::default()
            },
            started: Instant::now(),
        }
    }

    fn start(&mut self) -> Flow {
        let empty: Vec<usize> = (0..self.model.units.len())
            .filter(|&v| self.domain_size[v] == 0)
            .collect();
        if !empty.is_empty() {
            self.note_wipeouts(&empty);
            return Flow::Continue;
        }
        self.descend()
    }

    fn descend(&mut self) -> Flow {
        let Some(var) = self.select_variable() else {
            return self.record_solution();
        };
        self.stats.nodes += 1;

        let subject = self.model.units[var].subject;
        for value in self.order_values(var) {
            if let Some(halt) = self.clock_exceeded() {
                return Flow::Halt(halt);
            }

            let candidate = self.model.units[var].candidates[value];
            let occupancy_mark = self.occupancy.checkpoint();
            let prune_mark = self.prunes.len();

            self.occupancy.place(subject, candidate);
            self.assigned[var] = Some(value);
            self.depth += 1;
            self.note_depth();

            let wiped = self.forward_check(var, candidate);
            let flow = if wiped.is_empty() {
                self.descend()
            } else {
                self.note_wipeouts(&wiped);
                Flow::Continue
            };

            self.restore(prune_mark);
            self.occupancy.rollback(occupancy_mark);
            self.assigned[var] = None;
            self.depth -= 1;

            if let Flow::Halt(_) = flow {
                return flow;
            }
            self.stats.backtracks += 1;
            if self.stats.backtracks >= self.solver.limits.backtrack_budget {
                return Flow::Halt(StopReason::BacktrackBudget);
            }
        }
        Flow::Continue
    }

    /// Smallest live domain; ties by credits (desc), then rank.
    fn select_variable(&self) -> Option<usize> {
        (0..self.model.units.len())
            .filter(|&v| self.assigned[v].is_none())
            .min_by_key(|&v| {
                let credits = self.model.subjects[self.model.units[v].subject].credits;
                (self.domain_size[v], Reverse(credits), self.var_rank[v])
            })
    }

    /// Live values of `var`, least-constraining first.
    fn order_values(&self, var: usize) -> Vec<usize> {
        let model = self.model;
        let subject = model.units[var].subject;

        let mut at_cell = vec![0usize; model.grid.len()];
        let mut with_staff = vec![0usize; model.staff.len()];
        let mut untaught_by_staff = vec![0usize; model.staff.len()];
        for (u, unit) in model.units.iter().enumerate() {
            if u == var || self.assigned[u].is_some() {
                continue;
            }
            for (i, c) in unit.candidates.iter().enumerate() {
                if !self.alive[u][i] {
                    continue;
                }
                at_cell[c.cell] += 1;
                with_staff[c.staff] += 1;
                if unit.subject != subject
                    && self.occupancy.staff_subject_units(c.staff, unit.subject) == 0
                {
                    untaught_by_staff[c.staff] += 1;
                }
            }
        }

        let impact = |c: &Candidate| {
            let limits = model.staff[c.staff].limits;
            let mut removed = at_cell[c.cell];
            if self.occupancy.staff_hours(c.staff) + 2 > limits.max_hours {
                removed += with_staff[c.staff];
            }
            if self.occupancy.staff_subject_units(c.staff, subject) == 0
                && self.occupancy.staff_subject_count(c.staff) + 2 > limits.max_subjects
            {
                removed += untaught_by_staff[c.staff];
            }
            removed
        };

        let candidates = &model.units[var].candidates;
        let ranks = &self.value_rank[var];
        let mut values: Vec<usize> = (0..candidates.len())
            .filter(|&i| self.alive[var][i])
            .collect();
        values.sort_by_key(|&i| (impact(&candidates[i]), ranks[i]));
        values
    }

    /// Prunes values made infeasible by placing `candidate` for `var`.
    /// Returns the variables whose domains were wiped out.
    fn forward_check(&mut self, var: usize, candidate: Candidate) -> Vec<usize> {
        let model = self.model;
        let placed = &model.units[var];
        let mut wiped = Vec::new();

        for (u, unit) in model.units.iter().enumerate() {
            if self.assigned[u].is_some() {
                continue;
            }
            let same_subject = unit.subject == placed.subject;
            for (i, &c) in unit.candidates.iter().enumerate() {
                if !self.alive[u][i] {
                    continue;
                }
                let ordered = !same_subject
                    || if unit.unit_index > placed.unit_index {
                        c.cell > candidate.cell
                    } else {
                        c.cell < candidate.cell
                    };
                if !ordered || can_place(model, &self.occupancy, unit.subject, c).is_err() {
                    self.alive[u][i] = false;
                    self.domain_size[u] -= 1;
                    self.prunes.push((u, i));
                }
            }
            if self.domain_size[u] == 0 {
                wiped.push(u);
            }
        }
        wiped
    }

    fn restore(&mut self, mark: usize) {
        while self.prunes.len() > mark {
            if let Some((u, i)) = self.prunes.pop() {
                self.alive[u][i] = true;
                self.domain_size[u] += 1;
            }
        }
    }

    fn note_depth(&mut self) {
        if self.depth > self.deepest_depth {
            self.deepest_depth = self.depth;
            self.deepest.clone_from(&self.assigned);
            self.deepest_wiped.clear();
        }
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
    }

    fn note_wipeouts(&mut self, wiped: &[usize]) {
        for &v in wiped {
            self.wipeouts[v] += 1;
            if self.depth == self.deepest_depth && !self.deepest_wiped.contains(&v) {
                self.deepest_wiped.push(v);
            }
        }
    }

    fn clock_exceeded(&self) -> Option<StopReason> {
        let budget = self.solver.limits.time_budget?;
        (self.started.elapsed() >= budget).then_some(StopReason::TimeBudget)
    }

    fn record_solution(&mut self) -> Flow {
        self.stats.solutions += 1;
        let placements: Vec<Placement> = self
            .model
            .units
            .iter()
            .zip(&self.assigned)
            .filter_map(|(unit, value)| {
                value.map(|i| Placement {
                    subject: unit.subject,
                    candidate: unit.candidates[i],
                })
            })
            .collect();
        let score = score(self.model, &placements, &self.solver.weights);

        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| score.total < best.score.total);
        if improves {
            self.best = Some(Solution { placements, score });
        }

        if self.stats.solutions as usize >= self.solver.limits.max_solutions {
            Flow::Halt(StopReason::SolutionLimit)
        } else {
            Flow::Continue
        }
    }

    fn finish(mut self, flow: Flow) -> SearchOutcome {
        self.stats.elapsed = self.started.elapsed();
        if let Some(solution) = self.best.take() {
            return SearchOutcome::Solved {
                solution,
                stats: self.stats,
            };
        }

        let deepest = self
            .model
            .units
            .iter()
            .zip(&self.deepest)
            .filter_map(|(unit, value)| {
                value.map(|i| Placement {
                    subject: unit.subject,
                    candidate: unit.candidates[i],
                })
            })
            .collect();

        let mut vars = if self.deepest_wiped.is_empty() {
            (0..self.model.units.len())
                .filter(|&v| self.deepest[v].is_none())
                .collect()
        } else {
            self.deepest_wiped.clone()
        };
        vars.sort_by_key(|&v| (Reverse(self.wipeouts[v]), v));
        let blocking = vars
            .into_iter()
            .map(|var| BlockingVar {
                var,
                wipeouts: self.wipeouts[var],
            })
            .collect();

        SearchOutcome::Exhausted {
            deepest,
            blocking,
            stopped: match flow {
                Flow::Continue => None,
                Flow::Halt(reason) => Some(reason),
            },
            stats: self.stats,
        }
    }
}
