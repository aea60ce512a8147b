//! Best-first branch-and-bound search over the refinements of a bottom clause.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::bottom::BottomClause;
use crate::events::EventLog;
use crate::knowledge::{Knowledge, Layer, MultipleKnowledge, TreeKnowledge};
use crate::solver::Solver;
use crate::syntax::{Atom, Clause, Goal};

/// Hard cap on the number of states taken from the open set.
pub const MAX_ITERATIONS: usize = 100;

/// A partial clause and its coverage scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub clause: Clause,
    /// Indices into the bottom clause body of the chosen atoms.
    pub chosen: Vec<usize>,
    /// Next bottom clause atom that may be appended.
    pub cursor: usize,
    pub p: i64,
    pub n: i64,
    pub c: i64,
    pub h: i64,
    pub g: i64,
    pub f: i64,
    /// Indices of the covered positive and negative examples.
    covered_positive: Vec<usize>,
    covered_negative: Vec<usize>,
}

impl SearchState {
    pub fn covered_positive(&self) -> &[usize] {
        &self.covered_positive
    }

    pub fn covered_negative(&self) -> &[usize] {
        &self.covered_negative
    }

    /// Covers no negative example and needs no further atoms.
    pub fn is_solution(&self) -> bool {
        self.n == 0 && self.h == 0 && self.p > 0
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [p={} n={} c={} h={} g={} f={}]",
            self.clause, self.p, self.n, self.c, self.h, self.g, self.f
        )
    }
}

/// Search for the best clause between `head :- true` and a bottom clause.
pub struct HypothesisSearch<'a> {
    bottom: &'a BottomClause,
    knowledge: &'a dyn Knowledge,
    positives: &'a [Clause],
    negatives: &'a [Clause],
    solver: Solver,
    max_body: usize,
}

impl<'a> HypothesisSearch<'a> {
    pub fn new(
        bottom: &'a BottomClause,
        knowledge: &'a dyn Knowledge,
        positives: &'a [Clause],
        negatives: &'a [Clause],
        solver: Solver,
        max_body: usize,
    ) -> Self {
        HypothesisSearch {
            bottom,
            knowledge,
            positives,
            negatives,
            solver,
            max_body,
        }
    }

    /// The state with no body atoms, scored against every example.
    pub fn root(&self) -> Option<SearchState> {
        let head = self.bottom.head()?.clone();
        let all_pos: Vec<usize> = (0..self.positives.len()).collect();
        let all_neg: Vec<usize> = (0..self.negatives.len()).collect();
        Some(self.score(Clause::fact(head), Vec::new(), 0, &all_pos, &all_neg))
    }

    /// Children appending one bottom clause atom at or after the cursor.
    ///
    /// Coverage of a child is only tested on the examples its parent covers.
    pub fn refine(&self, state: &SearchState) -> Vec<SearchState> {
        if state.clause.len() >= self.max_body {
            return Vec::new();
        }
        (state.cursor..self.bottom.len())
            .map(|k| {
                let mut chosen = state.chosen.clone();
                chosen.push(k);
                let atom = self.bottom.body()[k].clone();
                self.score(
                    state.clause.extended(atom),
                    chosen,
                    k + 1,
                    &state.covered_positive,
                    &state.covered_negative,
                )
            })
            .collect()
    }

    fn score(
        &self,
        clause: Clause,
        chosen: Vec<usize>,
        cursor: usize,
        positives: &[usize],
        negatives: &[usize],
    ) -> SearchState {
        let covered_positive = self.covered(&clause, self.positives, positives);
        let covered_negative = self.covered(&clause, self.negatives, negatives);
        let p = covered_positive.len() as i64;
        let n = covered_negative.len() as i64;
        let c = clause.len() as i64;
        let h = self.bottom.remaining_depth(&chosen) as i64;
        let g = p - c - h;
        SearchState {
            clause,
            chosen,
            cursor,
            p,
            n,
            c,
            h,
            g,
            f: g - n,
            covered_positive,
            covered_negative,
        }
    }

    /// Indices among `candidates` whose example head follows from the
    /// knowledge plus `clause`.
    fn covered(&self, clause: &Clause, examples: &[Clause], candidates: &[usize]) -> Vec<usize> {
        let mut hypothesis = TreeKnowledge::new();
        if hypothesis.add(clause.clone()).is_err() {
            return Vec::new();
        }
        let combined = MultipleKnowledge::new()
            .with_layer(Layer::Owned(Box::new(hypothesis)))
            .with_layer(Layer::Shared(self.knowledge));
        candidates
            .iter()
            .copied()
            .filter(|&i| {
                examples
                    .get(i)
                    .and_then(|e| e.head.clone())
                    .is_some_and(|head| self.solver.succeeds_on(&Goal::atom(head), &combined))
            })
            .collect()
    }

    fn pruned(&self, s: &SearchState) -> bool {
        (s.n == 0 && s.f > 0) || s.g <= 0 || s.c > self.max_body as i64
    }

    /// Index of the first state with the largest `f` among those within the
    /// body length limit.
    fn best<'s>(&self, states: impl IntoIterator<Item = &'s SearchState>) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (i, s) in states.into_iter().enumerate() {
            if s.c > self.max_body as i64 {
                continue;
            }
            if best.map_or(true, |(_, f)| s.f > f) {
                best = Some((i, s.f));
            }
        }
        best.map(|(i, _)| i)
    }

    fn best_solution<'s>(&self, closed: &'s [SearchState]) -> Option<&'s SearchState> {
        let solutions: Vec<&SearchState> = closed.iter().filter(|s| s.is_solution()).collect();
        self.best(solutions.iter().copied()).map(|i| solutions[i])
    }

    fn terminated(&self, closed: &[SearchState], open: &[SearchState]) -> bool {
        let Some(best_open) = self.best(open).map(|i| &open[i]) else {
            return true;
        };
        self.best_solution(closed)
            .is_some_and(|s| s.f > 0 && s.f >= best_open.g)
    }

    /// Run the search. Every novel state is recorded as a `Candidate` in `log`.
    pub fn run(&self, log: &mut EventLog) -> Option<SearchState> {
        let root = self.root()?;
        log.record("Candidate", &root);
        let mut seen: HashSet<Clause> = HashSet::new();
        seen.insert(root.clause.clone());
        let mut open = vec![root];
        let mut closed: Vec<SearchState> = Vec::new();

        for iteration in 0..MAX_ITERATIONS {
            let Some(index) = self.best(&open) else {
                break;
            };
            let state = open.remove(index);
            debug!(iteration, state = %state, "expanding search state");
            if !self.pruned(&state) {
                for child in self.refine(&state) {
                    if seen.insert(child.clause.clone()) {
                        log.record("Candidate", &child);
                        open.push(child);
                    }
                }
            }
            closed.push(state);
            if self.terminated(&closed, &open) {
                break;
            }
        }
        self.best_solution(&closed).cloned()
    }
}

/// Body atoms of `state` in bottom clause order.
pub fn chosen_atoms<'b>(bottom: &'b BottomClause, state: &SearchState) -> Vec<&'b Atom> {
    state
        .chosen
        .iter()
        .filter_map(|&k| bottom.body().get(k))
        .collect()
}
