//! Goal-level query driver with negation-as-failure.

use tracing::trace;

use super::resolution::{Budget, Resolution};
use crate::knowledge::Knowledge;
use crate::syntax::{Goal, Literal, Transform, Var};
use crate::unify::Substitution;

/// Generator for one goal position.
enum Frame<'k> {
    /// Yields a single substitution once.
    Ready(Option<Substitution>),
    Resolving(Resolution<'k>),
}

impl<'k> Frame<'k> {
    fn next_solution(&mut self, budget: &mut Budget) -> Option<Substitution> {
        match self {
            Frame::Ready(sigma) => sigma.take(),
            Frame::Resolving(resolution) => resolution.next_solution(budget),
        }
    }
}

/// Lazy sequence of answers to a goal.
///
/// Literals are solved left to right with one frame per position;
/// backtracking pops back to the previous frame. Every answer is
/// restricted to the variables of the goal.
pub struct Solutions<'k> {
    knowledge: &'k dyn Knowledge,
    literals: Vec<Literal>,
    query_vars: Vec<Var>,
    frames: Vec<Frame<'k>>,
    budget: Budget,
}

impl<'k> Solutions<'k> {
    pub(crate) fn new(
        goal: &Goal,
        knowledge: &'k dyn Knowledge,
        sigma: &Substitution,
        budget: Budget,
    ) -> Self {
        let mut sigma0 = sigma.clone();
        sigma0.add_variables(goal);
        Solutions {
            knowledge,
            literals: goal.literals.clone(),
            query_vars: goal.variables(),
            frames: vec![Frame::Ready(Some(sigma0))],
            budget,
        }
    }

    /// Whether the resolution budget ran out at some point.
    ///
    /// When it did, the answers produced may be incomplete.
    pub fn hit_limit(&self) -> bool {
        self.budget.exhausted()
    }

    /// Whether `goal` has a solution under `sigma`, sharing this query's budget.
    fn provable(&mut self, goal: &Goal, sigma: &Substitution) -> bool {
        let mut inner = Solutions::new(goal, self.knowledge, sigma, self.budget);
        let found = inner.next().is_some();
        self.budget = inner.budget;
        found
    }
}

impl<'k> Iterator for Solutions<'k> {
    type Item = Substitution;

    fn next(&mut self) -> Option<Substitution> {
        loop {
            let frame = self.frames.last_mut()?;
            let Some(sigma) = frame.next_solution(&mut self.budget) else {
                self.frames.pop();
                continue;
            };
            let position = self.frames.len() - 1;
            let Some(literal) = self.literals.get(position).cloned() else {
                return Some(sigma.restrict(&self.query_vars));
            };
            match literal {
                Literal::Atom(atom) => {
                    let resolution = Resolution::new(atom, sigma, self.knowledge);
                    self.frames.push(Frame::Resolving(resolution));
                }
                Literal::Not(sub) => {
                    if self.provable(&sub, &sigma) {
                        trace!(goal = %sub, "negated goal is provable");
                    } else {
                        self.frames.push(Frame::Ready(Some(sigma)));
                    }
                }
            }
        }
    }
}
