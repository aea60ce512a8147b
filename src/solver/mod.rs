//! Resolution solver: SLD resolution with negation-as-failure over a [`Knowledge`].

mod eval;
mod query;
mod resolution;

pub use eval::{evaluate, holds, Number};
pub use query::Solutions;

use resolution::Budget;

use crate::knowledge::Knowledge;
use crate::options::Options;
use crate::syntax::Goal;
use crate::unify::Substitution;

/// Outcome of running a query to exhaustion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Answers restricted to the query's variables, in derivation order.
    Answers(Vec<Substitution>),
    /// The search space was exhausted without an answer.
    NoAnswers,
    /// No answer was found before the resolution budget ran out.
    ResourceLimit,
}

impl QueryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Answers(_))
    }

    pub fn answers(&self) -> &[Substitution] {
        match self {
            QueryResult::Answers(answers) => answers,
            _ => &[],
        }
    }
}

/// A depth-bounded SLD solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solver {
    /// Resolution steps allowed per top-level query.
    pub depth: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::from_options(&Options::default())
    }
}

impl Solver {
    pub fn new(depth: usize) -> Self {
        Solver { depth }
    }

    pub fn from_options(options: &Options) -> Self {
        Solver::new(options.h)
    }

    /// Lazily enumerate the answers to `goal`.
    pub fn query<'k>(&self, goal: &Goal, knowledge: &'k dyn Knowledge) -> Solutions<'k> {
        self.query_from(goal, knowledge, &Substitution::empty())
    }

    /// Like [`Solver::query`], starting from the bindings in `sigma`.
    pub fn query_from<'k>(
        &self,
        goal: &Goal,
        knowledge: &'k dyn Knowledge,
        sigma: &Substitution,
    ) -> Solutions<'k> {
        Solutions::new(goal, knowledge, sigma, Budget::new(self.depth))
    }

    /// Whether `goal` has at least one answer. Stops at the first one.
    pub fn succeeds_on(&self, goal: &Goal, knowledge: &dyn Knowledge) -> bool {
        self.query(goal, knowledge).next().is_some()
    }

    /// Collect every answer, reporting an exhausted budget when none was found.
    pub fn solve(&self, goal: &Goal, knowledge: &dyn Knowledge) -> QueryResult {
        let mut solutions = self.query(goal, knowledge);
        let answers: Vec<Substitution> = solutions.by_ref().collect();
        if !answers.is_empty() {
            QueryResult::Answers(answers)
        } else if solutions.hit_limit() {
            QueryResult::ResourceLimit
        } else {
            QueryResult::NoAnswers
        }
    }
}
