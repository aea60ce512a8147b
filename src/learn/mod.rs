//! Clause induction: bottom clauses, hypothesis search and the cover-set loop.

mod bottom;
mod search;

pub use bottom::{build_bottom_clause, BottomClause, Link};
pub use search::{chosen_atoms, HypothesisSearch, SearchState, MAX_ITERATIONS};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IlpError, Result};
use crate::events::{EventLog, Section};
use crate::knowledge::{Knowledge, Layer, MultipleKnowledge, TreeKnowledge};
use crate::modes::ModeCollection;
use crate::options::Options;
use crate::solver::Solver;
use crate::syntax::{Clause, Goal};

/// Positive and negative examples.
///
/// An example is a clause whose head is the instance to cover; its body
/// atoms are extra facts available only while building its bottom clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examples {
    pub positive: Vec<Clause>,
    pub negative: Vec<Clause>,
}

impl Examples {
    pub fn new() -> Self {
        Examples::default()
    }

    pub fn add_positive(&mut self, example: Clause) -> Result<()> {
        check_example(&example)?;
        self.positive.push(example);
        Ok(())
    }

    pub fn add_negative(&mut self, example: Clause) -> Result<()> {
        check_example(&example)?;
        self.negative.push(example);
        Ok(())
    }

    pub fn extend(&mut self, other: Examples) {
        self.positive.extend(other.positive);
        self.negative.extend(other.negative);
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_example(example: &Clause) -> Result<()> {
    if example.head_predicate().is_none() {
        return Err(IlpError::malformed(format!(
            "example `{}` has no predicate head",
            example
        )));
    }
    Ok(())
}

/// Outcome of one induction run.
#[derive(Debug, Clone)]
pub struct Induction {
    /// Learned clauses in the order they were found.
    pub learned: Vec<Clause>,
    /// Positive examples no learned clause covers.
    pub uncovered: Vec<Clause>,
    /// The event log; empty unless `logging` was on.
    pub log: Section,
}

/// Progol-style learner.
#[derive(Debug, Clone, Default)]
pub struct ProgolLearner {
    pub options: Options,
}

impl ProgolLearner {
    pub fn new(options: Options) -> Self {
        ProgolLearner { options }
    }

    /// Learn clauses covering `examples.positive` and no negatives.
    ///
    /// Each iteration takes the first remaining positive example, builds its
    /// bottom clause, searches for the best refinement and drops every
    /// positive example the learned clauses now cover. An example its own
    /// iteration fails to cover moves to [`Induction::uncovered`]. At most
    /// `max_clauses` iterations run.
    pub fn induce(
        &self,
        background: &dyn Knowledge,
        modes: &ModeCollection,
        examples: &Examples,
    ) -> Result<Induction> {
        let options = &self.options;
        let solver = Solver::from_options(options);
        let mut log = EventLog::enabled("Induction", options.logging);
        log.record_with("Knowledge", || render(background.clauses()));
        log.record_with("Modes", || {
            modes
                .modes()
                .iter()
                .map(|m| m.to_string())
                .chain(modes.determinations().iter().map(|d| d.to_string()))
                .collect::<Vec<_>>()
                .join("\n")
        });
        log.record_with("Options", || {
            options
                .entries()
                .iter()
                .map(|(k, v)| format!("{} = {}", k, v))
                .collect::<Vec<_>>()
                .join("\n")
        });
        log.begin_child("Iterations");

        let mut learned = TreeKnowledge::new();
        let mut remaining = examples.positive.clone();
        let mut uncovered = Vec::new();
        let mut iterations = 0;
        while iterations < options.max_clauses {
            let Some(seed) = remaining.first().cloned() else {
                break;
            };
            log.begin_child(seed.to_string());
            log.record_with("Examples", || render(remaining.iter()));
            log.record("Current example", &seed);

            let found = {
                let whole = MultipleKnowledge::new()
                    .with_layer(Layer::Shared(&learned))
                    .with_layer(Layer::Shared(background));
                let bottom = build_bottom_clause(&seed, modes, &whole, options)?;
                log.record("Bottom clause", &bottom);
                debug!(bottom = %bottom, "built bottom clause");

                log.begin_child("States");
                let search = HypothesisSearch::new(
                    &bottom,
                    &whole,
                    &remaining,
                    &examples.negative,
                    solver,
                    options.c,
                );
                let found = search.run(&mut log);
                log.end_child();
                found
            };

            let mut whole = MultipleKnowledge::new()
                .with_layer(Layer::Borrowed(&mut learned))
                .with_layer(Layer::Shared(background));
            match found {
                Some(state) => {
                    log.record("Clause", &state.clause);
                    if options.verbose > 0 {
                        info!(clause = %state.clause, p = state.p, n = state.n, "learned clause");
                    } else {
                        debug!(clause = %state.clause, p = state.p, n = state.n, "learned clause");
                    }
                    whole.add(state.clause)?;
                }
                None => {
                    log.record("Clause", "none");
                    debug!(example = %seed, "no clause found");
                }
            }

            remaining.retain(|e| !covers(&solver, &whole, e));
            if remaining.first() == Some(&seed) {
                uncovered.push(remaining.remove(0));
            }
            iterations += 1;
            log.end_child();
        }
        uncovered.extend(remaining);

        log.end_child();
        log.record_with("Learned knowledge", || render(learned.clauses()));
        Ok(Induction {
            learned: learned.clauses().into_iter().cloned().collect(),
            uncovered,
            log: log.finish(),
        })
    }
}

fn covers(solver: &Solver, knowledge: &dyn Knowledge, example: &Clause) -> bool {
    example
        .head
        .clone()
        .is_some_and(|head| solver.succeeds_on(&Goal::atom(head), knowledge))
}

fn render<'c>(clauses: impl IntoIterator<Item = &'c Clause>) -> String {
    clauses
        .into_iter()
        .map(|c| format!("{}.", c))
        .collect::<Vec<_>>()
        .join("\n")
}
