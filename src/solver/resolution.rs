//! SLD resolution of a single atom with an explicit choice-point stack.

use std::collections::HashMap;

use tracing::trace;

use super::eval;
use crate::knowledge::Knowledge;
use crate::syntax::{Atom, Clause, Predicate};
use crate::unify::Substitution;

/// Resolution steps still available to one query.
///
/// Each attempt to resolve an atom against a clause costs one step. Once
/// the budget runs out every pending derivation is abandoned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    remaining: usize,
    exhausted: bool,
}

impl Budget {
    pub(crate) fn new(steps: usize) -> Self {
        Budget {
            remaining: steps,
            exhausted: false,
        }
    }

    fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            self.exhausted = true;
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.exhausted
    }
}

/// A node of the derivation: atoms still to prove under `sigma`.
///
/// `next_clause` is set on alternatives that re-queue an atom against a
/// specific candidate, so the store is not consulted again for it.
#[derive(Clone)]
struct State<'k> {
    atoms: Vec<Atom>,
    sigma: Substitution,
    next_clause: Option<&'k Clause>,
}

/// Lazy enumeration of the substitutions proving one atom.
pub(crate) struct Resolution<'k> {
    knowledge: &'k dyn Knowledge,
    current: Option<State<'k>>,
    alternatives: Vec<State<'k>>,
}

impl<'k> Resolution<'k> {
    pub(crate) fn new(atom: Atom, sigma: Substitution, knowledge: &'k dyn Knowledge) -> Self {
        Resolution {
            knowledge,
            current: Some(State {
                atoms: vec![atom],
                sigma,
                next_clause: None,
            }),
            alternatives: Vec::new(),
        }
    }

    fn backtrack(&mut self) {
        self.current = self.alternatives.pop();
    }

    /// The next solution, or `None` once the search space or budget is spent.
    pub(crate) fn next_solution(&mut self, budget: &mut Budget) -> Option<Substitution> {
        loop {
            let mut state = self.current.take()?;
            let Some(atom) = state.atoms.pop() else {
                self.backtrack();
                return Some(state.sigma);
            };
            let atom = state.sigma.apply(&atom);
            let predicate = match atom {
                Atom::Compare(cmp) => {
                    if eval::holds(&cmp, &mut state.sigma) {
                        self.current = Some(state);
                    } else {
                        trace!(comparison = %cmp, "comparison failed");
                        self.backtrack();
                    }
                    continue;
                }
                Atom::Predicate(p) => p,
            };
            match builtin(&predicate) {
                Some(true) => {
                    self.current = Some(state);
                    continue;
                }
                Some(false) => {
                    self.backtrack();
                    continue;
                }
                None => {}
            }

            let clause = match state.next_clause.take() {
                Some(clause) => clause,
                None => {
                    let candidates = self.knowledge.candidates(&predicate);
                    trace!(atom = %predicate, candidates = candidates.len(), "matching");
                    let mut candidates = candidates.into_iter();
                    let Some(first) = candidates.next() else {
                        self.backtrack();
                        continue;
                    };
                    for alternative in candidates.rev() {
                        let mut atoms = state.atoms.clone();
                        atoms.push(Atom::Predicate(predicate.clone()));
                        self.alternatives.push(State {
                            atoms,
                            sigma: state.sigma.clone(),
                            next_clause: Some(alternative),
                        });
                    }
                    first
                }
            };

            if !budget.spend() {
                trace!(atom = %predicate, "resolution budget exhausted");
                self.current = None;
                self.alternatives.clear();
                return None;
            }

            let renamed = match state.sigma.rename(clause, &mut HashMap::new(), true) {
                Ok(renamed) => renamed,
                Err(_) => {
                    self.backtrack();
                    continue;
                }
            };
            let Some(head) = renamed.head.as_ref() else {
                self.backtrack();
                continue;
            };
            if let Err(e) = state.sigma.unify_atoms(&Atom::Predicate(predicate), head) {
                trace!(clause = %clause, error = %e, "unification failed");
                self.backtrack();
                continue;
            }
            state.atoms.extend(renamed.body.into_iter().rev());
            self.current = Some(state);
        }
    }
}

/// `true` succeeds, `fail` and `false` fail; anything else is resolved.
fn builtin(p: &Predicate) -> Option<bool> {
    if !p.args.is_empty() {
        return None;
    }
    match p.name.as_str() {
        "true" => Some(true),
        "fail" | "false" => Some(false),
        _ => None,
    }
}
