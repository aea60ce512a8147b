//! Bottom clause construction by mode-directed inverse entailment.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use crate::error::{IlpError, Result};
use crate::knowledge::{Knowledge, Layer, MultipleKnowledge, TreeKnowledge};
use crate::modes::{Mode, ModeCollection};
use crate::options::Options;
use crate::solver::Solver;
use crate::syntax::{Atom, Clause, Goal, Predicate, Sign, Term, Transform, Var};
use crate::unify::{generic_name, Substitution};

/// Variables one atom of a bottom clause consumes (`+`) and produces (`-`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub inputs: Vec<Var>,
    pub outputs: Vec<Var>,
}

impl Link {
    fn renamed(&self, names: &HashMap<Var, Var>) -> Link {
        let rename = |vars: &[Var]| -> Vec<Var> {
            vars.iter()
                .map(|v| names.get(v).cloned().unwrap_or_else(|| v.clone()))
                .collect()
        };
        Link {
            inputs: rename(&self.inputs),
            outputs: rename(&self.outputs),
        }
    }
}

/// The most specific clause for one example, with the variable flow of
/// each atom kept for the search heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomClause {
    clause: Clause,
    head: Link,
    body: Vec<Link>,
    depths: HashMap<Var, usize>,
}

impl BottomClause {
    /// `links[k]` describes `clause.body[k]`.
    pub fn new(clause: Clause, head: Link, links: Vec<Link>) -> Self {
        let depths = variable_depths(&head, &links);
        BottomClause {
            clause,
            head,
            body: links,
            depths,
        }
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    pub fn head(&self) -> Option<&Atom> {
        self.clause.head.as_ref()
    }

    pub fn body(&self) -> &[Atom] {
        &self.clause.body
    }

    pub fn len(&self) -> usize {
        self.clause.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clause.body.is_empty()
    }

    pub fn link(&self, index: usize) -> Option<&Link> {
        self.body.get(index)
    }

    /// Length of the shortest chain of atoms from the head inputs to `var`.
    pub fn depth(&self, var: &Var) -> Option<usize> {
        self.depths.get(var).copied()
    }

    /// Optimistic count of atoms still missing from a clause built from the
    /// body atoms at `chosen`.
    ///
    /// A variable is unresolved if it is a head output no chosen atom
    /// produces, or an input of a chosen atom that neither the head nor a
    /// chosen atom provides. The estimate is the smallest depth among the
    /// unresolved variables, and 0 when there are none.
    pub fn remaining_depth(&self, chosen: &[usize]) -> usize {
        let links: Vec<&Link> = chosen.iter().filter_map(|&k| self.body.get(k)).collect();
        let available: HashSet<&Var> = self
            .head
            .inputs
            .iter()
            .chain(links.iter().flat_map(|l| l.outputs.iter()))
            .collect();
        let unresolved: Vec<&Var> = self
            .head
            .outputs
            .iter()
            .chain(links.iter().flat_map(|l| l.inputs.iter()))
            .filter(|v| !available.contains(v))
            .collect();
        if unresolved.is_empty() {
            return 0;
        }
        unresolved
            .into_iter()
            .filter_map(|v| self.depth(v))
            .min()
            .unwrap_or(1)
            .max(1)
    }

    /// Rename every variable to `A, B, ...` by first occurrence.
    pub fn with_generic_names(self) -> BottomClause {
        let mut names: HashMap<Var, Var> = HashMap::new();
        for v in self.clause.variables() {
            let image = Var::new(generic_name(names.len()));
            names.insert(v, image);
        }
        let clause = self.clause.transform(&mut |t| match t {
            Term::Var(v) => names.get(v).cloned().map(Term::Var),
            _ => None,
        });
        let head = self.head.renamed(&names);
        let links = self.body.iter().map(|l| l.renamed(&names)).collect();
        BottomClause::new(clause, head, links)
    }
}

impl fmt::Display for BottomClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)
    }
}

/// Depth of every variable reachable from the head inputs.
fn variable_depths(head: &Link, body: &[Link]) -> HashMap<Var, usize> {
    let mut depths: HashMap<Var, usize> = head.inputs.iter().map(|v| (v.clone(), 0)).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for link in body {
            let level = link
                .inputs
                .iter()
                .try_fold(0, |acc, v| depths.get(v).map(|&d| acc.max(d)));
            let Some(level) = level else {
                continue;
            };
            for out in &link.outputs {
                if depths.get(out).map_or(true, |&old| level + 1 < old) {
                    depths.insert(out.clone(), level + 1);
                    changed = true;
                }
            }
        }
    }
    depths
}

/// Build the bottom clause of `example`.
///
/// The example's body atoms are added as temporary facts on top of
/// `background`. The head mode for the example's predicate fixes the head;
/// each of `options.i` rounds then queries every permitted body mode on
/// all combinations of the terms available as inputs.
pub fn build_bottom_clause(
    example: &Clause,
    modes: &ModeCollection,
    background: &dyn Knowledge,
    options: &Options,
) -> Result<BottomClause> {
    let head = example
        .head_predicate()
        .ok_or_else(|| IlpError::malformed(format!("example `{}` has no predicate head", example)))?;
    let mode = modes.head_mode(&head.signature())?;
    let facts = TreeKnowledge::from_clauses(example.body.iter().cloned().map(Clause::fact))?;
    let working = MultipleKnowledge::new()
        .with_layer(Layer::Owned(Box::new(facts)))
        .with_layer(Layer::Shared(background));

    let mut saturation = Saturation {
        knowledge: &working,
        solver: Solver::from_options(options),
        max_recall: options.max_recall,
        names: Names::default(),
        atoms: Vec::new(),
        links: Vec::new(),
    };
    let (head_atom, head_link, mut in_terms) = saturation.head(mode, head)?;
    let body_modes = modes.body_modes_for(mode);
    for round in 0..options.i {
        let mut produced = Vec::new();
        for body_mode in &body_modes {
            saturation.expand(body_mode, &in_terms, &mut produced);
        }
        debug!(
            round,
            inputs = in_terms.len(),
            atoms = saturation.atoms.len(),
            "bottom clause round"
        );
        in_terms = produced;
    }

    let body = saturation.atoms.into_iter().map(Atom::Predicate).collect();
    let bottom = BottomClause::new(
        Clause::new(Atom::Predicate(head_atom), body),
        head_link,
        saturation.links,
    );
    Ok(if options.generic_variable_names {
        bottom.with_generic_names()
    } else {
        bottom
    })
}

/// Variable assigned to each ground term met while saturating.
#[derive(Default)]
struct Names {
    vars: HashMap<Term, Var>,
    used: HashSet<String>,
}

impl Names {
    fn var_for(&mut self, term: &Term) -> Var {
        if let Some(v) = self.vars.get(term) {
            return v.clone();
        }
        let symbol = term.to_variable_symbol();
        let mut tally = 0;
        let var = loop {
            let candidate = Var::with_tally(symbol.as_str(), tally);
            if self.used.insert(candidate.to_string()) {
                break candidate;
            }
            tally += 1;
        };
        self.vars.insert(term.clone(), var.clone());
        var
    }
}

struct Saturation<'k> {
    knowledge: &'k dyn Knowledge,
    solver: Solver,
    max_recall: usize,
    names: Names,
    atoms: Vec<Predicate>,
    links: Vec<Link>,
}

impl<'k> Saturation<'k> {
    /// Lift the example head through its mode. Returns the lifted head, its
    /// variable flow and the terms at input positions.
    fn head(&mut self, mode: &Mode, example: &Predicate) -> Result<(Predicate, Link, Vec<Term>)> {
        let mut scope = Substitution::empty();
        scope.add_variables(example);
        let template = mode.instantiate(&mut scope);
        scope
            .unify_atoms(
                &Atom::Predicate(template.atom.clone()),
                &Atom::Predicate(example.clone()),
            )
            .map_err(|e| {
                IlpError::malformed(format!("example `{}` does not fit {}: {}", example, mode, e))
            })?;

        let mut link = Link::default();
        let mut in_terms = Vec::new();
        let mut images = HashMap::new();
        for (var, placeholder) in &template.slots {
            let term = scope.apply(&Term::Var(var.clone()));
            let image = match placeholder.sign {
                Sign::Constant => term,
                Sign::Input => {
                    let v = self.names.var_for(&term);
                    push_unique(&mut in_terms, term);
                    link.inputs.push(v.clone());
                    Term::Var(v)
                }
                Sign::Output => {
                    let v = self.names.var_for(&term);
                    link.outputs.push(v.clone());
                    Term::Var(v)
                }
            };
            images.insert(var.clone(), image);
        }
        Ok((substitute(&template.atom, &images), link, in_terms))
    }

    /// Query `mode` on every input combination, appending new atoms and
    /// collecting the output terms in `produced`.
    fn expand(&mut self, mode: &Mode, in_terms: &[Term], produced: &mut Vec<Term>) {
        let mut scope = Substitution::empty();
        let template = mode.instantiate(&mut scope);
        let inputs: Vec<&Var> = template
            .slots
            .iter()
            .filter(|(_, p)| p.sign == Sign::Input)
            .map(|(v, _)| v)
            .collect();
        let recall = mode.recall.limit(self.max_recall);

        for combination in combinations(inputs.len(), in_terms) {
            let mut sigma = scope.clone();
            let bound = inputs
                .iter()
                .zip(&combination)
                .all(|(v, t)| sigma.bind((*v).clone(), t.clone()).is_ok());
            if !bound {
                continue;
            }
            let goal = Goal::atom(Atom::Predicate(sigma.apply(&template.atom)));
            let answers: Vec<Substitution> = self
                .solver
                .query_from(&goal, self.knowledge, &sigma)
                .take(recall)
                .collect();

            for answer in answers {
                let values: Vec<Term> = template
                    .slots
                    .iter()
                    .map(|(v, _)| answer.apply(&sigma.apply(&Term::Var(v.clone()))))
                    .collect();
                if !values.iter().all(Term::is_ground) {
                    trace!(goal = %goal, answer = %answer, "skipping non-ground answer");
                    continue;
                }
                let mut link = Link::default();
                let mut images = HashMap::new();
                for ((var, placeholder), term) in template.slots.iter().zip(values) {
                    let image = match placeholder.sign {
                        Sign::Constant => term,
                        Sign::Input => {
                            let v = self.names.var_for(&term);
                            link.inputs.push(v.clone());
                            Term::Var(v)
                        }
                        Sign::Output => {
                            let v = self.names.var_for(&term);
                            link.outputs.push(v.clone());
                            push_unique(produced, term);
                            Term::Var(v)
                        }
                    };
                    images.insert(var.clone(), image);
                }
                let atom = substitute(&template.atom, &images);
                if !self.atoms.contains(&atom) {
                    trace!(atom = %atom, "bottom clause atom");
                    self.atoms.push(atom);
                    self.links.push(link);
                }
            }
        }
    }
}

fn substitute(atom: &Predicate, images: &HashMap<Var, Term>) -> Predicate {
    atom.transform(&mut |t| match t {
        Term::Var(v) => images.get(v).cloned(),
        _ => None,
    })
}

fn push_unique(terms: &mut Vec<Term>, term: Term) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

/// Every `width`-tuple over `pool`, in lexicographic order of positions.
fn combinations(width: usize, pool: &[Term]) -> Vec<Vec<Term>> {
    let mut tuples = vec![Vec::new()];
    for _ in 0..width {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                pool.iter().map(move |t| {
                    let mut next = prefix.clone();
                    next.push(t.clone());
                    next
                })
            })
            .collect();
    }
    tuples
}
