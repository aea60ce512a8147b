//! Clause store indexed by predicate and argument shape.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use super::Knowledge;
use crate::error::{IlpError, Result};
use crate::syntax::{Clause, Constant, Predicate, Signature, Term, Transform};

type ClauseId = u64;

/// Index over the arguments of one functor.
///
/// `all` holds every clause whose term at this point has the functor; each
/// argument position refines it by the shape found there.
#[derive(Debug, Clone, Default)]
struct FunctorIndex {
    all: BTreeSet<ClauseId>,
    args: Vec<ArgumentIndex>,
}

#[derive(Debug, Clone, Default)]
struct ArgumentIndex {
    constants: HashMap<Constant, BTreeSet<ClauseId>>,
    variables: BTreeSet<ClauseId>,
    /// Lists and anything else not indexed further.
    opaque: BTreeSet<ClauseId>,
    nested: HashMap<Signature, FunctorIndex>,
}

impl FunctorIndex {
    fn new(arity: usize) -> Self {
        FunctorIndex {
            all: BTreeSet::new(),
            args: vec![ArgumentIndex::default(); arity],
        }
    }

    fn insert(&mut self, id: ClauseId, args: &[Term]) {
        self.all.insert(id);
        for (slot, arg) in self.args.iter_mut().zip(args) {
            slot.insert(id, arg);
        }
    }

    fn remove(&mut self, id: ClauseId, args: &[Term]) {
        self.all.remove(&id);
        for (slot, arg) in self.args.iter_mut().zip(args) {
            slot.remove(id, arg);
        }
    }

    /// Clauses whose arguments could unify with `args`.
    fn matching(&self, args: &[Term]) -> BTreeSet<ClauseId> {
        let mut result = self.all.clone();
        for (slot, arg) in self.args.iter().zip(args) {
            if result.is_empty() {
                break;
            }
            if let Some(candidates) = slot.matching(arg) {
                result.retain(|id| candidates.contains(id));
            }
        }
        result
    }
}

impl ArgumentIndex {
    fn insert(&mut self, id: ClauseId, term: &Term) {
        match term {
            Term::Var(_) => {
                self.variables.insert(id);
            }
            Term::Constant(c) => {
                self.constants.entry(c.clone()).or_default().insert(id);
            }
            Term::Compound(functor, args) => {
                self.nested
                    .entry(Signature::new(functor.clone(), args.len()))
                    .or_insert_with(|| FunctorIndex::new(args.len()))
                    .insert(id, args);
            }
            Term::List(..) | Term::Placeholder(_) => {
                self.opaque.insert(id);
            }
        }
    }

    fn remove(&mut self, id: ClauseId, term: &Term) {
        match term {
            Term::Var(_) => {
                self.variables.remove(&id);
            }
            Term::Constant(c) => {
                if let Some(ids) = self.constants.get_mut(c) {
                    ids.remove(&id);
                    if ids.is_empty() {
                        self.constants.remove(c);
                    }
                }
            }
            Term::Compound(functor, args) => {
                let sig = Signature::new(functor.clone(), args.len());
                if let Some(nested) = self.nested.get_mut(&sig) {
                    nested.remove(id, args);
                    if nested.all.is_empty() {
                        self.nested.remove(&sig);
                    }
                }
            }
            Term::List(..) | Term::Placeholder(_) => {
                self.opaque.remove(&id);
            }
        }
    }

    /// Clauses whose term at this position could unify with `term`, or
    /// `None` when the position does not constrain the match.
    fn matching(&self, term: &Term) -> Option<BTreeSet<ClauseId>> {
        let mut result = self.variables.clone();
        match term {
            Term::Var(_) => return None,
            Term::Constant(c) => {
                if let Some(ids) = self.constants.get(c) {
                    result.extend(ids);
                }
            }
            Term::Compound(functor, args) => {
                if let Some(nested) = self.nested.get(&Signature::new(functor.clone(), args.len())) {
                    result.extend(nested.matching(args));
                }
            }
            Term::List(..) | Term::Placeholder(_) => {
                result.extend(&self.opaque);
            }
        }
        Some(result)
    }
}

/// An indexed, insertion-ordered set of clauses.
///
/// Clauses are keyed by `name/arity` of their head, then per argument by
/// constant value, variable, or nested functor. Lookups over-approximate:
/// every clause whose head unifies with the query is returned, some that
/// do not may be.
#[derive(Debug, Clone, Default)]
pub struct TreeKnowledge {
    clauses: BTreeMap<ClauseId, Clause>,
    ids: HashMap<Clause, ClauseId>,
    index: HashMap<Signature, FunctorIndex>,
    next_id: ClauseId,
}

impl TreeKnowledge {
    pub fn new() -> Self {
        TreeKnowledge::default()
    }

    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Result<Self> {
        let mut knowledge = TreeKnowledge::new();
        for clause in clauses {
            knowledge.add(clause)?;
        }
        Ok(knowledge)
    }

    /// Signatures of every stored predicate.
    pub fn signatures(&self) -> Vec<Signature> {
        let mut sigs: Vec<Signature> = self
            .index
            .iter()
            .filter(|(_, idx)| !idx.all.is_empty())
            .map(|(sig, _)| sig.clone())
            .collect();
        sigs.sort();
        sigs
    }
}

fn head_of(clause: &Clause) -> Result<&Predicate> {
    clause
        .head_predicate()
        .ok_or_else(|| IlpError::malformed(format!("clause `{}` has no predicate head", clause)))
}

impl Knowledge for TreeKnowledge {
    fn candidates(&self, atom: &Predicate) -> Vec<&Clause> {
        let Some(index) = self.index.get(&atom.signature()) else {
            return Vec::new();
        };
        index
            .matching(&atom.args)
            .into_iter()
            .filter_map(|id| self.clauses.get(&id))
            .collect()
    }

    fn clauses(&self) -> Vec<&Clause> {
        self.clauses.values().collect()
    }

    fn add(&mut self, clause: Clause) -> Result<bool> {
        let head = head_of(&clause)?;
        if clause.has_placeholders() {
            return Err(IlpError::malformed(format!(
                "mode placeholder in clause `{}`",
                clause
            )));
        }
        if self.ids.contains_key(&clause) {
            return Ok(false);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.index
            .entry(head.signature())
            .or_insert_with(|| FunctorIndex::new(head.arity()))
            .insert(id, &head.args);
        trace!(clause = %clause, id, "stored clause");
        self.ids.insert(clause.clone(), id);
        self.clauses.insert(id, clause);
        Ok(true)
    }

    fn remove(&mut self, clause: &Clause) -> bool {
        let Some(id) = self.ids.remove(clause) else {
            return false;
        };
        self.clauses.remove(&id);
        if let Some(head) = clause.head_predicate() {
            let sig = head.signature();
            if let Some(index) = self.index.get_mut(&sig) {
                index.remove(id, &head.args);
                if index.all.is_empty() {
                    self.index.remove(&sig);
                }
            }
        }
        trace!(clause = %clause, id, "removed clause");
        true
    }

    fn contains(&self, clause: &Clause) -> bool {
        self.ids.contains_key(clause)
    }

    fn len(&self) -> usize {
        self.clauses.len()
    }
}
