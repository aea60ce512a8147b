//! Several stores queried as one.

use std::collections::HashSet;

use super::Knowledge;
use crate::error::{IlpError, Result};
use crate::syntax::{Clause, Predicate};

/// One member of a [`MultipleKnowledge`].
pub enum Layer<'a> {
    Owned(Box<dyn Knowledge + 'a>),
    Borrowed(&'a mut dyn Knowledge),
    /// Read-only; `add` and `remove` skip it.
    Shared(&'a dyn Knowledge),
}

impl<'a> Layer<'a> {
    fn get(&self) -> &dyn Knowledge {
        match self {
            Layer::Owned(k) => k.as_ref(),
            Layer::Borrowed(k) => &**k,
            Layer::Shared(k) => *k,
        }
    }

    fn get_mut(&mut self) -> Option<&mut dyn Knowledge> {
        match self {
            Layer::Owned(k) => Some(k.as_mut()),
            Layer::Borrowed(k) => Some(&mut **k),
            Layer::Shared(_) => None,
        }
    }
}

/// An ordered union of stores.
///
/// Lookups and iteration visit members in order and drop clauses already
/// produced by an earlier member. `add` always goes to the first member,
/// which is where callers keep the store they intend to grow.
#[derive(Default)]
pub struct MultipleKnowledge<'a> {
    layers: Vec<Layer<'a>>,
}

impl<'a> MultipleKnowledge<'a> {
    pub fn new() -> Self {
        MultipleKnowledge { layers: Vec::new() }
    }

    pub fn with_layer(mut self, layer: Layer<'a>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Layer<'a>) {
        self.layers.push(layer);
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn union<'s>(&'s self, per_layer: impl Fn(&'s dyn Knowledge) -> Vec<&'s Clause>) -> Vec<&'s Clause> {
        let mut seen: HashSet<&Clause> = HashSet::new();
        let mut out = Vec::new();
        for layer in &self.layers {
            for clause in per_layer(layer.get()) {
                if seen.insert(clause) {
                    out.push(clause);
                }
            }
        }
        out
    }
}

impl<'a> Knowledge for MultipleKnowledge<'a> {
    fn candidates(&self, atom: &Predicate) -> Vec<&Clause> {
        self.union(|k| k.candidates(atom))
    }

    fn clauses(&self) -> Vec<&Clause> {
        self.union(|k| k.clauses())
    }

    fn add(&mut self, clause: Clause) -> Result<bool> {
        match self.layers.first_mut() {
            Some(layer) => layer
                .get_mut()
                .ok_or(IlpError::ReadOnlyKnowledge)?
                .add(clause),
            None => Err(IlpError::ReadOnlyKnowledge),
        }
    }

    fn remove(&mut self, clause: &Clause) -> bool {
        let mut removed = false;
        for layer in &mut self.layers {
            if let Some(k) = layer.get_mut() {
                removed |= k.remove(clause);
            }
        }
        removed
    }

    fn contains(&self, clause: &Clause) -> bool {
        self.layers.iter().any(|l| l.get().contains(clause))
    }

    fn len(&self) -> usize {
        self.clauses().len()
    }
}
