//! Mode declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IlpError, Result};
use crate::syntax::{Placeholder, Predicate, Signature, Term, Transform, Var};
use crate::unify::Substitution;

/// Whether a mode describes clause heads (`modeh`) or body atoms (`modeb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    Head,
    Body,
}

impl ModeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ModeKind::Head => "modeh",
            ModeKind::Body => "modeb",
        }
    }
}

/// How many answers a mode may contribute per input combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recall {
    Bounded(usize),
    /// `*`, capped by the `max_recall` option.
    Unbounded,
}

impl Recall {
    pub fn limit(self, max_recall: usize) -> usize {
        match self {
            Recall::Bounded(n) => n,
            Recall::Unbounded => max_recall,
        }
    }
}

impl fmt::Display for Recall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recall::Bounded(n) => write!(f, "{}", n),
            Recall::Unbounded => write!(f, "*"),
        }
    }
}

/// `modeh(Recall, atom)` or `modeb(Recall, atom)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mode {
    pub kind: ModeKind,
    pub recall: Recall,
    pub atom: Predicate,
}

/// A mode atom with each placeholder replaced by a fresh variable.
#[derive(Debug, Clone)]
pub struct Template {
    pub atom: Predicate,
    /// The placeholder each fresh variable stands for, in argument order.
    pub slots: Vec<(Var, Placeholder)>,
}

impl Mode {
    /// A mode over `atom`. The atom may hold placeholders and ground terms,
    /// never variables.
    pub fn new(kind: ModeKind, recall: Recall, atom: Predicate) -> Result<Self> {
        if let Some(v) = atom.variables().first() {
            return Err(IlpError::malformed(format!(
                "variable {} in {} declaration for {}",
                v,
                kind.keyword(),
                atom
            )));
        }
        Ok(Mode { kind, recall, atom })
    }

    pub fn head(recall: Recall, atom: Predicate) -> Result<Self> {
        Mode::new(ModeKind::Head, recall, atom)
    }

    pub fn body(recall: Recall, atom: Predicate) -> Result<Self> {
        Mode::new(ModeKind::Body, recall, atom)
    }

    pub fn signature(&self) -> Signature {
        self.atom.signature()
    }

    /// Replace every placeholder with a variable fresh in `sigma`.
    pub fn instantiate(&self, sigma: &mut Substitution) -> Template {
        let mut slots = Vec::new();
        let atom = self.atom.transform(&mut |t| match t {
            Term::Placeholder(p) => {
                let var = sigma.fresh_var(&t.to_variable_symbol());
                slots.push((var.clone(), p.clone()));
                Some(Term::Var(var))
            }
            _ => None,
        });
        Template { atom, slots }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind.keyword(), self.recall, self.atom)
    }
}

/// `determination(head/n, body/m, ...)`: body predicates allowed for a head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Determination {
    pub head: Signature,
    pub body: Vec<Signature>,
}

impl Determination {
    pub fn new(head: Signature, body: Vec<Signature>) -> Self {
        Determination { head, body }
    }
}

impl fmt::Display for Determination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "determination({}", self.head)?;
        for sig in &self.body {
            write!(f, ", {}", sig)?;
        }
        write!(f, ")")
    }
}
