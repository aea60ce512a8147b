//! Atoms: resolvable predicates and evaluated comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::{write_args, Constant};
use super::{Comparison, Signature, Term, Transform};

/// `name(t1, ..., tn)`, resolved against the clause store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub args: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        Predicate {
            name: name.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.name.clone(), self.args.len())
    }
}

impl Transform for Predicate {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        Predicate {
            name: self.name.clone(),
            args: self.args.transform(f),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        self.args.visit(f);
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Constant::Symbol(self.name.clone()))?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            write_args(f, &self.args)?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// An atom in a clause body or goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    Predicate(Predicate),
    Compare(Comparison),
}

impl Atom {
    pub fn predicate(name: impl Into<String>, args: Vec<Term>) -> Self {
        Atom::Predicate(Predicate::new(name, args))
    }

    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Atom::Predicate(p) => Some(p),
            Atom::Compare(_) => None,
        }
    }

    /// `name/arity` of a predicate atom.
    pub fn signature(&self) -> Option<Signature> {
        self.as_predicate().map(Predicate::signature)
    }
}

impl From<Predicate> for Atom {
    fn from(p: Predicate) -> Self {
        Atom::Predicate(p)
    }
}

impl From<Comparison> for Atom {
    fn from(c: Comparison) -> Self {
        Atom::Compare(c)
    }
}

impl Transform for Atom {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        match self {
            Atom::Predicate(p) => Atom::Predicate(p.transform(f)),
            Atom::Compare(c) => Atom::Compare(c.transform(f)),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        match self {
            Atom::Predicate(p) => p.visit(f),
            Atom::Compare(c) => c.visit(f),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Predicate(p) => write!(f, "{}", p),
            Atom::Compare(c) => write!(f, "{}", c),
        }
    }
}
