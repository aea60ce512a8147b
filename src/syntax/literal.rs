//! Goal literals: atoms and negation-as-failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Atom, Goal, Term, Transform};

/// One conjunct of a goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Atom(Atom),
    /// Succeeds iff the embedded goal has no solution. Never binds.
    Not(Goal),
}

impl Literal {
    pub fn not(literals: Vec<Literal>) -> Self {
        Literal::Not(Goal::new(literals))
    }

    pub fn is_negation(&self) -> bool {
        matches!(self, Literal::Not(_))
    }
}

impl From<Atom> for Literal {
    fn from(atom: Atom) -> Self {
        Literal::Atom(atom)
    }
}

impl Transform for Literal {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        match self {
            Literal::Atom(a) => Literal::Atom(a.transform(f)),
            Literal::Not(g) => Literal::Not(g.transform(f)),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        match self {
            Literal::Atom(a) => a.visit(f),
            Literal::Not(g) => g.visit(f),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Atom(a) => write!(f, "{}", a),
            Literal::Not(g) => write!(f, "not({})", g),
        }
    }
}
