//! Goals: conjunctions of literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Atom, Clause, Literal, Term, Transform};

/// A conjunctive goal, solved left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Goal {
    pub literals: Vec<Literal>,
}

impl Goal {
    pub fn new(literals: Vec<Literal>) -> Self {
        Goal { literals }
    }

    pub fn atom(atom: Atom) -> Self {
        Goal::new(vec![Literal::Atom(atom)])
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `not(body, not(head))`: true iff no instance of the body refutes the head.
    pub fn verification_of(clause: &Clause) -> Goal {
        let mut inner: Vec<Literal> = clause.body.iter().cloned().map(Literal::Atom).collect();
        if let Some(head) = &clause.head {
            inner.push(Literal::not(vec![Literal::Atom(head.clone())]));
        }
        Goal::new(vec![Literal::not(inner)])
    }
}

impl From<Vec<Literal>> for Goal {
    fn from(literals: Vec<Literal>) -> Self {
        Goal::new(literals)
    }
}

impl Transform for Goal {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        Goal::new(self.literals.transform(f))
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        self.literals.visit(f);
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lit)?;
        }
        Ok(())
    }
}
