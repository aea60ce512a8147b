//! Horn clauses.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Atom, Goal, Literal, Predicate, Term, Transform};

/// A Horn clause `head :- b1, ..., bn`.
///
/// A clause without a head is a denial (`:- b1, ..., bn`). Equality and
/// hashing are structural: two clauses are equal iff they render the same,
/// so alpha-variants with different variable names are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub head: Option<Atom>,
    pub body: Vec<Atom>,
}

impl Clause {
    pub fn new(head: Atom, body: Vec<Atom>) -> Self {
        Clause {
            head: Some(head),
            body,
        }
    }

    pub fn fact(head: Atom) -> Self {
        Clause::new(head, Vec::new())
    }

    pub fn denial(body: Vec<Atom>) -> Self {
        Clause { head: None, body }
    }

    pub fn is_fact(&self) -> bool {
        self.head.is_some() && self.body.is_empty()
    }

    /// The head as a resolvable predicate, if it is one.
    pub fn head_predicate(&self) -> Option<&Predicate> {
        self.head.as_ref().and_then(Atom::as_predicate)
    }

    /// Number of body atoms.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// A copy of this clause with `atom` appended to the body.
    pub fn extended(&self, atom: Atom) -> Clause {
        let mut body = self.body.clone();
        body.push(atom);
        Clause {
            head: self.head.clone(),
            body,
        }
    }

    /// The body as a conjunctive goal.
    pub fn body_goal(&self) -> Goal {
        Goal::new(self.body.iter().cloned().map(Literal::Atom).collect())
    }

    /// Literal that proves the head.
    pub fn head_goal(&self) -> Option<Goal> {
        self.head
            .as_ref()
            .map(|h| Goal::new(vec![Literal::Atom(h.clone())]))
    }
}

impl Transform for Clause {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        Clause {
            head: self.head.as_ref().map(|h| h.transform(f)),
            body: self.body.transform(f),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        if let Some(h) = &self.head {
            h.visit(f);
        }
        self.body.visit(f);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(h) = &self.head {
            write!(f, "{}", h)?;
            if self.body.is_empty() {
                return Ok(());
            }
            write!(f, " ")?;
        }
        write!(f, ":- ")?;
        for (i, atom) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}
