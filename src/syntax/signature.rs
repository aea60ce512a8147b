//! Predicate signatures (`name/arity`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::Constant;

/// Name and arity of a predicate, written `name/arity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub arity: usize,
}

impl Signature {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Signature {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Constant::Symbol(self.name.clone()), self.arity)
    }
}
