//! Knowledge: clause stores the solver resolves against.

mod multiple;
mod tree;

pub use multiple::{Layer, MultipleKnowledge};
pub use tree::TreeKnowledge;

use crate::error::Result;
use crate::syntax::{Clause, Predicate};

/// A store of Horn clauses.
pub trait Knowledge {
    /// Clauses whose head may unify with `atom`, in a stable order.
    ///
    /// May include clauses that fail full unification, never omits one
    /// that would succeed.
    fn candidates(&self, atom: &Predicate) -> Vec<&Clause>;

    /// Every clause, in a stable order.
    fn clauses(&self) -> Vec<&Clause>;

    /// Insert a clause. Returns `false` if it was already present.
    fn add(&mut self, clause: Clause) -> Result<bool>;

    /// Remove a clause. Removing an absent clause is a no-op returning `false`.
    fn remove(&mut self, clause: &Clause) -> bool;

    fn contains(&self, clause: &Clause) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
