//! Syntax types: terms, atoms, clauses and goals.

mod arith;
mod atom;
mod clause;
mod literal;
mod query;
mod signature;
mod term;
mod transform;

pub use arith::{BinOp, CompareKind, CompareOp, Comparison, Expr, MathFn};
pub use atom::{Atom, Predicate};
pub use clause::Clause;
pub use literal::Literal;
pub use query::Goal;
pub use signature::Signature;
pub use term::{Constant, Placeholder, Sign, Term, Var};
pub use transform::Transform;
