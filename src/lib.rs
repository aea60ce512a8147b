//! ilplog: Progol-style inductive logic programming.
//!
//! Learns Horn clauses from background knowledge, mode declarations and
//! positive and negative examples. Each positive example is saturated into a
//! bottom clause, whose subsets are searched best-first for the clause that
//! covers the most positives and no negatives.

pub mod error;
pub mod events;
pub mod knowledge;
pub mod learn;
pub mod modes;
pub mod options;
pub mod parser;
pub mod program;
pub mod repl;
pub mod session;
pub mod solver;
pub mod syntax;
pub mod unify;

pub use error::{IlpError, Result};
pub use learn::{Examples, Induction, ProgolLearner};
pub use options::Options;
pub use program::Program;
pub use solver::{QueryResult, Solver};

#[cfg(test)]
mod tests;
