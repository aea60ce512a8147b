//! Unification: substitutions, most general unifiers and renaming apart.

mod substitution;
mod unify;

pub use substitution::{generic_variable_names, Substitution};
pub use unify::{unify, unify_atoms, unify_many, UnifyError, UnifyResult};

pub(crate) use substitution::generic_name;
