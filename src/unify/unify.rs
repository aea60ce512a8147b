//! Unification entry points over fresh substitutions.

use thiserror::Error;

use super::Substitution;
use crate::syntax::{Atom, Term, Var};

/// Result of a unification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyResult {
    /// Unification succeeded with the given most general unifier.
    Success(Substitution),
    /// Unification failed.
    Failure(UnifyError),
}

impl UnifyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UnifyResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UnifyResult::Failure(_))
    }

    pub fn into_result(self) -> Result<Substitution, UnifyError> {
        match self {
            UnifyResult::Success(s) => Ok(s),
            UnifyResult::Failure(e) => Err(e),
        }
    }
}

impl From<Result<Substitution, UnifyError>> for UnifyResult {
    fn from(r: Result<Substitution, UnifyError>) -> Self {
        match r {
            Ok(s) => UnifyResult::Success(s),
            Err(e) => UnifyResult::Failure(e),
        }
    }
}

/// Reasons why unification can fail.
///
/// These are recovered by backtracking inside the solver and never reach
/// a query's caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("occurs check: {var} occurs in {term}")]
    OccursCheck { var: Var, term: Term },
    #[error("cannot unify {expected} with {found}")]
    SymbolClash { expected: String, found: String },
    #[error("arity mismatch for {symbol}: {expected} vs {found}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },
    #[error("closed lists of length {expected} and {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("mode placeholder {placeholder} cannot match {term}")]
    PlaceholderMismatch { placeholder: Term, term: Term },
    #[error("no renaming given for variable {0}")]
    UnmappedVariable(Var),
}

/// Compute the most general unifier of two terms.
pub fn unify(t1: &Term, t2: &Term) -> UnifyResult {
    let mut subst = Substitution::empty();
    subst.unify(t1, t2).map(|_| subst).into()
}

/// Compute the most general unifier of two atoms.
pub fn unify_atoms(a1: &Atom, a2: &Atom) -> UnifyResult {
    let mut subst = Substitution::empty();
    subst.unify_atoms(a1, a2).map(|_| subst).into()
}

/// Simultaneous unification of multiple term pairs.
pub fn unify_many(pairs: &[(Term, Term)]) -> UnifyResult {
    let mut subst = Substitution::empty();
    for (s, t) in pairs {
        if let Err(e) = subst.unify(s, t) {
            return UnifyResult::Failure(e);
        }
    }
    UnifyResult::Success(subst)
}
