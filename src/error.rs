//! Library error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;
use crate::syntax::Signature;

/// Errors surfaced to callers of the store, the mode table and the learner.
///
/// Unification failures, empty matches and false comparisons are not errors;
/// the solver turns them into backtracking.
#[derive(Debug, Error)]
pub enum IlpError {
    #[error("no {kind} declaration matches {signature}")]
    UnknownMode {
        kind: &'static str,
        signature: Signature,
    },
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("knowledge layer is read-only")]
    ReadOnlyKnowledge,
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IlpError {
    pub fn malformed(message: impl Into<String>) -> Self {
        IlpError::MalformedInput(message.into())
    }
}

pub type Result<T, E = IlpError> = std::result::Result<T, E>;
