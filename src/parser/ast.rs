//! AST types for program text and REPL input.

use crate::modes::{Determination, Mode};
use crate::syntax::{Clause, Goal};

/// A statement in a program file or REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A clause; where it goes depends on the enclosing [`Block`].
    Clause(Clause),
    /// `?- goal.`
    Query(Goal),
    Mode(Mode),
    Determination(Determination),
    /// `set(key, value).`
    Set(String, String),
    /// `:- begin_bg.`, `:- begin_in_pos.`, `:- begin_in_neg.`
    Begin(Block),
    /// `:- end_bg.`, `:- end_in_pos.`, `:- end_in_neg.`
    End(Block),
    /// A REPL directive.
    Directive(Directive),
}

/// Section of a program file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Block {
    #[default]
    Background,
    Positive,
    Negative,
}

impl Block {
    pub(crate) fn from_marker(name: &str) -> Option<(bool, Block)> {
        match name {
            "begin_bg" => Some((true, Block::Background)),
            "end_bg" => Some((false, Block::Background)),
            "begin_in_pos" => Some((true, Block::Positive)),
            "end_in_pos" => Some((false, Block::Positive)),
            "begin_in_neg" => Some((true, Block::Negative)),
            "end_in_neg" => Some((false, Block::Negative)),
            _ => None,
        }
    }

    pub fn begin_marker(self) -> &'static str {
        match self {
            Block::Background => "begin_bg",
            Block::Positive => "begin_in_pos",
            Block::Negative => "begin_in_neg",
        }
    }

    pub fn end_marker(self) -> &'static str {
        match self {
            Block::Background => "end_bg",
            Block::Positive => "end_in_pos",
            Block::Negative => "end_in_neg",
        }
    }
}

/// A REPL directive, written `:name args`.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Load a program file
    Load(String),
    /// Save the program
    Save(String),
    /// Set an option
    Set(String, String),
    Induce,
    /// Add a positive example
    Pos(Clause),
    /// Add a negative example
    Neg(Clause),
    /// Check a clause against the background
    Verify(Clause),
    /// Print the program
    Show,
    /// Print the event log of the last induction
    Log,
    /// Next answer of the last query
    Next,
    Quit,
}
