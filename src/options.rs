//! Solver and learner configuration.

use serde::{Deserialize, Serialize};

use crate::error::{IlpError, Result};

/// Options for querying and induction.
///
/// Set from program headers (`set(c, 3).`), REPL `:set` directives, or
/// passed explicitly to the `*_with` entry points of [`crate::Program`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Bottom-clause expansion rounds.
    pub i: usize,
    /// Maximum body length of a learned clause.
    pub c: usize,
    /// Resolution-step budget of one query.
    pub h: usize,
    /// Maximum number of clauses learned by one induction.
    #[serde(alias = "maxClauses")]
    pub max_clauses: usize,
    /// Cap applied to `*` recall in mode declarations.
    #[serde(alias = "maxRecall")]
    pub max_recall: usize,
    /// Merge learned clauses into the background after induction.
    #[serde(alias = "updateKnowledge")]
    pub update_knowledge: bool,
    /// Record the structured event log.
    pub logging: bool,
    pub verbose: u8,
    /// Rename bottom-clause variables to `A, B, ...`.
    #[serde(alias = "genericVariableNames")]
    pub generic_variable_names: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            i: 2,
            c: 2,
            h: 10000,
            max_clauses: 100,
            max_recall: 100,
            update_knowledge: true,
            logging: false,
            verbose: 0,
            generic_variable_names: true,
        }
    }
}

impl Options {
    /// Set an option from its textual key and value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "i" => self.i = parse_number(key, value)?,
            "c" => self.c = parse_number(key, value)?,
            "h" => self.h = parse_number(key, value)?,
            "max_clauses" | "maxClauses" | "maxclauses" => {
                self.max_clauses = parse_number(key, value)?
            }
            "max_recall" | "maxRecall" => self.max_recall = parse_number(key, value)?,
            "update_knowledge" | "updateKnowledge" => self.update_knowledge = parse_flag(key, value)?,
            "logging" => self.logging = parse_flag(key, value)?,
            "verbose" => self.verbose = parse_number(key, value)?,
            "generic_variable_names" | "genericVariableNames" => {
                self.generic_variable_names = parse_flag(key, value)?
            }
            _ => return Err(IlpError::malformed(format!("unknown option `{}`", key))),
        }
        Ok(())
    }

    /// `(key, value)` pairs in declaration order, as accepted by [`Options::set`].
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("i", self.i.to_string()),
            ("c", self.c.to_string()),
            ("h", self.h.to_string()),
            ("max_clauses", self.max_clauses.to_string()),
            ("max_recall", self.max_recall.to_string()),
            ("update_knowledge", self.update_knowledge.to_string()),
            ("logging", self.logging.to_string()),
            ("verbose", self.verbose.to_string()),
            ("generic_variable_names", self.generic_variable_names.to_string()),
        ]
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| IlpError::malformed(format!("option `{}` expects a number, got `{}`", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(IlpError::malformed(format!(
            "option `{}` expects true or false, got `{}`",
            key, value
        ))),
    }
}
