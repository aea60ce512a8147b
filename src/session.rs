//! Session: end-to-end API for loading programs, answering queries and inducing clauses.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::knowledge::Knowledge;
use crate::parser::{parse_file, Block, Directive, Statement};
use crate::program::Program;
use crate::solver::QueryResult;
use crate::syntax::{Clause, Goal};
use crate::unify::Substitution;

/// Result of executing a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecResult {
    /// A clause, mode, determination, option or section marker was applied.
    Declared,
    Answer(Answer),
    Loaded { path: String, clauses: usize },
    Saved { path: String },
    OptionSet { key: String, value: String },
    Induced(Vec<Clause>),
    Verified(bool),
    /// Program text, for `:show`.
    Program(String),
    /// Event log of the last induction, if one was recorded.
    Log(Option<String>),
    Quit,
}

/// One step through the answers of the active query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Solution(Substitution),
    /// No (further) answers.
    Exhausted,
    ResourceLimit,
}

/// A session holds the program, the current file section and the answers
/// of the last query not yet shown.
#[derive(Debug, Default)]
pub struct Session {
    program: Program,
    block: Block,
    pending: VecDeque<Substitution>,
    limited: bool,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn with_program(program: Program) -> Self {
        Session {
            program,
            ..Session::default()
        }
    }

    /// Parse and execute every statement in `source`.
    pub fn execute_source(&mut self, source: &str) -> Result<Vec<ExecResult>> {
        let statements = parse_file(source)?;
        statements
            .into_iter()
            .map(|statement| self.execute_statement(statement))
            .collect()
    }

    /// Execute a parsed statement.
    pub fn execute_statement(&mut self, statement: Statement) -> Result<ExecResult> {
        match statement {
            Statement::Query(goal) => Ok(ExecResult::Answer(self.execute_query(&goal))),
            Statement::Directive(directive) => self.apply_directive(directive),
            Statement::Set(key, value) => self.set_option(&key, &value),
            declaration => {
                self.program.declare(declaration, &mut self.block)?;
                Ok(ExecResult::Declared)
            }
        }
    }

    /// Run `goal` to exhaustion and return its first answer; later answers
    /// are returned by `:next`.
    pub fn execute_query(&mut self, goal: &Goal) -> Answer {
        let result = self.program.query_goal(goal);
        debug!(goal = %goal, ?result, "query");
        self.limited = result == QueryResult::ResourceLimit;
        self.pending = result.answers().iter().cloned().collect();
        self.next_answer()
    }

    pub fn next_answer(&mut self) -> Answer {
        match self.pending.pop_front() {
            Some(sigma) => Answer::Solution(sigma),
            None if self.limited => Answer::ResourceLimit,
            None => Answer::Exhausted,
        }
    }

    /// Add every declaration in the file to the program.
    pub fn load_file(&mut self, path: &str) -> Result<ExecResult> {
        let before = self.program.knowledge.len();
        self.program.load_file(path)?;
        let clauses = self.program.knowledge.len() - before;
        Ok(ExecResult::Loaded {
            path: path.to_string(),
            clauses,
        })
    }

    pub fn apply_directive(&mut self, directive: Directive) -> Result<ExecResult> {
        match directive {
            Directive::Load(path) => self.load_file(&path),
            Directive::Save(path) => {
                self.program.save(&path)?;
                Ok(ExecResult::Saved { path })
            }
            Directive::Set(key, value) => self.set_option(&key, &value),
            Directive::Induce => self.induce(),
            Directive::Pos(clause) => {
                self.program.examples.add_positive(clause)?;
                Ok(ExecResult::Declared)
            }
            Directive::Neg(clause) => {
                self.program.examples.add_negative(clause)?;
                Ok(ExecResult::Declared)
            }
            Directive::Verify(clause) => Ok(ExecResult::Verified(self.program.verify(&clause))),
            Directive::Show => Ok(ExecResult::Program(self.program.to_source())),
            Directive::Log => Ok(ExecResult::Log(
                self.program.logs.last().map(|log| log.to_string()),
            )),
            Directive::Next => Ok(ExecResult::Answer(self.next_answer())),
            Directive::Quit => Ok(ExecResult::Quit),
        }
    }

    pub fn set_option(&mut self, key: &str, value: &str) -> Result<ExecResult> {
        self.program.set(key, value)?;
        Ok(ExecResult::OptionSet {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Induce with the program's options. The event log is always kept so
    /// `:log` can show it.
    pub fn induce(&mut self) -> Result<ExecResult> {
        let mut options = self.program.options.clone();
        options.logging = true;
        let induction = self.program.induce_with(&options)?;
        Ok(ExecResult::Induced(induction.learned))
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Solution(sigma) if sigma.is_empty() => write!(f, "true."),
            Answer::Solution(sigma) => {
                let bindings: Vec<String> = sigma
                    .bindings()
                    .map(|(v, t)| format!("{} = {}", v, t))
                    .collect();
                write!(f, "{}", bindings.join(", "))
            }
            Answer::Exhausted => write!(f, "false."),
            Answer::ResourceLimit => write!(f, "resource limit reached."),
        }
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecResult::Declared => write!(f, "ok."),
            ExecResult::Answer(answer) => write!(f, "{}", answer),
            ExecResult::Loaded { path, clauses } => {
                write!(f, "loaded {} ({} clauses).", path, clauses)
            }
            ExecResult::Saved { path } => write!(f, "saved {}.", path),
            ExecResult::OptionSet { key, value } => write!(f, "{} = {}.", key, value),
            ExecResult::Induced(clauses) if clauses.is_empty() => write!(f, "no clauses learned."),
            ExecResult::Induced(clauses) => {
                let lines: Vec<String> = clauses.iter().map(|c| format!("{}.", c)).collect();
                write!(f, "{}", lines.join("\n"))
            }
            ExecResult::Verified(holds) => write!(f, "{}.", holds),
            ExecResult::Program(text) => write!(f, "{}", text.trim_end()),
            ExecResult::Log(Some(text)) => write!(f, "{}", text.trim_end()),
            ExecResult::Log(None) => write!(f, "no induction log recorded."),
            ExecResult::Quit => write!(f, "bye."),
        }
    }
}
