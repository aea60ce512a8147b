//! REPL implementation.

use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::parser::parse_file;
use crate::session::{ExecResult, Session};

const HELP: &str = "\
Statements:
  fact(a).  head(X) :- body(X).     add a background clause
  modeh(*, p(+t, -t)).  modeb(...). declare modes
  ?- goal.                          run a query
Directives:
  :load FILE  :save FILE            read or write a program
  :set KEY VALUE                    set an option (i, c, h, max_clauses, ...)
  :pos EXAMPLE  :neg EXAMPLE        add an example
  :induce                           learn clauses for the examples
  :verify CLAUSE                    check a clause against the background
  :next                             next answer of the last query
  :show  :log  :help  :quit";

/// Interactive REPL over a [`Session`].
#[derive(Debug, Default)]
pub struct Repl {
    session: Session,
    finished: bool,
}

impl Repl {
    pub fn new() -> Self {
        Repl::default()
    }

    pub fn with_session(session: Session) -> Self {
        Repl {
            session,
            finished: false,
        }
    }

    /// Load a program file into the session.
    pub fn load_file(&mut self, path: &str) -> Result<String> {
        self.session.load_file(path).map(|r| r.to_string())
    }

    /// Process a line of input and return the text to print.
    pub fn process_line(&mut self, line: &str) -> Result<String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(String::new());
        }
        if line == ":help" {
            return Ok(HELP.to_string());
        }
        let mut output = Vec::new();
        for statement in parse_file(line)? {
            let result = self.session.execute_statement(statement)?;
            if result == ExecResult::Quit {
                self.finished = true;
            }
            output.push(result.to_string());
        }
        Ok(output.join("\n"))
    }

    /// Whether `:quit` has been entered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run the REPL on standard input until `:quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut lines = stdin.lock().lines();
        while !self.finished {
            write!(stdout, "| ")?;
            stdout.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            match self.process_line(&line?) {
                Ok(text) if text.is_empty() => {}
                Ok(text) => writeln!(stdout, "{}", text)?,
                Err(e) => writeln!(stdout, "Error: {}", e)?,
            }
        }
        Ok(())
    }
}
