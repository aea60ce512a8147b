//! Parser for Prolog-style program text.

mod ast;
mod lexer;
mod parser;

pub use ast::{Block, Directive, Statement};
pub use parser::{parse_clause, parse_file, parse_query, ParseError};
