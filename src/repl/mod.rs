//! Interactive read-eval-print loop.

mod repl;

pub use repl::Repl;
