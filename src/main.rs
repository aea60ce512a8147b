//! ilplog CLI: load a program, induce clauses, or explore it interactively.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ilplog::repl::Repl;
use ilplog::Program;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[clap(
    name = "ilplog",
    about = "Inductive logic programming with mode-directed inverse entailment",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    /// Program file to load
    #[clap(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Induce clauses for the file's examples, print them and exit
    #[clap(long, requires = "file")]
    induce: bool,

    /// Log learner progress; RUST_LOG overrides the level
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG=ilplog::learn=trace ilplog family.pl --induce
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if args.induce {
        let Some(path) = &args.file else {
            return ExitCode::FAILURE;
        };
        return match induce(path, args.verbose) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("ilplog - inductive logic programming");
    println!("Type :help for help, :quit to exit.\n");
    let mut repl = Repl::new();
    if let Some(path) = &args.file {
        match repl.load_file(&path.to_string_lossy()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    if let Err(e) = repl.run() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn induce(path: &PathBuf, verbose: bool) -> ilplog::Result<()> {
    let mut program = Program::from_file(path)?;
    if verbose {
        program.options.verbose = program.options.verbose.max(1);
    }
    let induction = program.induce()?;
    for clause in &induction.learned {
        println!("{}.", clause);
    }
    for example in &induction.uncovered {
        println!("% uncovered: {}.", example);
    }
    Ok(())
}
