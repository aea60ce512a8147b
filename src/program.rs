//! A complete learning problem: background knowledge, modes, examples and options.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{IlpError, Result};
use crate::events::Section;
use crate::knowledge::{Knowledge, Layer, MultipleKnowledge, TreeKnowledge};
use crate::learn::{Examples, Induction, ProgolLearner};
use crate::modes::{ModeCollection, ModeKind};
use crate::options::Options;
use crate::parser::{parse_file, parse_query, Block, Statement};
use crate::solver::{QueryResult, Solver};
use crate::syntax::{Atom, Clause, Goal, Literal, Predicate, Term, Transform, Var};
use crate::unify::Substitution;

/// Background knowledge, mode declarations, examples and options.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub options: Options,
    pub knowledge: TreeKnowledge,
    pub modes: ModeCollection,
    pub examples: Examples,
    /// Event logs of past inductions run with `logging` on, oldest first.
    pub logs: Vec<Section>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Parse a program from text.
    ///
    /// Clauses outside any section, or inside `begin_bg`/`end_bg`, are
    /// background knowledge; `begin_in_pos` and `begin_in_neg` sections hold
    /// examples.
    pub fn from_source(source: &str) -> Result<Program> {
        let mut program = Program::new();
        program.load_source(source)?;
        Ok(program)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Program> {
        let mut program = Program::new();
        program.load_file(path)?;
        Ok(program)
    }

    /// Add every declaration in `source` to this program.
    pub fn load_source(&mut self, source: &str) -> Result<()> {
        let mut block = Block::Background;
        for statement in parse_file(source)? {
            self.declare(statement, &mut block)?;
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let source = read_file(path.as_ref())?;
        self.load_source(&source)
    }

    /// Apply one declaration. `block` tracks the enclosing section.
    ///
    /// Queries and REPL directives are not declarations and are rejected.
    pub fn declare(&mut self, statement: Statement, block: &mut Block) -> Result<()> {
        match statement {
            Statement::Clause(clause) => match block {
                Block::Background => {
                    self.add_clause(clause)?;
                }
                Block::Positive => self.examples.add_positive(clause)?,
                Block::Negative => self.examples.add_negative(clause)?,
            },
            Statement::Mode(mode) => {
                self.modes.add_mode(mode);
            }
            Statement::Determination(determination) => {
                self.modes.add_determination(determination)?
            }
            Statement::Set(key, value) => self.options.set(&key, &value)?,
            Statement::Begin(b) => *block = b,
            Statement::End(_) => *block = Block::Background,
            Statement::Query(goal) => {
                return Err(IlpError::malformed(format!(
                    "query `{}` is not a declaration",
                    goal
                )))
            }
            Statement::Directive(directive) => {
                return Err(IlpError::malformed(format!(
                    "directive {:?} is not a declaration",
                    directive
                )))
            }
        }
        Ok(())
    }

    /// Add a background clause. Returns `false` if it was already present.
    pub fn add_clause(&mut self, clause: Clause) -> Result<bool> {
        self.knowledge.add(clause)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.set(key, value)
    }

    /// Canonical program text; parsing it gives back an equal program.
    pub fn to_source(&self) -> String {
        self.to_string()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_source()).map_err(|source| IlpError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse and run a query against the background knowledge.
    pub fn query(&self, text: &str) -> Result<QueryResult> {
        let goal = parse_query(text)?;
        Ok(self.query_goal(&goal))
    }

    pub fn query_goal(&self, goal: &Goal) -> QueryResult {
        self.query_with(goal, &self.options)
    }

    pub fn query_with(&self, goal: &Goal, options: &Options) -> QueryResult {
        Solver::from_options(options).solve(goal, &self.knowledge)
    }

    /// Whether `clause` holds in the background: no instance of its body
    /// is provable together with the negation of its head.
    pub fn verify(&self, clause: &Clause) -> bool {
        Solver::from_options(&self.options).succeeds_on(&Goal::verification_of(clause), &self.knowledge)
    }

    /// Induce clauses with the program's own options.
    pub fn induce(&mut self) -> Result<Induction> {
        let options = self.options.clone();
        self.induce_with(&options)
    }

    /// Induce clauses for the positive examples.
    ///
    /// With `update_knowledge` the learned clauses are added to the
    /// background; with `logging` the event log is kept in `logs`.
    pub fn induce_with(&mut self, options: &Options) -> Result<Induction> {
        let learner = ProgolLearner::new(options.clone());
        let induction = learner.induce(&self.knowledge, &self.modes, &self.examples)?;
        if options.update_knowledge {
            for clause in &induction.learned {
                self.knowledge.add(clause.clone())?;
            }
        }
        if options.logging {
            self.logs.push(induction.log.clone());
        }
        Ok(induction)
    }

    /// Label every typed instance of the `modeh` atoms in `text` as an example.
    ///
    /// `text` holds generator rules and mode declarations. The modes are
    /// added to the program. Each `+type`, `-type` or `#type` argument of a
    /// head mode ranges over the background facts `type(v)`, and an instance
    /// is positive when it follows from the background plus the generator
    /// rules. The rules themselves are not kept.
    pub fn generate_examples(&mut self, text: &str) -> Result<Examples> {
        let mut rules = TreeKnowledge::new();
        let mut heads = Vec::new();
        for statement in parse_file(text)? {
            match statement {
                Statement::Clause(clause) => {
                    rules.add(clause)?;
                }
                Statement::Mode(mode) => {
                    if mode.kind == ModeKind::Head {
                        heads.push(mode.clone());
                    }
                    self.modes.add_mode(mode);
                }
                Statement::Determination(determination) => {
                    self.modes.add_determination(determination)?
                }
                other => {
                    return Err(IlpError::malformed(format!(
                        "{:?} is not a generator rule or mode",
                        other
                    )))
                }
            }
        }

        let solver = Solver::from_options(&self.options);
        let working = MultipleKnowledge::new()
            .with_layer(Layer::Owned(Box::new(rules)))
            .with_layer(Layer::Shared(&self.knowledge));
        let mut generated = Examples::new();
        for mode in &heads {
            let template = mode.instantiate(&mut Substitution::empty());
            let columns: Vec<(Var, Vec<Term>)> = template
                .slots
                .iter()
                .map(|(var, placeholder)| (var.clone(), self.domain_values(&placeholder.type_name)))
                .collect();
            for sigma in product(&columns) {
                let instance = Atom::Predicate(sigma.apply(&template.atom));
                if solver.succeeds_on(&Goal::atom(instance.clone()), &working) {
                    generated.positive.push(Clause::fact(instance));
                } else {
                    generated.negative.push(Clause::fact(instance));
                }
            }
        }
        debug!(
            modes = heads.len(),
            positive = generated.positive.len(),
            negative = generated.negative.len(),
            "generated examples"
        );
        self.examples.extend(generated.clone());
        Ok(generated)
    }

    /// Label every typed instance of `clause`'s head as an example.
    ///
    /// `domains` maps each head variable name to a unary type predicate;
    /// the type's facts in the background give the variable's values. An
    /// instance whose body succeeds is positive, any other negative. The new
    /// examples are appended to the program's and returned.
    pub fn generate_examples_from_clause(
        &mut self,
        clause: &Clause,
        domains: &BTreeMap<String, String>,
    ) -> Result<Examples> {
        let head = clause
            .head_predicate()
            .ok_or_else(|| IlpError::malformed(format!("clause `{}` has no predicate head", clause)))?;
        let mut columns = Vec::new();
        for var in head.variables() {
            let type_name = domains.get(var.symbol()).ok_or_else(|| {
                IlpError::malformed(format!("no domain given for variable {}", var))
            })?;
            columns.push((var, self.domain_values(type_name)));
        }

        let solver = Solver::from_options(&self.options);
        let mut generated = Examples::new();
        for sigma in product(&columns) {
            let instance = Clause::fact(Atom::Predicate(sigma.apply(head)));
            let body: Vec<Literal> = sigma.apply(&clause.body).into_iter().map(Literal::Atom).collect();
            if solver.succeeds_on(&Goal::new(body), &self.knowledge) {
                generated.positive.push(instance);
            } else {
                generated.negative.push(instance);
            }
        }
        debug!(
            positive = generated.positive.len(),
            negative = generated.negative.len(),
            "generated examples"
        );
        self.examples.extend(generated.clone());
        Ok(generated)
    }

    /// Arguments of the ground facts `type_name(v)`.
    fn domain_values(&self, type_name: &str) -> Vec<Term> {
        let probe = Predicate::new(type_name, vec![Term::var("X")]);
        self.knowledge
            .candidates(&probe)
            .into_iter()
            .filter(|c| c.is_fact())
            .filter_map(|c| c.head_predicate())
            .filter_map(|p| p.args.first())
            .filter(|t| t.is_ground())
            .cloned()
            .collect()
    }
}

/// Every binding of the columns' variables to one of their values, the
/// first column varying slowest.
fn product(columns: &[(Var, Vec<Term>)]) -> Vec<Substitution> {
    let mut rows = vec![Substitution::empty()];
    for (var, values) in columns {
        let mut next = Vec::new();
        for row in &rows {
            for value in values {
                let mut extended = row.clone();
                if extended.bind(var.clone(), value.clone()).is_ok() {
                    next.push(extended);
                }
            }
        }
        rows = next;
    }
    rows
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| IlpError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defaults = Options::default().entries();
        for ((key, value), (_, default)) in self.options.entries().into_iter().zip(defaults) {
            if value != default {
                writeln!(f, "set({}, {}).", key, value)?;
            }
        }
        for mode in self.modes.modes() {
            writeln!(f, "{}.", mode)?;
        }
        for determination in self.modes.determinations() {
            writeln!(f, "{}.", determination)?;
        }
        for clause in self.knowledge.clauses() {
            writeln!(f, "{}.", clause)?;
        }
        for (block, examples) in [
            (Block::Positive, &self.examples.positive),
            (Block::Negative, &self.examples.negative),
        ] {
            if examples.is_empty() {
                continue;
            }
            writeln!(f, ":- {}.", block.begin_marker())?;
            for example in examples {
                writeln!(f, "{}.", example)?;
            }
            writeln!(f, ":- {}.", block.end_marker())?;
        }
        Ok(())
    }
}
