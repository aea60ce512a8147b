//! Semantic tests for the solver and the learner.
//!
//! These check properties a plausible but wrong implementation would break:
//! answer order and restriction, the shared resolution budget, index
//! completeness, bottom-clause linkage and the cover-set loop.
//!
//! # References
//!
//! - [Mug95] Muggleton, S. "Inverse Entailment and Progol." New Generation
//!   Computing 13, 245–286 (1995). https://doi.org/10.1007/BF03037227
//!
//! - [Rob65] Robinson, J.A. "A Machine-Oriented Logic Based on the Resolution
//!   Principle." J. ACM 12(1), 23–41 (1965).
//!   https://doi.org/10.1145/321250.321253
//!
use crate::knowledge::{Knowledge, TreeKnowledge};
use crate::parser::{parse_clause, parse_file, parse_query, Statement};
use crate::solver::{QueryResult, Solver};
use crate::syntax::{Clause, Term, Var};
use crate::unify::Substitution;

/// Helper to build a store from program text holding only clauses.
fn knowledge_from(source: &str) -> TreeKnowledge {
    let clauses = parse_file(source)
        .expect("program should parse")
        .into_iter()
        .map(|s| match s {
            Statement::Clause(c) => c,
            other => panic!("expected a clause, got {:?}", other),
        });
    TreeKnowledge::from_clauses(clauses).expect("clauses should be stored")
}

/// Helper to render every answer of a query.
fn answers(knowledge: &dyn Knowledge, query: &str) -> Vec<String> {
    let goal = parse_query(query).expect("query should parse");
    Solver::default()
        .query(&goal, knowledge)
        .map(|s| s.to_string())
        .collect()
}

fn clause(source: &str) -> Clause {
    parse_clause(source).expect("clause should parse")
}

mod bottom_semantics;
mod knowledge_semantics;
mod proptests;
mod search_semantics;
mod solver_semantics;
mod unification_semantics;
