use super::*;

// =============================================================================
// SEARCH AND COVER-SET SEMANTICS
// =============================================================================
//
// Learned clauses are consistent with the negatives, every positive ends up
// covered or reported, and the clause budget bounds the number of
// iterations [Mug95].

use crate::knowledge::{Layer, MultipleKnowledge};
use crate::learn::{Induction, ProgolLearner};
use crate::options::Options;
use crate::program::Program;
use crate::syntax::Goal;

const PETS: &str = "
    modeh(*, pet(+animal)).
    modeb(1, cat(+animal)).
    modeb(1, dog(+animal)).
    modeb(1, fish(+animal)).
    cat(felix). cat(tom). dog(rex). dog(fido). fish(nemo).
    :- begin_in_pos.
    pet(felix). pet(rex). pet(tom). pet(fido).
    :- end_in_pos.
    :- begin_in_neg.
    pet(nemo).
    :- end_in_neg.
";

fn induce(program: &Program, options: Options) -> Induction {
    ProgolLearner::new(options)
        .induce(&program.knowledge, &program.modes, &program.examples)
        .expect("induction")
}

fn proves(background: &TreeKnowledge, learned: &[Clause], example: &Clause) -> bool {
    let hypothesis = TreeKnowledge::from_clauses(learned.iter().cloned()).unwrap();
    let kb = MultipleKnowledge::new()
        .with_layer(Layer::Owned(Box::new(hypothesis)))
        .with_layer(Layer::Shared(background));
    let goal = Goal::atom(example.head.clone().expect("example head"));
    Solver::default().succeeds_on(&goal, &kb)
}

#[test]
fn disjunctive_concept_needs_one_clause_per_case() {
    let program = Program::from_source(PETS).unwrap();
    let induction = induce(&program, Options::default());
    let learned: Vec<String> = induction.learned.iter().map(|c| c.to_string()).collect();
    assert_eq!(learned, vec!["pet(A) :- cat(A)", "pet(A) :- dog(A)"]);
    assert!(induction.uncovered.is_empty());
}

#[test]
fn learned_clauses_cover_no_negative() {
    let program = Program::from_source(PETS).unwrap();
    let induction = induce(&program, Options::default());
    for negative in &program.examples.negative {
        assert!(!proves(&program.knowledge, &induction.learned, negative));
    }
}

#[test]
fn every_positive_is_covered_or_reported() {
    let mut program = Program::from_source(PETS).unwrap();
    program.examples.add_positive(clause("pet(goldie).")).unwrap();
    program.add_clause(clause("fish(goldie).")).unwrap();
    let induction = induce(&program, Options::default());
    for positive in &program.examples.positive {
        let covered = proves(&program.knowledge, &induction.learned, positive);
        let reported = induction.uncovered.contains(positive);
        assert!(covered != reported, "{} covered={} reported={}", positive, covered, reported);
    }
    assert_eq!(induction.uncovered, vec![clause("pet(goldie).")]);
}

#[test]
fn clause_budget_bounds_iterations() {
    let program = Program::from_source(PETS).unwrap();
    let options = Options {
        max_clauses: 1,
        ..Options::default()
    };
    let induction = induce(&program, options);
    assert_eq!(induction.learned.len(), 1);
    let uncovered: Vec<String> = induction.uncovered.iter().map(|c| c.to_string()).collect();
    assert_eq!(uncovered, vec!["pet(rex)", "pet(fido)"]);
}

#[test]
fn body_limit_zero_learns_nothing_with_negatives() {
    let program = Program::from_source(PETS).unwrap();
    let options = Options {
        c: 0,
        ..Options::default()
    };
    let induction = induce(&program, options);
    assert!(induction.learned.is_empty());
    assert_eq!(induction.uncovered.len(), 4);
}

#[test]
fn log_records_one_section_per_seed() {
    let program = Program::from_source(PETS).unwrap();
    let options = Options {
        logging: true,
        ..Options::default()
    };
    let log = induce(&program, options).log;
    assert_eq!(
        log.names(),
        vec!["Knowledge", "Modes", "Options", "Iterations", "Learned knowledge"]
    );
    let iterations = log.child("Iterations").unwrap();
    let seeds: Vec<&str> = iterations.children().map(|s| s.name.as_str()).collect();
    assert_eq!(seeds, vec!["pet(felix)", "pet(rex)"]);
    let first = iterations.child("pet(felix)").unwrap();
    assert_eq!(
        first.entries("Bottom clause").collect::<Vec<_>>(),
        vec!["pet(A) :- cat(A)"]
    );
    assert_eq!(first.entries("Clause").collect::<Vec<_>>(), vec!["pet(A) :- cat(A)"]);
    assert!(first.child("States").unwrap().entries("Candidate").count() >= 2);
}

#[test]
fn disabled_log_stays_empty() {
    let program = Program::from_source(PETS).unwrap();
    assert!(induce(&program, Options::default()).log.is_empty());
}
