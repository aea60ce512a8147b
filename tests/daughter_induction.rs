//! End-to-end induction through the public [`Program`] API.

use std::collections::BTreeMap;

use ilplog::parser::parse_clause;
use ilplog::{Options, Program, QueryResult};

const FAMILY: &str = "
% daughter/2 from parent/2 and female/1
modeh(*, daughter(+person, -person)).
modeb(*, parent(+person, -person)).
modeb(*, parent(-person, +person)).
modeb(*, female(+person)).

parent(ann, mary). parent(ann, tom). parent(tom, eve). parent(tom, lucy).
female(ann). female(mary). female(eve). female(lucy).

:- begin_in_pos.
daughter(mary, ann).
daughter(eve, tom).
daughter(lucy, tom).
:- end_in_pos.

:- begin_in_neg.
daughter(tom, ann).
daughter(tom, eve).
:- end_in_neg.
";

#[test]
fn learns_daughter_and_answers_with_it() {
    let mut program = Program::from_source(FAMILY).unwrap();
    let induction = program.induce().unwrap();
    assert_eq!(induction.learned.len(), 1);
    assert_eq!(
        induction.learned[0].to_string(),
        "daughter(A,B) :- parent(B,A), female(A)"
    );

    let result = program.query("daughter(X, tom)").unwrap();
    let answers: Vec<String> = result.answers().iter().map(|s| s.to_string()).collect();
    assert_eq!(answers, vec!["{X = eve}", "{X = lucy}"]);
    assert_eq!(program.query("daughter(tom, ann)").unwrap(), QueryResult::NoAnswers);
}

#[test]
fn determination_restricts_body_predicates() {
    let source = format!("{}\ndetermination(daughter/2, female/1).\n", FAMILY);
    let mut program = Program::from_source(&source).unwrap();
    let induction = program.induce().unwrap();
    // female(A) never produces the head output B
    assert!(induction.learned.is_empty());
    assert_eq!(induction.uncovered.len(), 3);
}

#[test]
fn induction_log_is_kept_when_logging() {
    let mut program = Program::from_source(FAMILY).unwrap();
    program.set("logging", "true").unwrap();
    program.induce().unwrap();
    assert_eq!(program.logs.len(), 1);
    let log = &program.logs[0];
    let json = log.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "Induction");
    let rendered = log.to_string();
    assert!(rendered.contains("Current example"));
    assert!(rendered.contains("daughter(mary,ann)"));
}

#[test]
fn save_and_reload_preserves_the_problem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.pl");
    let mut program = Program::from_source(FAMILY).unwrap();
    program.set("i", "3").unwrap();
    program.save(&path).unwrap();

    let mut reloaded = Program::from_file(&path).unwrap();
    assert_eq!(reloaded.options.i, 3);
    assert_eq!(reloaded.examples, program.examples);
    assert_eq!(reloaded.modes, program.modes);
    let learned: Vec<String> = reloaded
        .induce()
        .unwrap()
        .learned
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(learned, vec!["daughter(A,B) :- parent(B,A), female(A)"]);
}

#[test]
fn generated_examples_drive_induction() {
    let mut program = Program::from_source(
        "modeh(*, mother(+person, +person)).
         modeb(*, parent(+person, +person)).
         modeb(*, female(+person)).
         parent(ann, mary). parent(ann, tom). parent(tom, eve).
         female(ann). female(mary). female(eve).
         person(ann). person(mary). person(tom). person(eve).",
    )
    .unwrap();
    let target = parse_clause("mother(X, Y) :- parent(X, Y), female(X).").unwrap();
    let domains: BTreeMap<String, String> = [("X", "person"), ("Y", "person")]
        .into_iter()
        .map(|(v, t)| (v.to_string(), t.to_string()))
        .collect();
    let generated = program.generate_examples_from_clause(&target, &domains).unwrap();
    assert_eq!(generated.positive.len(), 2);
    assert_eq!(generated.negative.len(), 14);

    let learned: Vec<String> = program
        .induce_with(&Options::default())
        .unwrap()
        .learned
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(learned, vec!["mother(A,B) :- parent(A,B), female(A)"]);
}

#[test]
fn generator_rules_label_typed_head_instances() {
    let mut program = Program::from_source(
        "modeb(*, parent(+person, +person)).
         modeb(*, female(+person)).
         parent(ann, mary). parent(ann, tom). parent(tom, eve).
         female(ann). female(mary). female(eve).
         person(ann). person(mary). person(tom). person(eve).",
    )
    .unwrap();
    let generated = program
        .generate_examples(
            "modeh(*, mother(+person, +person)).
             mother(X, Y) :- parent(X, Y), female(X).",
        )
        .unwrap();
    let positive: Vec<String> = generated.positive.iter().map(|c| c.to_string()).collect();
    assert_eq!(positive, vec!["mother(ann,mary)", "mother(ann,tom)"]);
    assert_eq!(generated.negative.len(), 14);
    assert_eq!(program.examples, generated);
    // the generator rule labels examples but is not background
    assert_eq!(program.query("mother(ann, X)").unwrap(), QueryResult::NoAnswers);

    let learned: Vec<String> = program
        .induce()
        .unwrap()
        .learned
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(learned, vec!["mother(A,B) :- parent(A,B), female(A)"]);
}

#[test]
fn generator_text_takes_no_queries() {
    let mut program = Program::from_source("person(ann).").unwrap();
    assert!(program.generate_examples("?- person(X).").is_err());
    assert!(program.examples.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Program::from_file("/nonexistent/problem.pl").unwrap_err();
    assert!(matches!(err, ilplog::IlpError::Io { .. }));
}
