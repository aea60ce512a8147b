use super::*;

// =============================================================================
// BOTTOM CLAUSE SEMANTICS
// =============================================================================
//
// The bottom clause is the most specific clause within the mode language
// that, with the background, entails its example [Mug95].

use crate::knowledge::{Layer, MultipleKnowledge};
use crate::learn::{build_bottom_clause, BottomClause};
use crate::options::Options;
use crate::program::Program;
use crate::syntax::{Goal, Transform};

const TRAINS: &str = "
    modeh(1, eastbound(+train)).
    modeb(*, has_car(+train, -car)).
    modeb(1, short(+car)).
    modeb(1, colour(+car, #colour)).
    has_car(t1, c1). has_car(t1, c2). has_car(t1, c3).
    short(c1). short(c3).
    colour(c1, red). colour(c2, blue).
";

fn bottom_of(program: &Program, example: &str, options: &Options) -> BottomClause {
    build_bottom_clause(&clause(example), &program.modes, &program.knowledge, options)
        .expect("bottom clause")
}

#[test]
fn every_input_is_linked_to_the_head() {
    let program = Program::from_source(TRAINS).unwrap();
    let bottom = bottom_of(&program, "eastbound(t1)", &Options::default());
    assert!(!bottom.is_empty());
    for k in 0..bottom.len() {
        let link = bottom.link(k).expect("link per atom");
        for input in &link.inputs {
            assert!(
                bottom.depth(input).is_some(),
                "input {} of {} is not reachable from the head",
                input,
                bottom.body()[k]
            );
        }
    }
}

#[test]
fn bottom_clause_entails_its_example() {
    let program = Program::from_source(TRAINS).unwrap();
    let bottom = bottom_of(&program, "eastbound(t1)", &Options::default());
    let mut hypothesis = TreeKnowledge::new();
    hypothesis.add(bottom.clause().clone()).unwrap();
    let kb = MultipleKnowledge::new()
        .with_layer(Layer::Owned(Box::new(hypothesis)))
        .with_layer(Layer::Shared(&program.knowledge));
    let goal = Goal::atom(clause("eastbound(t1)").head.unwrap());
    assert!(Solver::default().succeeds_on(&goal, &kb));
}

#[test]
fn constants_placeholders_keep_values() {
    let program = Program::from_source(TRAINS).unwrap();
    let bottom = bottom_of(&program, "eastbound(t1)", &Options::default());
    let rendered: Vec<String> = bottom.body().iter().map(|a| a.to_string()).collect();
    assert!(rendered.contains(&"colour(B,red)".to_string()), "{:?}", rendered);
    assert!(rendered.contains(&"colour(C,blue)".to_string()), "{:?}", rendered);
}

#[test]
fn recall_bounds_answers_per_input() {
    let mut program = Program::from_source(TRAINS).unwrap();
    program.set("max_recall", "2").unwrap();
    let options = program.options.clone();
    let bottom = bottom_of(&program, "eastbound(t1)", &options);
    let cars = bottom
        .body()
        .iter()
        .filter(|a| a.to_string().starts_with("has_car"))
        .count();
    assert_eq!(cars, 2);
}

#[test]
fn zero_rounds_give_an_empty_body() {
    let program = Program::from_source(TRAINS).unwrap();
    let options = Options {
        i: 0,
        ..Options::default()
    };
    let bottom = bottom_of(&program, "eastbound(t1)", &options);
    assert!(bottom.is_empty());
    assert_eq!(bottom.to_string(), "eastbound(A)");
}

#[test]
fn body_atoms_are_distinct() {
    let program = Program::from_source(TRAINS).unwrap();
    let options = Options {
        i: 4,
        ..Options::default()
    };
    let bottom = bottom_of(&program, "eastbound(t1)", &options);
    for (k, atom) in bottom.body().iter().enumerate() {
        assert!(!bottom.body()[..k].contains(atom), "{} repeated", atom);
    }
}

#[test]
fn variables_depth_grows_along_chains() {
    let program = Program::from_source(
        "modeh(1, reach(+node, -node)).
         modeb(*, edge(+node, -node)).
         edge(a, b). edge(b, c). edge(c, d).",
    )
    .unwrap();
    let options = Options {
        i: 3,
        ..Options::default()
    };
    let bottom = bottom_of(&program, "reach(a, d)", &options);
    assert_eq!(bottom.to_string(), "reach(A,B) :- edge(A,C), edge(C,D), edge(D,B)");
    let depth = |name: &str| bottom.depth(&Var::new(name));
    assert_eq!(depth("A"), Some(0));
    assert_eq!(depth("C"), Some(1));
    assert_eq!(depth("D"), Some(2));
    assert_eq!(depth("B"), Some(3));
    // head output B is produced only by the last edge
    assert_eq!(bottom.remaining_depth(&[0]), 3);
    assert_eq!(bottom.remaining_depth(&[0, 1, 2]), 0);
    assert!(bottom.clause().variables().len() == 4);
}

#[test]
fn bottom_clause_is_deterministic() {
    let program = Program::from_source(TRAINS).unwrap();
    for generic in [true, false] {
        let options = Options {
            generic_variable_names: generic,
            ..Options::default()
        };
        let first = bottom_of(&program, "eastbound(t1)", &options);
        let second = bottom_of(&program, "eastbound(t1)", &options);
        assert_eq!(first.clause(), second.clause());
        assert_eq!(first.clause().to_string(), second.clause().to_string());
        for v in first.clause().variables() {
            assert_eq!(first.depth(&v), second.depth(&v), "depth of {}", v);
        }
        assert_eq!(first, second);
    }
}
