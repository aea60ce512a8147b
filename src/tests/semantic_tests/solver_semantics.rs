use super::*;

// =============================================================================
// SOLVER SEMANTICS (SLD RESOLUTION WITH NEGATION-AS-FAILURE)
// =============================================================================
//
// Answers come in depth-first, clause-order sequence, are restricted to the
// query's variables, and every query draws on a single step budget.

const FAMILY: &str = "
    parent(ann, mary). parent(ann, tom). parent(tom, eve). parent(tom, lucy).
    female(ann). female(mary). female(eve). female(lucy).
    grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
    mother(X, Y) :- parent(X, Y), female(X).
";

#[test]
fn answers_follow_clause_order_depth_first() {
    let kb = knowledge_from(FAMILY);
    assert_eq!(
        answers(&kb, "grandparent(ann, Z)"),
        vec!["{Z = eve}", "{Z = lucy}"]
    );
    assert_eq!(
        answers(&kb, "parent(P, C)"),
        vec![
            "{C = mary, P = ann}",
            "{C = tom, P = ann}",
            "{C = eve, P = tom}",
            "{C = lucy, P = tom}"
        ]
    );
}

#[test]
fn answers_are_restricted_to_query_variables() {
    let kb = knowledge_from(FAMILY);
    for sigma in Solver::default().query(&parse_query("grandparent(G, eve)").unwrap(), &kb) {
        assert_eq!(sigma.len(), 1);
        assert_eq!(sigma.lookup(&Var::new("G")), Some(&Term::constant("ann")));
    }
}

#[test]
fn negation_as_failure_never_binds() {
    let kb = knowledge_from(FAMILY);
    assert_eq!(answers(&kb, "parent(ann, S), \\+ female(S)"), vec!["{S = tom}"]);
    assert_eq!(answers(&kb, "\\+ parent(eve, X)"), vec!["{}"]);
    assert!(answers(&kb, "\\+ parent(ann, X)").is_empty());
    assert_eq!(answers(&kb, "not(female(tom))"), vec!["{}"]);
}

#[test]
fn arithmetic_is_evaluated_after_binding() {
    let kb = knowledge_from(
        "len([], 0).
         len([_ | T], N) :- len(T, M), N is M + 1.
         big(X) :- X > 10.",
    );
    assert_eq!(answers(&kb, "len([a, b, c], N)"), vec!["{N = 3}"]);
    assert_eq!(answers(&kb, "big(11)"), vec!["{}"]);
    assert!(answers(&kb, "big(3)").is_empty());
    // unbound operand: the comparison fails instead of raising
    assert!(answers(&kb, "big(X)").is_empty());
}

#[test]
fn verification_goal_checks_clause_against_background() {
    let kb = knowledge_from(FAMILY);
    let solver = Solver::default();
    let holds = |c: &str| solver.succeeds_on(&crate::syntax::Goal::verification_of(&clause(c)), &kb);
    assert!(holds("female(X) :- mother(X, Y)."));
    assert!(!holds("female(X) :- parent(X, Y)."));
}

#[test]
fn infinite_derivation_hits_resource_limit() {
    let kb = knowledge_from("loop(X) :- loop(X).");
    let result = Solver::new(50).solve(&parse_query("loop(a)").unwrap(), &kb);
    assert_eq!(result, QueryResult::ResourceLimit);
}

#[test]
fn partial_answers_survive_budget_exhaustion() {
    let kb = knowledge_from("nat(0). nat(s(X)) :- nat(X).");
    // five steps: three facts resolved, two recursive clauses entered
    let result = Solver::new(5).solve(&parse_query("nat(N)").unwrap(), &kb);
    let QueryResult::Answers(found) = result else {
        panic!("expected answers before the budget ran out");
    };
    assert_eq!(found.len(), 3);
    assert_eq!(found[1].to_string(), "{N = s(0)}");
}

#[test]
fn negation_shares_the_query_budget() {
    // the loop under \+ spends the whole budget, so p(b) is never tried
    let kb = knowledge_from("p(a). p(b). q(X) :- q(X).");
    let goal = parse_query("p(X), \\+ q(X)").unwrap();
    let mut solutions = Solver::new(40).query(&goal, &kb);
    let found: Vec<String> = solutions.by_ref().map(|s| s.to_string()).collect();
    assert_eq!(found, vec!["{X = a}"]);
    assert!(solutions.hit_limit());
}

#[test]
fn exhausted_search_is_not_a_limit() {
    let kb = knowledge_from(FAMILY);
    let result = Solver::new(10).solve(&parse_query("parent(eve, X)").unwrap(), &kb);
    assert_eq!(result, QueryResult::NoAnswers);
}

#[test]
fn renamed_clause_variables_never_print_like_query_variables() {
    let kb = knowledge_from("box(a, b, f(Y)).");
    assert_eq!(
        answers(&kb, "box(Y, Y1, Z)"),
        vec!["{Y = a, Y1 = b, Z = f(Y2)}"]
    );
}
