use super::*;
use proptest::prelude::*;

use crate::options::Options;
use crate::syntax::{Atom, Predicate, Transform};
use crate::unify::{generic_variable_names, unify, UnifyResult};

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
//
// Names are drawn from prefixes no keyword or builtin starts with.

fn arb_var() -> impl Strategy<Value = Var> {
    "[A-Z][a-z0-9]{0,3}".prop_map(Var::new)
}

fn arb_constant() -> impl Strategy<Value = Term> {
    prop_oneof![
        "k[a-z0-9]{0,3}".prop_map(Term::constant),
        (0i64..1000).prop_map(Term::int),
    ]
}

fn arb_ground_term(depth: u32) -> impl Strategy<Value = Term> {
    if depth == 0 {
        arb_constant().boxed()
    } else {
        prop_oneof![
            arb_constant(),
            ("g[a-z]{0,3}", prop::collection::vec(arb_ground_term(depth - 1), 1..=3))
                .prop_map(|(name, args)| Term::app(name, args)),
        ]
        .boxed()
    }
}

fn arb_term(depth: u32) -> impl Strategy<Value = Term> {
    if depth == 0 {
        prop_oneof![arb_var().prop_map(Term::Var), arb_constant()].boxed()
    } else {
        prop_oneof![
            arb_var().prop_map(Term::Var),
            arb_constant(),
            ("g[a-z]{0,3}", prop::collection::vec(arb_term(depth - 1), 1..=3))
                .prop_map(|(name, args)| Term::app(name, args)),
            prop::collection::vec(arb_term(depth - 1), 1..=3)
                .prop_map(|items| Term::list(items, None)),
        ]
        .boxed()
    }
}

fn arb_predicate(depth: u32) -> impl Strategy<Value = Predicate> {
    ("q[a-z]{0,2}", prop::collection::vec(arb_term(depth), 1..=3))
        .prop_map(|(name, args)| Predicate::new(name, args))
}

fn arb_clause(depth: u32) -> impl Strategy<Value = Clause> {
    (arb_predicate(depth), prop::collection::vec(arb_predicate(depth), 0..=3)).prop_map(
        |(head, body)| {
            Clause::new(
                Atom::Predicate(head),
                body.into_iter().map(Atom::Predicate).collect(),
            )
        },
    )
}

fn arb_fact() -> impl Strategy<Value = Clause> {
    prop::collection::vec(arb_ground_term(1), 2)
        .prop_map(|args| Clause::fact(Atom::predicate("rel", args)))
}

// -------------------------------------------------------------------------
//  An MGU makes both sides identical
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn mgu_unifies(t1 in arb_term(2), t2 in arb_term(2)) {
        if let UnifyResult::Success(sigma) = unify(&t1, &t2) {
            prop_assert_eq!(sigma.apply(&t1), sigma.apply(&t2));
        }
    }
}

// -------------------------------------------------------------------------
//  Unification is symmetric
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn unification_is_symmetric(t1 in arb_term(2), t2 in arb_term(2)) {
        prop_assert_eq!(unify(&t1, &t2).is_success(), unify(&t2, &t1).is_success());
    }
}

// -------------------------------------------------------------------------
//  Ground terms unify iff equal
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn ground_unification_iff_equal(t1 in arb_ground_term(2), t2 in arb_ground_term(2)) {
        prop_assert_eq!(unify(&t1, &t2).is_success(), t1 == t2);
    }
}

// -------------------------------------------------------------------------
//  Printed clauses parse back to themselves
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn clause_text_round_trips(c in arb_clause(2)) {
        let text = format!("{}.", c);
        let parsed = parse_clause(&text);
        prop_assert!(parsed.is_ok(), "failed to parse {}", text);
        prop_assert_eq!(parsed.unwrap(), c);
    }
}

// -------------------------------------------------------------------------
//  Generic renaming is idempotent and keeps the variable count
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn generic_names_are_canonical(c in arb_clause(2)) {
        let renamed = generic_variable_names(&c);
        prop_assert_eq!(generic_variable_names(&renamed), renamed.clone());
        prop_assert_eq!(renamed.variables().len(), c.variables().len());
    }
}

// -------------------------------------------------------------------------
//  The index never drops a unifiable head
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn index_is_complete(
        facts in prop::collection::vec(arb_fact(), 0..12),
        args in prop::collection::vec(arb_term(1), 2),
    ) {
        let kb = TreeKnowledge::from_clauses(facts).unwrap();
        let query = Predicate::new("rel", args);
        let candidates = kb.candidates(&query);
        for c in kb.clauses() {
            let head = c.head.clone().unwrap();
            let query_atom = Atom::Predicate(query.clone());
            if crate::unify::unify_atoms(&head, &query_atom).is_success() {
                prop_assert!(candidates.contains(&c), "{} missing for {}", c, query);
            }
        }
    }
}

// -------------------------------------------------------------------------
//  Every answer instantiates the query to a stored fact
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn answers_are_stored_instances(
        facts in prop::collection::vec(arb_fact(), 0..12),
        first in arb_ground_term(1),
    ) {
        let kb = TreeKnowledge::from_clauses(facts).unwrap();
        let query = Predicate::new("rel", vec![first, Term::var("Y")]);
        let goal = crate::syntax::Goal::atom(Atom::Predicate(query.clone()));
        let expected = kb.candidates(&query).into_iter()
            .filter(|c| crate::unify::unify_atoms(c.head.as_ref().unwrap(), &Atom::Predicate(query.clone())).is_success())
            .count();
        let found: Vec<Substitution> = Solver::default().query(&goal, &kb).collect();
        prop_assert_eq!(found.len(), expected);
        for sigma in found {
            let instance = Clause::fact(Atom::Predicate(sigma.apply(&query)));
            prop_assert!(kb.contains(&instance), "{} is not stored", instance);
        }
    }
}

// -------------------------------------------------------------------------
//  Options survive a trip through their textual entries
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn option_entries_round_trip(
        i in 0usize..10, c in 0usize..10, h in 1usize..100000,
        max_clauses in 1usize..500, update in any::<bool>(), logging in any::<bool>(),
    ) {
        let options = Options { i, c, h, max_clauses, update_knowledge: update, logging, ..Options::default() };
        let mut parsed = Options::default();
        for (key, value) in options.entries() {
            prop_assert!(parsed.set(key, &value).is_ok());
        }
        prop_assert_eq!(parsed, options);
    }
}
