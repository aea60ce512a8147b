use super::*;

// =============================================================================
// KNOWLEDGE SEMANTICS
// =============================================================================
//
// The index may over-approximate but must never drop a clause whose head
// unifies with the query, and must answer in insertion order.

use crate::knowledge::{Layer, MultipleKnowledge};
use crate::syntax::Predicate;
use crate::unify::unify_atoms;

fn query_atom(source: &str) -> Predicate {
    clause(source).head_predicate().cloned().expect("predicate head")
}

#[test]
fn candidates_include_every_unifiable_head() {
    let kb = knowledge_from(
        "p(a, b). p(X, c). p(f(Y), d). p([1, 2], e). p(a, X). q(a, b). p(g(a), h).",
    );
    for query in ["p(a, Z)", "p(W, c)", "p(f(k), d)", "p([1 | T], e)", "p(g(Q), R)", "p(A, B)"] {
        let atom = query_atom(query);
        let candidates = kb.candidates(&atom);
        for c in kb.clauses() {
            let head = c.head.clone().expect("head");
            let unifies = unify_atoms(&head, &crate::syntax::Atom::Predicate(atom.clone())).is_success();
            if unifies {
                assert!(
                    candidates.contains(&c),
                    "{} missing from candidates of {}",
                    c,
                    query
                );
            }
        }
    }
}

#[test]
fn candidates_keep_insertion_order() {
    let kb = knowledge_from("p(c). p(X). p(a). p(b).");
    let found: Vec<String> = kb
        .candidates(&query_atom("p(a)"))
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(found, vec!["p(X)", "p(a)"]);
}

#[test]
fn removed_clauses_are_never_returned() {
    let mut kb = knowledge_from("p(a). p(b). p(X).");
    assert!(kb.remove(&clause("p(X)")));
    assert!(!kb.remove(&clause("p(X)")));
    let found: Vec<String> = kb
        .candidates(&query_atom("p(Z)"))
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(found, vec!["p(a)", "p(b)"]);
    assert_eq!(answers(&kb, "p(b)"), vec!["{}"]);
}

#[test]
fn alpha_variants_are_distinct_clauses() {
    let mut kb = TreeKnowledge::new();
    assert!(kb.add(clause("p(X)")).unwrap());
    assert!(kb.add(clause("p(Y)")).unwrap());
    assert!(!kb.add(clause("p(X)")).unwrap());
    assert_eq!(kb.len(), 2);
}

#[test]
fn layered_store_answers_from_every_layer() {
    let background = knowledge_from("parent(ann, mary). female(mary).");
    let mut learned = TreeKnowledge::new();
    {
        let mut kb = MultipleKnowledge::new()
            .with_layer(Layer::Borrowed(&mut learned))
            .with_layer(Layer::Shared(&background));
        kb.add(clause("daughter(X, Y) :- parent(Y, X), female(X)."))
            .unwrap();
        assert_eq!(answers(&kb, "daughter(D, ann)"), vec!["{D = mary}"]);
    }
    assert_eq!(learned.len(), 1);
    assert_eq!(answers(&background, "daughter(D, ann)"), Vec::<String>::new());
}
