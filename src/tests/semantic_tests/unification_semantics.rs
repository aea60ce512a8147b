use super::*;

// =============================================================================
// UNIFICATION SEMANTICS
// =============================================================================
//
// The MGU must make both sides equal, stay compressed, and leave the
// substitution untouched on failure [Rob65].

use crate::unify::{unify, unify_many, UnifyError, UnifyResult};

fn t(source: &str) -> Term {
    let clause = parse_clause(&format!("wrap({})", source)).expect("term should parse");
    clause
        .head_predicate()
        .and_then(|p| p.args.first().cloned())
        .expect("wrapped term")
}

#[test]
fn mgu_equalizes_both_sides() {
    let (a, b) = (t("f(X, g(Y), Z)"), t("f(h(W), g(a), W)"));
    let UnifyResult::Success(sigma) = unify(&a, &b) else {
        panic!("expected terms to unify");
    };
    assert_eq!(sigma.apply(&a), sigma.apply(&b));
}

#[test]
fn mgu_is_idempotent() {
    let (a, b) = (t("p(X, Y, Z)"), t("p(Y, Z, c)"));
    let sigma = unify(&a, &b).into_result().expect("unifies");
    let once = sigma.apply(&a);
    assert_eq!(sigma.apply(&once), once);
    for (_, value) in sigma.bindings() {
        assert_eq!(&sigma.apply(value), value, "bound value mentions a bound variable");
    }
}

#[test]
fn occurs_check_rejects_cyclic_binding() {
    let result = unify(&t("X"), &t("f(X)"));
    assert!(matches!(
        result,
        UnifyResult::Failure(UnifyError::OccursCheck { .. })
    ));
}

#[test]
fn failed_unification_leaves_substitution_unchanged() {
    let mut sigma = Substitution::empty();
    sigma.unify(&t("X"), &t("a")).unwrap();
    let before = sigma.clone();
    assert!(sigma.unify(&t("f(X, Y)"), &t("f(b, c)")).is_err());
    assert_eq!(sigma, before);
    assert!(sigma.lookup(&Var::new("Y")).is_none());
}

#[test]
fn simultaneous_pairs_share_bindings() {
    let result = unify_many(&[(t("X"), t("Y")), (t("Y"), t("a")), (t("X"), t("b"))]);
    assert!(result.is_failure());
    let sigma = unify_many(&[(t("X"), t("Y")), (t("Y"), t("a"))])
        .into_result()
        .unwrap();
    assert_eq!(sigma.apply(&t("X")), t("a"));
}

#[test]
fn lists_unify_elementwise_with_tails() {
    let sigma = unify(&t("[H | T]"), &t("[1, 2, 3]")).into_result().unwrap();
    assert_eq!(sigma.apply(&t("H")), Term::int(1));
    assert_eq!(sigma.apply(&t("T")).to_string(), "[2,3]");
    assert!(unify(&t("[a, b]"), &t("[a]")).is_failure());
}

#[test]
fn numbers_compare_by_value_and_type() {
    assert!(unify(&t("1"), &t("1")).is_success());
    assert!(unify(&t("1"), &t("2")).is_failure());
    assert!(unify(&t("a"), &t("'a'")).is_success());
}
