//! Substitution: a compressed, mutable variable-binding environment.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use super::UnifyError;
use crate::syntax::{Atom, Expr, Term, Transform, Var};

/// A substitution σ = {X₁ → t₁, ..., Xₙ → tₙ} over a tracked variable domain.
///
/// Bindings are kept compressed: no bound value mentions a bound variable,
/// so application is a single lookup per variable. The domain also records
/// every variable handed out by [`Substitution::fresh_var`], which is what
/// keeps renamed-apart clauses disjoint from the goal being solved.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    domain: BTreeSet<Var>,
    /// Printed names of the domain; `X1` and `X` with tally 1 share one.
    printed: HashSet<String>,
    bindings: BTreeMap<Var, Term>,
    tally: HashMap<String, u32>,
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for Substitution {}

impl Substitution {
    /// Create an empty substitution (identity).
    pub fn empty() -> Self {
        Substitution::default()
    }

    /// Create a substitution with a single binding.
    pub fn singleton(var: Var, term: Term) -> Result<Self, UnifyError> {
        let mut subst = Substitution::empty();
        subst.bind(var, term)?;
        Ok(subst)
    }

    /// Register every variable of `x` in the domain.
    pub fn add_variables<T: Transform>(&mut self, x: &T) {
        for v in x.variables() {
            self.register(v);
        }
    }

    fn register(&mut self, var: Var) {
        self.printed.insert(var.to_string());
        self.domain.insert(var);
    }

    /// A variable with `symbol` whose printed name no domain variable has.
    pub fn fresh_var(&mut self, symbol: &str) -> Var {
        let tally = self.tally.entry(symbol.to_string()).or_insert(0);
        loop {
            let var = Var::with_tally(symbol, *tally);
            *tally += 1;
            if !self.printed.contains(&var.to_string()) {
                self.register(var.clone());
                return var;
            }
        }
    }

    /// Bind `var` to `term`.
    ///
    /// The term is resolved against the current bindings first. Binding a
    /// variable that is already bound unifies the old and new values.
    /// Fails without changes on an occurs-check violation.
    pub fn bind(&mut self, var: Var, term: Term) -> Result<(), UnifyError> {
        if let Some(existing) = self.bindings.get(&var).cloned() {
            return self.unify(&existing, &term);
        }
        let term = self.apply(&term);
        if term == Term::Var(var.clone()) {
            return Ok(());
        }
        if term.occurs(&var) {
            return Err(UnifyError::OccursCheck { var, term });
        }
        self.register(var.clone());
        self.add_variables(&term);
        for value in self.bindings.values_mut() {
            if value.occurs(&var) {
                *value = value.transform(&mut |t| match t {
                    Term::Var(v) if *v == var => Some(term.clone()),
                    _ => None,
                });
            }
        }
        self.bindings.insert(var, term);
        Ok(())
    }

    /// Look up a variable in this substitution.
    pub fn lookup(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// The current value of `term` at its root.
    pub fn resolve(&self, term: &Term) -> Term {
        match term {
            Term::Var(v) => self.bindings.get(v).cloned().unwrap_or_else(|| term.clone()),
            _ => term.clone(),
        }
    }

    /// Replace every bound variable in `x` by its value.
    pub fn apply<T: Transform>(&self, x: &T) -> T {
        if self.bindings.is_empty() {
            return x.transform(&mut |_| None);
        }
        x.transform(&mut |t| match t {
            Term::Var(v) => self.bindings.get(v).cloned(),
            _ => None,
        })
    }

    /// Unify two terms, extending this substitution.
    ///
    /// All-or-nothing: on failure the substitution is unchanged.
    pub fn unify(&mut self, t1: &Term, t2: &Term) -> Result<(), UnifyError> {
        let mut trial = self.clone();
        trial.unify_terms(t1, t2)?;
        *self = trial;
        Ok(())
    }

    /// Unify two atoms, extending this substitution. All-or-nothing.
    pub fn unify_atoms(&mut self, a1: &Atom, a2: &Atom) -> Result<(), UnifyError> {
        let mut trial = self.clone();
        match (a1, a2) {
            (Atom::Predicate(p), Atom::Predicate(q)) => {
                if p.name != q.name {
                    return Err(UnifyError::SymbolClash {
                        expected: p.name.clone(),
                        found: q.name.clone(),
                    });
                }
                if p.args.len() != q.args.len() {
                    return Err(UnifyError::ArityMismatch {
                        symbol: p.name.clone(),
                        expected: p.args.len(),
                        found: q.args.len(),
                    });
                }
                for (s, t) in p.args.iter().zip(&q.args) {
                    trial.unify_terms(s, t)?;
                }
            }
            (Atom::Compare(c), Atom::Compare(d)) if c.op == d.op => {
                trial.unify_exprs(&c.left, &d.left)?;
                trial.unify_exprs(&c.right, &d.right)?;
            }
            _ => {
                return Err(UnifyError::SymbolClash {
                    expected: a1.to_string(),
                    found: a2.to_string(),
                })
            }
        }
        *self = trial;
        Ok(())
    }

    fn unify_exprs(&mut self, e1: &Expr, e2: &Expr) -> Result<(), UnifyError> {
        match (e1, e2) {
            (Expr::Term(s), Expr::Term(t)) => self.unify_terms(s, t),
            (Expr::Binary(o1, l1, r1), Expr::Binary(o2, l2, r2)) if o1 == o2 => {
                self.unify_exprs(l1, l2)?;
                self.unify_exprs(r1, r2)
            }
            (Expr::Neg(a), Expr::Neg(b)) => self.unify_exprs(a, b),
            (Expr::Call(m1, a), Expr::Call(m2, b)) if m1 == m2 => self.unify_exprs(a, b),
            _ => Err(UnifyError::SymbolClash {
                expected: e1.to_string(),
                found: e2.to_string(),
            }),
        }
    }

    fn unify_terms(&mut self, t1: &Term, t2: &Term) -> Result<(), UnifyError> {
        let t1 = self.resolve(t1);
        let t2 = self.resolve(t2);
        match (&t1, &t2) {
            (Term::Var(x), Term::Var(y)) if x == y => Ok(()),
            // Variable against variable binds the right-hand one.
            (_, Term::Var(y)) => self.bind(y.clone(), t1.clone()),
            (Term::Var(x), _) => self.bind(x.clone(), t2.clone()),
            (Term::Constant(a), Term::Constant(b)) => {
                if a == b {
                    Ok(())
                } else {
                    Err(clash(&t1, &t2))
                }
            }
            (Term::Compound(f, xs), Term::Compound(g, ys)) => {
                if f != g {
                    return Err(clash(&t1, &t2));
                }
                if xs.len() != ys.len() {
                    return Err(UnifyError::ArityMismatch {
                        symbol: f.clone(),
                        expected: xs.len(),
                        found: ys.len(),
                    });
                }
                for (a, b) in xs.iter().zip(ys) {
                    self.unify_terms(a, b)?;
                }
                Ok(())
            }
            (Term::List(xs, xt), Term::List(ys, yt)) => self.unify_lists(xs, xt, ys, yt),
            (Term::Placeholder(p), Term::Placeholder(q)) => {
                if p == q {
                    Ok(())
                } else {
                    Err(UnifyError::PlaceholderMismatch {
                        placeholder: t1.clone(),
                        term: t2.clone(),
                    })
                }
            }
            (Term::Placeholder(_), _) => Err(UnifyError::PlaceholderMismatch {
                placeholder: t1.clone(),
                term: t2.clone(),
            }),
            (_, Term::Placeholder(_)) => Err(UnifyError::PlaceholderMismatch {
                placeholder: t2.clone(),
                term: t1.clone(),
            }),
            _ => Err(clash(&t1, &t2)),
        }
    }

    fn unify_lists(
        &mut self,
        xs: &[Term],
        xt: &Option<Box<Term>>,
        ys: &[Term],
        yt: &Option<Box<Term>>,
    ) -> Result<(), UnifyError> {
        let shared = xs.len().min(ys.len());
        for (a, b) in xs[..shared].iter().zip(&ys[..shared]) {
            self.unify_terms(a, b)?;
        }
        let closed = || Term::List(Vec::new(), None);
        let rest = |items: &[Term], tail: &Option<Box<Term>>| {
            Term::list(items.to_vec(), tail.as_ref().map(|t| (**t).clone()))
        };
        if xs.len() == ys.len() {
            return match (xt, yt) {
                (None, None) => Ok(()),
                (Some(t), None) => self.unify_terms(t, &closed()),
                (None, Some(t)) => self.unify_terms(&closed(), t),
                (Some(s), Some(t)) => self.unify_terms(s, t),
            };
        }
        if xs.len() < ys.len() {
            match xt {
                Some(t) => self.unify_terms(t, &rest(&ys[shared..], yt)),
                None => Err(UnifyError::LengthMismatch {
                    expected: xs.len(),
                    found: ys.len(),
                }),
            }
        } else {
            match yt {
                Some(t) => self.unify_terms(&rest(&xs[shared..], xt), t),
                None => Err(UnifyError::LengthMismatch {
                    expected: xs.len(),
                    found: ys.len(),
                }),
            }
        }
    }

    /// Copy `x` with every variable renamed apart.
    ///
    /// Variables already in `mapping` reuse their image; new ones get a fresh
    /// variable of the same symbol and are recorded in `mapping`. With
    /// `allow_new` false an unmapped variable is an error.
    pub fn rename<T: Transform>(
        &mut self,
        x: &T,
        mapping: &mut HashMap<Var, Var>,
        allow_new: bool,
    ) -> Result<T, UnifyError> {
        let mut missing = None;
        let renamed = x.transform(&mut |t| match t {
            Term::Var(v) => {
                if let Some(image) = mapping.get(v) {
                    return Some(Term::Var(image.clone()));
                }
                if !allow_new {
                    missing.get_or_insert_with(|| v.clone());
                    return Some(t.clone());
                }
                let image = self.fresh_var(v.symbol());
                mapping.insert(v.clone(), image.clone());
                Some(Term::Var(image))
            }
            _ => None,
        });
        match missing {
            Some(var) => Err(UnifyError::UnmappedVariable(var)),
            None => Ok(renamed),
        }
    }

    /// The restriction of this substitution to `vars`.
    ///
    /// The result binds only the given variables; its domain is those
    /// variables plus the variables of their values.
    pub fn restrict(&self, vars: &[Var]) -> Substitution {
        let mut restricted = Substitution::empty();
        for v in vars {
            restricted.register(v.clone());
            if let Some(t) = self.bindings.get(v) {
                restricted.add_variables(t);
                restricted.bindings.insert(v.clone(), t.clone());
            }
        }
        restricted
    }

    /// Get the domain of this substitution.
    pub fn domain(&self) -> impl Iterator<Item = &Var> {
        self.domain.iter()
    }

    /// Iterate over the bindings in order of variable.
    pub fn bindings(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// Check if this substitution has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (v, t)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", v, t)?;
        }
        write!(f, "}}")
    }
}

fn clash(t1: &Term, t2: &Term) -> UnifyError {
    UnifyError::SymbolClash {
        expected: t1.to_string(),
        found: t2.to_string(),
    }
}

/// Rename variables to `A, B, ..., Z, AA, AB, ...` by first occurrence.
pub fn generic_variable_names<T: Transform>(x: &T) -> T {
    let mut names: HashMap<Var, Var> = HashMap::new();
    x.transform(&mut |t| match t {
        Term::Var(v) => {
            let next = names.len();
            let image = names
                .entry(v.clone())
                .or_insert_with(|| Var::new(generic_name(next)));
            Some(Term::Var(image.clone()))
        }
        _ => None,
    })
}

/// `0 -> A`, `25 -> Z`, `26 -> AA`.
pub(crate) fn generic_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(args: Vec<Term>) -> Term {
        Term::app("f", args)
    }

    // === Binding ===

    #[test]
    fn test_bind_keeps_bindings_compressed() {
        let mut s = Substitution::empty();
        s.bind(Var::new("X"), f(vec![Term::var("Y")])).unwrap();
        s.bind(Var::new("Y"), Term::constant("a")).unwrap();
        assert_eq!(s.lookup(&Var::new("X")), Some(&f(vec![Term::constant("a")])));
    }

    #[test]
    fn test_bind_resolves_new_value() {
        let mut s = Substitution::empty();
        s.bind(Var::new("Y"), Term::constant("a")).unwrap();
        s.bind(Var::new("X"), f(vec![Term::var("Y")])).unwrap();
        assert_eq!(s.lookup(&Var::new("X")), Some(&f(vec![Term::constant("a")])));
    }

    #[test]
    fn test_bind_occurs_check() {
        let mut s = Substitution::empty();
        let err = s.bind(Var::new("X"), f(vec![Term::var("X")])).unwrap_err();
        assert!(matches!(err, UnifyError::OccursCheck { .. }));
        assert!(s.is_empty());
    }

    #[test]
    fn test_bind_to_self_is_noop() {
        let mut s = Substitution::empty();
        s.bind(Var::new("X"), Term::var("X")).unwrap();
        assert!(s.is_empty());
    }

    // === Unification ===

    #[test]
    fn test_unify_is_all_or_nothing() {
        let mut s = Substitution::empty();
        let left = f(vec![Term::var("X"), Term::constant("b")]);
        let right = f(vec![Term::constant("a"), Term::constant("c")]);
        assert!(s.unify(&left, &right).is_err());
        assert!(s.lookup(&Var::new("X")).is_none());
    }

    #[test]
    fn test_var_var_binds_right_side() {
        let mut s = Substitution::empty();
        s.unify(&Term::var("X"), &Term::var("Y")).unwrap();
        assert_eq!(s.lookup(&Var::new("Y")), Some(&Term::var("X")));
        assert!(s.lookup(&Var::new("X")).is_none());
    }

    #[test]
    fn test_open_list_absorbs_suffix() {
        let mut s = Substitution::empty();
        let open = Term::list(vec![Term::var("H")], Some(Term::var("T")));
        let closed = Term::list(vec![Term::int(1), Term::int(2), Term::int(3)], None);
        s.unify(&open, &closed).unwrap();
        assert_eq!(s.lookup(&Var::new("H")), Some(&Term::int(1)));
        assert_eq!(
            s.lookup(&Var::new("T")),
            Some(&Term::list(vec![Term::int(2), Term::int(3)], None))
        );
    }

    #[test]
    fn test_closed_lists_of_different_length_fail() {
        let mut s = Substitution::empty();
        let short = Term::list(vec![Term::int(1)], None);
        let long = Term::list(vec![Term::int(1), Term::int(2)], None);
        assert!(matches!(
            s.unify(&short, &long),
            Err(UnifyError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_placeholder_only_unifies_with_variables() {
        let mut s = Substitution::empty();
        let p = Term::placeholder(crate::syntax::Sign::Input, "person");
        assert!(s.unify(&p, &Term::constant("ann")).is_err());
        s.unify(&Term::var("X"), &p).unwrap();
        assert_eq!(s.lookup(&Var::new("X")), Some(&p));
    }

    // === Renaming ===

    #[test]
    fn test_rename_shares_mapping_and_avoids_domain() {
        let mut s = Substitution::empty();
        let term = f(vec![Term::var("X"), Term::var("X"), Term::var("Y")]);
        s.add_variables(&term);
        let mut mapping = HashMap::new();
        let renamed = s.rename(&term, &mut mapping, true).unwrap();
        let vars = renamed.variables();
        assert_eq!(vars.len(), 2);
        assert!(!vars.contains(&Var::new("X")));
        assert!(!vars.contains(&Var::new("Y")));
        assert_eq!(vars[0].symbol(), "X");
    }

    #[test]
    fn test_rename_without_new_variables_fails_on_unmapped() {
        let mut s = Substitution::empty();
        let mut mapping = HashMap::new();
        let err = s.rename(&Term::var("Z"), &mut mapping, false).unwrap_err();
        assert_eq!(err, UnifyError::UnmappedVariable(Var::new("Z")));
    }

    #[test]
    fn test_fresh_names_never_print_like_domain_variables() {
        let mut s = Substitution::empty();
        let term = f(vec![Term::var("X"), Term::var("X1")]);
        s.add_variables(&term);
        let fresh = s.fresh_var("X");
        assert_eq!(fresh, Var::with_tally("X", 2));
        assert_eq!(fresh.to_string(), "X2");
        let printed: Vec<String> = s.domain().map(|v| v.to_string()).collect();
        let unique: HashSet<&String> = printed.iter().collect();
        assert_eq!(unique.len(), printed.len());
    }

    // === Restriction ===

    #[test]
    fn test_restrict_drops_internal_variables() {
        let mut s = Substitution::empty();
        s.bind(Var::new("X"), Term::constant("a")).unwrap();
        s.bind(Var::with_tally("Y", 1), Term::constant("b")).unwrap();
        let r = s.restrict(&[Var::new("X")]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.lookup(&Var::new("X")), Some(&Term::constant("a")));
    }

    // === Generic names ===

    #[test]
    fn test_generic_names_sequence() {
        assert_eq!(generic_name(0), "A");
        assert_eq!(generic_name(25), "Z");
        assert_eq!(generic_name(26), "AA");
        assert_eq!(generic_name(27), "AB");
        assert_eq!(generic_name(26 + 26 * 26), "AAA");
    }

    #[test]
    fn test_generic_variable_names_by_first_occurrence() {
        let term = f(vec![Term::var("Mary"), Term::var("Ann"), Term::var("Mary")]);
        assert_eq!(
            generic_variable_names(&term),
            f(vec![Term::var("A"), Term::var("B"), Term::var("A")])
        );
    }
}
