//! Structural maps over the terms inside syntax trees.

use super::{Term, Var};

/// A syntax node whose terms can be mapped and inspected.
///
/// `transform` calls `f` on each term top-down; a `Some` result replaces the
/// term and stops descent into it, `None` keeps the term and descends.
pub trait Transform: Sized {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self;

    /// Call `f` on every term and sub-term, top-down.
    fn visit(&self, f: &mut dyn FnMut(&Term));

    /// Variables in order of first occurrence.
    fn variables(&self) -> Vec<Var> {
        let mut vars = Vec::new();
        self.visit(&mut |t| {
            if let Term::Var(v) = t {
                if !vars.contains(v) {
                    vars.push(v.clone());
                }
            }
        });
        vars
    }

    fn is_ground(&self) -> bool {
        let mut ground = true;
        self.visit(&mut |t| {
            if matches!(t, Term::Var(_)) {
                ground = false;
            }
        });
        ground
    }

    fn has_placeholders(&self) -> bool {
        let mut found = false;
        self.visit(&mut |t| {
            if matches!(t, Term::Placeholder(_)) {
                found = true;
            }
        });
        found
    }
}

impl<T: Transform + Clone> Transform for Vec<T> {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        self.iter().map(|x| x.transform(f)).collect()
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        for x in self {
            x.visit(f);
        }
    }
}
