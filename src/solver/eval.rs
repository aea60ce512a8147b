//! Evaluation of comparison and `is` atoms.

use std::cmp::Ordering;

use crate::syntax::{BinOp, CompareKind, CompareOp, Comparison, Constant, Expr, MathFn, Term};
use crate::unify::Substitution;

/// A numeric value produced by arithmetic evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    pub fn to_term(self) -> Term {
        match self {
            Number::Int(i) => Term::int(i),
            Number::Float(x) => Term::float(x),
        }
    }
}

fn finite(x: f64) -> Option<Number> {
    if x.is_nan() {
        None
    } else {
        Some(Number::Float(x))
    }
}

/// Evaluate an arithmetic expression under `sigma`.
///
/// `None` when a leaf is not a number after substitution, or on division by
/// zero, overflow or a domain error.
pub fn evaluate(expr: &Expr, sigma: &Substitution) -> Option<Number> {
    match expr {
        Expr::Term(t) => match sigma.apply(t) {
            Term::Constant(Constant::Int(i)) => Some(Number::Int(i)),
            Term::Constant(Constant::Float(x)) => Some(Number::Float(x)),
            _ => None,
        },
        Expr::Neg(e) => match evaluate(e, sigma)? {
            Number::Int(i) => i.checked_neg().map(Number::Int),
            Number::Float(x) => Some(Number::Float(-x)),
        },
        Expr::Binary(op, l, r) => binary(*op, evaluate(l, sigma)?, evaluate(r, sigma)?),
        Expr::Call(m, e) => call(*m, evaluate(e, sigma)?),
    }
}

fn binary(op: BinOp, a: Number, b: Number) -> Option<Number> {
    use Number::Int;
    match (op, a, b) {
        (BinOp::Add, Int(x), Int(y)) => x.checked_add(y).map(Int),
        (BinOp::Sub, Int(x), Int(y)) => x.checked_sub(y).map(Int),
        (BinOp::Mul, Int(x), Int(y)) => x.checked_mul(y).map(Int),
        (BinOp::Div, Int(_), Int(0)) => None,
        (BinOp::Div, Int(x), Int(y)) if x.checked_rem(y) == Some(0) => x.checked_div(y).map(Int),
        (BinOp::IntDiv, Int(x), Int(y)) => {
            let q = x.checked_div_euclid(y)?;
            let r = x.checked_rem_euclid(y)?;
            Some(Int(if y < 0 && r != 0 { q - 1 } else { q }))
        }
        (BinOp::Mod, Int(x), Int(y)) => {
            // Result takes the sign of the divisor.
            let r = x.checked_rem_euclid(y)?;
            Some(Int(if y < 0 && r != 0 { r + y } else { r }))
        }
        (BinOp::Pow, Int(x), Int(y)) if y >= 0 => {
            u32::try_from(y).ok().and_then(|e| x.checked_pow(e)).map(Int)
        }
        (op, a, b) => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let value = match op {
                BinOp::Add => x + y,
                BinOp::Sub => x - y,
                BinOp::Mul => x * y,
                BinOp::Div | BinOp::IntDiv | BinOp::Mod if y == 0.0 => return None,
                BinOp::Div => x / y,
                BinOp::IntDiv => (x / y).floor(),
                BinOp::Mod => x - y * (x / y).floor(),
                BinOp::Pow => x.powf(y),
            };
            finite(value)
        }
    }
}

fn call(m: MathFn, a: Number) -> Option<Number> {
    if let (MathFn::Abs, Number::Int(i)) = (m, a) {
        return i.checked_abs().map(Number::Int);
    }
    let x = a.as_f64();
    let value = match m {
        MathFn::Sin => x.sin(),
        MathFn::Cos => x.cos(),
        MathFn::Tan => x.tan(),
        MathFn::Asin => x.asin(),
        MathFn::Acos => x.acos(),
        MathFn::Atan => x.atan(),
        MathFn::Sinh => x.sinh(),
        MathFn::Cosh => x.cosh(),
        MathFn::Tanh => x.tanh(),
        MathFn::Asinh => x.asinh(),
        MathFn::Acosh => x.acosh(),
        MathFn::Atanh => x.atanh(),
        MathFn::Sqrt => x.sqrt(),
        MathFn::Exp => x.exp(),
        MathFn::Log => x.ln(),
        MathFn::Abs => x.abs(),
    };
    finite(value)
}

/// Decide a comparison under `sigma`.
///
/// `=` and `is` extend `sigma` on success; every other operator leaves it
/// untouched. Anything that cannot be decided counts as false.
pub fn holds(cmp: &Comparison, sigma: &mut Substitution) -> bool {
    match cmp.op.kind() {
        CompareKind::Arithmetic => {
            let (Some(a), Some(b)) = (evaluate(&cmp.left, sigma), evaluate(&cmp.right, sigma)) else {
                return false;
            };
            let Some(ord) = a.compare(b) else {
                return false;
            };
            match cmp.op {
                CompareOp::ArithEq => ord == Ordering::Equal,
                CompareOp::ArithNe => ord != Ordering::Equal,
                CompareOp::Less => ord == Ordering::Less,
                CompareOp::LessEq => ord != Ordering::Greater,
                CompareOp::Greater => ord == Ordering::Greater,
                CompareOp::GreaterEq => ord != Ordering::Less,
                _ => false,
            }
        }
        CompareKind::Evaluation => {
            let Some(target) = cmp.left.as_term() else {
                return false;
            };
            let Some(value) = evaluate(&cmp.right, sigma) else {
                return false;
            };
            match sigma.apply(target) {
                Term::Constant(Constant::Int(i)) => Number::Int(i).compare(value) == Some(Ordering::Equal),
                Term::Constant(Constant::Float(x)) => {
                    Number::Float(x).compare(value) == Some(Ordering::Equal)
                }
                other => sigma.unify(&other, &value.to_term()).is_ok(),
            }
        }
        CompareKind::Unification => {
            let (Some(l), Some(r)) = (cmp.left.as_term(), cmp.right.as_term()) else {
                return false;
            };
            match cmp.op {
                CompareOp::Unify => sigma.unify(l, r).is_ok(),
                CompareOp::NotUnify => sigma.clone().unify(l, r).is_err(),
                op => {
                    let (l, r) = (sigma.apply(l), sigma.apply(r));
                    match op {
                        CompareOp::Identical => l == r,
                        CompareOp::NotIdentical => l != r,
                        _ => {
                            let ord = l.to_string().cmp(&r.to_string());
                            match op {
                                CompareOp::Before => ord == Ordering::Less,
                                CompareOp::BeforeEq => ord != Ordering::Greater,
                                CompareOp::After => ord == Ordering::Greater,
                                CompareOp::AfterEq => ord != Ordering::Less,
                                _ => false,
                            }
                        }
                    }
                }
            }
        }
    }
}
