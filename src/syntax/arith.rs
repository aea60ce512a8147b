//! Comparison and evaluation atoms with their arithmetic expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Term, Transform};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "//",
            BinOp::Mod => "mod",
            BinOp::Pow => "**",
        }
    }

    pub(crate) fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::IntDiv | BinOp::Mod => 2,
            BinOp::Pow => 3,
        }
    }
}

/// Unary arithmetic function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Exp,
    Log,
    Abs,
}

impl MathFn {
    pub const ALL: [MathFn; 16] = [
        MathFn::Sin,
        MathFn::Cos,
        MathFn::Tan,
        MathFn::Asin,
        MathFn::Acos,
        MathFn::Atan,
        MathFn::Sinh,
        MathFn::Cosh,
        MathFn::Tanh,
        MathFn::Asinh,
        MathFn::Acosh,
        MathFn::Atanh,
        MathFn::Sqrt,
        MathFn::Exp,
        MathFn::Log,
        MathFn::Abs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MathFn::Sin => "sin",
            MathFn::Cos => "cos",
            MathFn::Tan => "tan",
            MathFn::Asin => "asin",
            MathFn::Acos => "acos",
            MathFn::Atan => "atan",
            MathFn::Sinh => "sinh",
            MathFn::Cosh => "cosh",
            MathFn::Tanh => "tanh",
            MathFn::Asinh => "asinh",
            MathFn::Acosh => "acosh",
            MathFn::Atanh => "atanh",
            MathFn::Sqrt => "sqrt",
            MathFn::Exp => "exp",
            MathFn::Log => "log",
            MathFn::Abs => "abs",
        }
    }

    pub fn from_name(name: &str) -> Option<MathFn> {
        MathFn::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// An arithmetic expression over terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Term(Term),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Call(MathFn, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Expr::Term(t) => Some(t),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, ..) => op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl From<Term> for Expr {
    fn from(term: Term) -> Self {
        Expr::Term(term)
    }
}

impl Transform for Expr {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        match self {
            Expr::Term(t) => Expr::Term(t.transform(f)),
            Expr::Binary(op, l, r) => Expr::binary(*op, l.transform(f), r.transform(f)),
            Expr::Neg(e) => Expr::Neg(Box::new(e.transform(f))),
            Expr::Call(m, e) => Expr::Call(*m, Box::new(e.transform(f))),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        match self {
            Expr::Term(t) => t.visit(f),
            Expr::Binary(_, l, r) => {
                l.visit(f);
                r.visit(f);
            }
            Expr::Neg(e) | Expr::Call(_, e) => e.visit(f),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Term(t) => write!(f, "{}", t),
            Expr::Binary(op, l, r) => {
                let prec = op.precedence();
                // `**` groups to the right, everything else to the left.
                let (left_min, right_min) = if *op == BinOp::Pow {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                write_operand(f, l, left_min)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, r, right_min)
            }
            Expr::Neg(e) => write!(f, "-({})", e),
            Expr::Call(m, e) => write!(f, "{}({})", m.name(), e),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min_precedence: u8) -> fmt::Result {
    if e.precedence() < min_precedence {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

/// How a comparison operator is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareKind {
    /// Structural: unification, identity, standard order of terms.
    Unification,
    /// Both sides evaluated as numbers.
    Arithmetic,
    /// `X is Expr`: evaluate the right side, unify with the left.
    Evaluation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Unify,
    NotUnify,
    Identical,
    NotIdentical,
    Before,
    BeforeEq,
    After,
    AfterEq,
    ArithEq,
    ArithNe,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Is,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Unify => "=",
            CompareOp::NotUnify => "\\=",
            CompareOp::Identical => "==",
            CompareOp::NotIdentical => "\\==",
            CompareOp::Before => "@<",
            CompareOp::BeforeEq => "@=<",
            CompareOp::After => "@>",
            CompareOp::AfterEq => "@>=",
            CompareOp::ArithEq => "=:=",
            CompareOp::ArithNe => "=\\=",
            CompareOp::Less => "<",
            CompareOp::LessEq => "=<",
            CompareOp::Greater => ">",
            CompareOp::GreaterEq => ">=",
            CompareOp::Is => "is",
        }
    }

    pub fn kind(self) -> CompareKind {
        match self {
            CompareOp::Unify
            | CompareOp::NotUnify
            | CompareOp::Identical
            | CompareOp::NotIdentical
            | CompareOp::Before
            | CompareOp::BeforeEq
            | CompareOp::After
            | CompareOp::AfterEq => CompareKind::Unification,
            CompareOp::Is => CompareKind::Evaluation,
            _ => CompareKind::Arithmetic,
        }
    }
}

/// `left op right`, decided by evaluation instead of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub op: CompareOp,
    pub left: Expr,
    pub right: Expr,
}

impl Comparison {
    pub fn new(op: CompareOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Comparison {
            op,
            left: left.into(),
            right: right.into(),
        }
    }
}

impl Transform for Comparison {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        Comparison {
            op: self.op,
            left: self.left.transform(f),
            right: self.right.transform(f),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        self.left.visit(f);
        self.right.visit(f);
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}
