//! First-order terms: constants, variables, compound terms, lists and mode placeholders.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Transform;

/// A constant value.
///
/// Floats compare and hash by their bit pattern so that terms can serve as
/// keys in the clause index and in the bottom-clause term table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Symbol(String),
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Int(a), Constant::Int(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::Symbol(a), Constant::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Constant::Int(i) => i.hash(state),
            Constant::Float(x) => x.to_bits().hash(state),
            Constant::Symbol(s) => s.hash(state),
        }
    }
}

impl Constant {
    /// A variable symbol derived from this value, e.g. `ann` becomes `Ann`
    /// and `2.5` becomes `V2_5`.
    pub fn to_variable_symbol(&self) -> String {
        match self {
            Constant::Symbol(s) => {
                let cleaned: String = s
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                    .collect();
                let mut chars = cleaned.chars();
                match chars.next() {
                    Some(first) if first.is_ascii_alphabetic() => {
                        first.to_ascii_uppercase().to_string() + chars.as_str()
                    }
                    _ => format!("V{}", cleaned),
                }
            }
            Constant::Int(i) => format!("V{}", i).replace('-', "m"),
            Constant::Float(x) => format!("V{:?}", x).replace(['.', '-'], "_"),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Float(x) => write!(f, "{:?}", x),
            Constant::Symbol(s) if is_plain_symbol(s) => write!(f, "{}", s),
            Constant::Symbol(s) => {
                write!(f, "'")?;
                for ch in s.chars() {
                    match ch {
                        '\'' => write!(f, "\\'")?,
                        '\\' => write!(f, "\\\\")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                write!(f, "'")
            }
        }
    }
}

/// Whether a symbol can be written without quotes.
fn is_plain_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// A logic variable.
///
/// Identity is the `(symbol, tally)` pair. Fresh variables produced during
/// renaming share a symbol and differ by tally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var {
    symbol: String,
    tally: u32,
}

impl Var {
    pub fn new(symbol: impl Into<String>) -> Self {
        Var {
            symbol: symbol.into(),
            tally: 0,
        }
    }

    pub fn with_tally(symbol: impl Into<String>, tally: u32) -> Self {
        Var {
            symbol: symbol.into(),
            tally,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn tally(&self) -> u32 {
        self.tally
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tally == 0 {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{}{}", self.symbol, self.tally)
        }
    }
}

/// Argument direction in a mode declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// `+`: bound on call.
    Input,
    /// `-`: produced by the call.
    Output,
    /// `#`: a ground constant kept verbatim.
    Constant,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Sign::Input => '+',
            Sign::Output => '-',
            Sign::Constant => '#',
        };
        write!(f, "{}", c)
    }
}

/// A typed mode placeholder such as `+person`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    pub sign: Sign,
    pub type_name: String,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign, self.type_name)
    }
}

/// A first-order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Constant(Constant),
    Var(Var),
    /// `f(t1, ..., tn)` with n >= 1.
    Compound(String, Vec<Term>),
    /// `[t1, ..., tn | Tail]`. A missing tail closes the list.
    List(Vec<Term>, Option<Box<Term>>),
    /// Only valid inside mode declarations.
    Placeholder(Placeholder),
}

impl Term {
    pub fn var(symbol: impl Into<String>) -> Self {
        Term::Var(Var::new(symbol))
    }

    pub fn constant(symbol: impl Into<String>) -> Self {
        Term::Constant(Constant::Symbol(symbol.into()))
    }

    pub fn int(value: i64) -> Self {
        Term::Constant(Constant::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Term::Constant(Constant::Float(value))
    }

    /// Compound term; a functor with no arguments is a symbol constant.
    pub fn app(functor: impl Into<String>, args: Vec<Term>) -> Self {
        if args.is_empty() {
            Term::constant(functor)
        } else {
            Term::Compound(functor.into(), args)
        }
    }

    pub fn placeholder(sign: Sign, type_name: impl Into<String>) -> Self {
        Term::Placeholder(Placeholder {
            sign,
            type_name: type_name.into(),
        })
    }

    /// Build a list, flattening a list-valued tail and collapsing `[|T]` to `T`.
    pub fn list(mut items: Vec<Term>, tail: Option<Term>) -> Self {
        match tail {
            None => Term::List(items, None),
            Some(Term::List(rest, rest_tail)) => {
                items.extend(rest);
                Term::list(items, rest_tail.map(|t| *t))
            }
            Some(t) if items.is_empty() => t,
            Some(t) => Term::List(items, Some(Box::new(t))),
        }
    }

    /// Does `var` occur anywhere in this term.
    pub fn occurs(&self, var: &Var) -> bool {
        match self {
            Term::Var(v) => v == var,
            Term::Compound(_, args) => args.iter().any(|a| a.occurs(var)),
            Term::List(items, tail) => {
                items.iter().any(|a| a.occurs(var))
                    || tail.as_ref().map_or(false, |t| t.occurs(var))
            }
            Term::Constant(_) | Term::Placeholder(_) => false,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Variable symbol used when this term is lifted into a bottom clause.
    pub fn to_variable_symbol(&self) -> String {
        match self {
            Term::Constant(c) => c.to_variable_symbol(),
            Term::Var(v) => v.symbol().to_string(),
            Term::Compound(functor, _) => Constant::Symbol(functor.clone()).to_variable_symbol(),
            Term::List(..) => "L".to_string(),
            Term::Placeholder(p) => Constant::Symbol(p.type_name.clone()).to_variable_symbol(),
        }
    }
}

impl Transform for Term {
    fn transform(&self, f: &mut dyn FnMut(&Term) -> Option<Term>) -> Self {
        if let Some(replaced) = f(self) {
            return replaced;
        }
        match self {
            Term::Compound(functor, args) => {
                Term::Compound(functor.clone(), args.iter().map(|a| a.transform(f)).collect())
            }
            Term::List(items, tail) => Term::list(
                items.iter().map(|a| a.transform(f)).collect(),
                tail.as_ref().map(|t| t.transform(f)),
            ),
            _ => self.clone(),
        }
    }

    fn visit(&self, f: &mut dyn FnMut(&Term)) {
        f(self);
        match self {
            Term::Compound(_, args) => args.iter().for_each(|a| a.visit(f)),
            Term::List(items, tail) => {
                items.iter().for_each(|a| a.visit(f));
                if let Some(t) = tail {
                    t.visit(f);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn write_args(f: &mut fmt::Formatter<'_>, args: &[Term]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Var(v) => write!(f, "{}", v),
            Term::Compound(functor, args) => {
                write!(f, "{}(", Constant::Symbol(functor.clone()))?;
                write_args(f, args)?;
                write!(f, ")")
            }
            Term::List(items, tail) => {
                write!(f, "[")?;
                write_args(f, items)?;
                if let Some(t) = tail {
                    write!(f, "|{}", t)?;
                }
                write!(f, "]")
            }
            Term::Placeholder(p) => write!(f, "{}", p),
        }
    }
}
