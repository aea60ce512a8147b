//! Recursive-descent parser for program text, goals and REPL directives.

use super::ast::{Block, Directive, Statement};
use super::lexer::{LexError, Lexer, Token};
use crate::modes::{Determination, Mode, ModeKind, Recall};
use crate::syntax::{
    Atom, BinOp, Clause, CompareOp, Comparison, Constant, Expr, Goal, Literal, MathFn, Predicate,
    Sign, Signature, Term, Var,
};

/// Parse error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// Parser state.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    column: usize,
    /// Anonymous variables read so far
    anonymous: u32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let (line, column) = lexer.token_location();
        Ok(Parser {
            lexer,
            current,
            line,
            column,
            anonymous: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let old = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        (self.line, self.column) = self.lexer.token_location();
        Ok(old)
    }

    fn peek(&mut self) -> Result<Token, ParseError> {
        Ok(self.lexer.peek_token()?)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, self.current)))
        }
    }

    /// Consume the current token if it equals `token`.
    fn eat(&mut self, token: &Token) -> Result<bool, ParseError> {
        if &self.current == token {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.line,
            column: self.column,
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.current == Token::Eof {
            Ok(())
        } else {
            Err(self.error(format!("unexpected {:?} after end of input", self.current)))
        }
    }
}

/// Parse a source file into statements.
pub fn parse_file(source: &str) -> Result<Vec<Statement>, ParseError> {
    let mut parser = Parser::new(source)?;
    let mut statements = Vec::new();

    while parser.current != Token::Eof {
        let stmt = parse_statement(&mut parser)?;
        statements.push(stmt);
    }

    Ok(statements)
}

/// Parse a goal. The `?-` prefix and the final `.` are optional.
pub fn parse_query(source: &str) -> Result<Goal, ParseError> {
    let mut parser = Parser::new(source)?;
    parser.eat(&Token::Query)?;
    let literals = parse_literals(&mut parser)?;
    parser.eat(&Token::Dot)?;
    parser.expect_eof()?;
    Ok(Goal::new(literals))
}

/// Parse a single clause. The final `.` is optional.
pub fn parse_clause(source: &str) -> Result<Clause, ParseError> {
    let mut parser = Parser::new(source)?;
    let clause = parse_clause_body(&mut parser)?;
    parser.eat(&Token::Dot)?;
    parser.expect_eof()?;
    Ok(clause)
}

fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let declaration = matches!(
        &parser.current,
        Token::Atom(name) if matches!(name.as_str(), "modeh" | "modeb" | "determination" | "set")
    ) && parser.peek()? == Token::LParen;
    if declaration {
        return parse_declaration(parser);
    }
    match &parser.current {
        Token::Colon => parse_directive(parser),
        Token::Query => {
            parser.advance()?;
            let literals = parse_literals(parser)?;
            end_statement(parser)?;
            Ok(Statement::Query(Goal::new(literals)))
        }
        Token::Neck => parse_neck_statement(parser),
        _ => {
            let clause = parse_clause_body(parser)?;
            end_statement(parser)?;
            Ok(Statement::Clause(clause))
        }
    }
}

/// A statement ends with `.`, or with the end of input on a REPL line.
fn end_statement(parser: &mut Parser) -> Result<(), ParseError> {
    match parser.current {
        Token::Dot => {
            parser.advance()?;
            Ok(())
        }
        Token::Eof => Ok(()),
        _ => Err(parser.error(format!("expected '.', found {:?}", parser.current))),
    }
}

/// `:- begin_bg.` and friends, or a denial `:- b1, ..., bn.`
fn parse_neck_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(Token::Neck)?;
    let literals = parse_literals(parser)?;
    end_statement(parser)?;
    if let [Literal::Atom(Atom::Predicate(p))] = literals.as_slice() {
        if p.args.is_empty() {
            if let Some((begin, block)) = Block::from_marker(&p.name) {
                return Ok(if begin {
                    Statement::Begin(block)
                } else {
                    Statement::End(block)
                });
            }
        }
    }
    let body = atoms_only(parser, literals)?;
    Ok(Statement::Clause(Clause::denial(body)))
}

fn parse_clause_body(parser: &mut Parser) -> Result<Clause, ParseError> {
    let head = match parse_atom(parser)? {
        Atom::Predicate(p) => p,
        Atom::Compare(c) => {
            return Err(parser.error(format!("clause head `{}` is not a predicate", c)));
        }
    };
    let body = if parser.eat(&Token::Neck)? {
        let literals = parse_literals(parser)?;
        atoms_only(parser, literals)?
    } else {
        Vec::new()
    };
    Ok(Clause::new(Atom::Predicate(head), body))
}

fn atoms_only(parser: &Parser, literals: Vec<Literal>) -> Result<Vec<Atom>, ParseError> {
    literals
        .into_iter()
        .map(|literal| match literal {
            Literal::Atom(atom) => Ok(atom),
            Literal::Not(_) => Err(parser.error("negation is only allowed in queries")),
        })
        .collect()
}

fn parse_declaration(parser: &mut Parser) -> Result<Statement, ParseError> {
    let name = match parser.advance()? {
        Token::Atom(name) => name,
        other => return Err(parser.error(format!("expected declaration, found {:?}", other))),
    };
    parser.expect(Token::LParen)?;
    let statement = match name.as_str() {
        "modeh" | "modeb" => {
            let kind = if name == "modeh" {
                ModeKind::Head
            } else {
                ModeKind::Body
            };
            let recall = parse_recall(parser)?;
            parser.expect(Token::Comma)?;
            let term = parse_term(parser)?;
            let atom = term_to_predicate(term)
                .ok_or_else(|| parser.error(format!("{} expects a predicate", name)))?;
            let mode = Mode::new(kind, recall, atom).map_err(|e| parser.error(e.to_string()))?;
            Statement::Mode(mode)
        }
        "determination" => {
            let head = parse_signature(parser)?;
            let mut body = Vec::new();
            while parser.eat(&Token::Comma)? {
                body.push(parse_signature(parser)?);
            }
            Statement::Determination(Determination::new(head, body))
        }
        _ => {
            let key = parse_word(parser)?;
            parser.expect(Token::Comma)?;
            let value = parse_word(parser)?;
            Statement::Set(key, value)
        }
    };
    parser.expect(Token::RParen)?;
    end_statement(parser)?;
    Ok(statement)
}

fn parse_recall(parser: &mut Parser) -> Result<Recall, ParseError> {
    match parser.current {
        Token::Op("*") => {
            parser.advance()?;
            Ok(Recall::Unbounded)
        }
        Token::Int(n) if n >= 0 => {
            parser.advance()?;
            Ok(Recall::Bounded(n as usize))
        }
        _ => Err(parser.error(format!(
            "expected recall (integer or '*'), found {:?}",
            parser.current
        ))),
    }
}

/// `name/arity`
fn parse_signature(parser: &mut Parser) -> Result<Signature, ParseError> {
    let name = match &parser.current {
        Token::Atom(name) => name.clone(),
        _ => return Err(parser.error(format!("expected predicate name, found {:?}", parser.current))),
    };
    parser.advance()?;
    parser.expect(Token::Op("/"))?;
    match parser.current {
        Token::Int(arity) if arity >= 0 => {
            parser.advance()?;
            Ok(Signature::new(name, arity as usize))
        }
        _ => Err(parser.error(format!("expected arity, found {:?}", parser.current))),
    }
}

/// A bare word, number or string, as text.
fn parse_word(parser: &mut Parser) -> Result<String, ParseError> {
    let word = match &parser.current {
        Token::Atom(s) | Token::Variable(s) | Token::StringLit(s) => s.clone(),
        Token::Int(n) => n.to_string(),
        Token::Float(x) => x.to_string(),
        _ => return Err(parser.error(format!("expected a value, found {:?}", parser.current))),
    };
    parser.advance()?;
    Ok(word)
}

fn parse_directive(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect(Token::Colon)?;

    let name = match &parser.current {
        Token::Atom(name) => name.clone(),
        _ => return Err(parser.error("expected directive name after ':'")),
    };
    parser.advance()?;

    let directive = match name.as_str() {
        "load" | "save" => {
            let path = match &parser.current {
                Token::StringLit(path) | Token::Atom(path) => path.clone(),
                _ => return Err(parser.error(format!("expected file name after :{}", name))),
            };
            parser.advance()?;
            if name == "load" {
                Directive::Load(path)
            } else {
                Directive::Save(path)
            }
        }
        "set" => {
            let key = parse_word(parser)?;
            let value = parse_word(parser)?;
            Directive::Set(key, value)
        }
        "pos" | "neg" | "verify" => {
            let clause = parse_clause_body(parser)?;
            match name.as_str() {
                "pos" => Directive::Pos(clause),
                "neg" => Directive::Neg(clause),
                _ => Directive::Verify(clause),
            }
        }
        "induce" => Directive::Induce,
        "show" => Directive::Show,
        "log" => Directive::Log,
        "next" => Directive::Next,
        "quit" => Directive::Quit,
        _ => return Err(parser.error(format!("unknown directive: {}", name))),
    };
    end_statement(parser)?;
    Ok(Statement::Directive(directive))
}

fn parse_literals(parser: &mut Parser) -> Result<Vec<Literal>, ParseError> {
    let mut literals = vec![parse_literal(parser)?];
    while parser.eat(&Token::Comma)? {
        literals.push(parse_literal(parser)?);
    }
    Ok(literals)
}

fn parse_literal(parser: &mut Parser) -> Result<Literal, ParseError> {
    let negation = matches!(&parser.current, Token::Atom(name) if name == "not")
        && parser.peek()? == Token::LParen;
    if negation {
        parser.advance()?;
        parser.expect(Token::LParen)?;
        let inner = parse_literals(parser)?;
        parser.expect(Token::RParen)?;
        return Ok(Literal::not(inner));
    }
    if parser.eat(&Token::Op("\\+"))? {
        if parser.eat(&Token::LParen)? {
            let inner = parse_literals(parser)?;
            parser.expect(Token::RParen)?;
            return Ok(Literal::not(inner));
        }
        return Ok(Literal::not(vec![parse_literal(parser)?]));
    }
    Ok(Literal::Atom(parse_atom(parser)?))
}

/// A predicate, or a comparison between two expressions.
fn parse_atom(parser: &mut Parser) -> Result<Atom, ParseError> {
    let left = parse_expr(parser)?;
    if let Some(op) = comparison_op(&parser.current) {
        parser.advance()?;
        let right = parse_expr(parser)?;
        return Ok(Atom::Compare(Comparison::new(op, left, right)));
    }
    match expr_to_predicate(&left) {
        Some(p) => Ok(Atom::Predicate(p)),
        None => Err(parser.error(format!("`{}` is not a predicate", left))),
    }
}

fn comparison_op(token: &Token) -> Option<CompareOp> {
    let op = match token {
        Token::Op("=") => CompareOp::Unify,
        Token::Op("\\=") => CompareOp::NotUnify,
        Token::Op("==") => CompareOp::Identical,
        Token::Op("\\==") => CompareOp::NotIdentical,
        Token::Op("@<") => CompareOp::Before,
        Token::Op("@=<") | Token::Op("@<=") => CompareOp::BeforeEq,
        Token::Op("@>") => CompareOp::After,
        Token::Op("@>=") => CompareOp::AfterEq,
        Token::Op("=:=") => CompareOp::ArithEq,
        Token::Op("=\\=") => CompareOp::ArithNe,
        Token::Op("<") => CompareOp::Less,
        Token::Op("=<") | Token::Op("<=") => CompareOp::LessEq,
        Token::Op(">") => CompareOp::Greater,
        Token::Op(">=") => CompareOp::GreaterEq,
        Token::Atom(name) if name == "is" => CompareOp::Is,
        _ => return None,
    };
    Some(op)
}

fn expr_to_predicate(expr: &Expr) -> Option<Predicate> {
    match expr {
        Expr::Term(term) => term_to_predicate(term.clone()),
        Expr::Call(f, arg) => arg
            .as_term()
            .map(|t| Predicate::new(f.name(), vec![t.clone()])),
        _ => None,
    }
}

fn term_to_predicate(term: Term) -> Option<Predicate> {
    match term {
        Term::Constant(Constant::Symbol(name)) => Some(Predicate::new(name, Vec::new())),
        Term::Compound(name, args) => Some(Predicate::new(name, args)),
        _ => None,
    }
}

fn parse_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut left = parse_product(parser)?;
    loop {
        let op = match parser.current {
            Token::Op("+") => BinOp::Add,
            Token::Op("-") => BinOp::Sub,
            _ => return Ok(left),
        };
        parser.advance()?;
        let right = parse_product(parser)?;
        left = Expr::binary(op, left, right);
    }
}

fn parse_product(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut left = parse_power(parser)?;
    loop {
        let op = match &parser.current {
            Token::Op("*") => BinOp::Mul,
            Token::Op("/") => BinOp::Div,
            Token::Op("//") => BinOp::IntDiv,
            Token::Atom(name) if name == "mod" => BinOp::Mod,
            _ => return Ok(left),
        };
        parser.advance()?;
        let right = parse_power(parser)?;
        left = Expr::binary(op, left, right);
    }
}

/// `**` groups to the right.
fn parse_power(parser: &mut Parser) -> Result<Expr, ParseError> {
    let base = parse_unary(parser)?;
    if parser.eat(&Token::Op("**"))? {
        let exponent = parse_power(parser)?;
        return Ok(Expr::binary(BinOp::Pow, base, exponent));
    }
    Ok(base)
}

fn parse_unary(parser: &mut Parser) -> Result<Expr, ParseError> {
    if parser.current != Token::Op("-") {
        return parse_primary(parser);
    }
    match parser.peek()? {
        Token::Int(_) | Token::Float(_) => Ok(Expr::Term(parse_term(parser)?)),
        _ => {
            parser.advance()?;
            Ok(Expr::Neg(Box::new(parse_unary(parser)?)))
        }
    }
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, ParseError> {
    if parser.eat(&Token::LParen)? {
        let inner = parse_expr(parser)?;
        parser.expect(Token::RParen)?;
        return Ok(inner);
    }
    let function = match &parser.current {
        Token::Atom(name) => MathFn::from_name(name),
        _ => None,
    };
    if let Some(f) = function {
        if parser.peek()? == Token::LParen {
            parser.advance()?;
            parser.advance()?;
            let arg = parse_expr(parser)?;
            parser.expect(Token::RParen)?;
            return Ok(Expr::Call(f, Box::new(arg)));
        }
    }
    Ok(Expr::Term(parse_term(parser)?))
}

fn parse_term(parser: &mut Parser) -> Result<Term, ParseError> {
    match parser.current.clone() {
        Token::Variable(name) => {
            parser.advance()?;
            if name == "_" {
                parser.anonymous += 1;
                Ok(Term::Var(Var::with_tally("_", parser.anonymous)))
            } else {
                Ok(Term::var(name))
            }
        }
        Token::Int(n) => {
            parser.advance()?;
            Ok(Term::int(n))
        }
        Token::Float(x) => {
            parser.advance()?;
            Ok(Term::float(x))
        }
        Token::StringLit(s) => {
            parser.advance()?;
            Ok(Term::constant(s))
        }
        Token::Atom(name) => {
            parser.advance()?;
            if parser.eat(&Token::LParen)? {
                let args = parse_terms_until(parser, Token::RParen)?;
                parser.expect(Token::RParen)?;
                Ok(Term::app(name, args))
            } else {
                Ok(Term::constant(name))
            }
        }
        Token::LBracket => {
            parser.advance()?;
            let items = parse_terms_until(parser, Token::RBracket)?;
            let tail = if parser.eat(&Token::Bar)? {
                Some(parse_term(parser)?)
            } else {
                None
            };
            parser.expect(Token::RBracket)?;
            Ok(Term::list(items, tail))
        }
        Token::Op(op @ ("+" | "-" | "#")) => {
            parser.advance()?;
            match parser.current.clone() {
                Token::Int(n) if op == "-" => {
                    parser.advance()?;
                    n.checked_neg()
                        .map(Term::int)
                        .ok_or_else(|| parser.error("integer out of range"))
                }
                Token::Float(x) if op == "-" => {
                    parser.advance()?;
                    Ok(Term::float(-x))
                }
                Token::Atom(type_name) => {
                    parser.advance()?;
                    let sign = match op {
                        "+" => Sign::Input,
                        "-" => Sign::Output,
                        _ => Sign::Constant,
                    };
                    Ok(Term::placeholder(sign, type_name))
                }
                other => Err(parser.error(format!("unexpected {:?} after '{}'", other, op))),
            }
        }
        other => Err(parser.error(format!("expected a term, found {:?}", other))),
    }
}

/// Comma-separated terms, possibly none, stopping before `close` or `|`.
fn parse_terms_until(parser: &mut Parser, close: Token) -> Result<Vec<Term>, ParseError> {
    let mut terms = Vec::new();
    if parser.current == close || parser.current == Token::Bar {
        return Ok(terms);
    }
    terms.push(parse_term(parser)?);
    while parser.eat(&Token::Comma)? {
        terms.push(parse_term(parser)?);
    }
    Ok(terms)
}
