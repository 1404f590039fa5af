//! # Formula Parser and Evaluator
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := ('+' | '-') factor | primary
//! primary := NUMBER | IDENT | '(' expr ')'
//! ```
//!
//! Binary operators are left-associative. Nesting through parentheses and
//! unary signs is capped at [`MAX_DEPTH`].

use std::collections::BTreeSet;
use std::fmt;

use crate::error::FormulaError;
use crate::lexer::{tokenize, Spanned, Token};

/// Deepest nesting the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
        }
    }
}

/// Parsed formula syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                out.insert(name.as_str());
            }
            Self::Negate(inner) => inner.collect_variables(out),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
        }
    }

    fn eval<F>(&self, lookup: &F) -> Result<f64, FormulaError>
    where
        F: Fn(&str) -> Result<f64, FormulaError>,
    {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Variable(name) => lookup(name),
            Self::Negate(inner) => Ok(-inner.eval(lookup)?),
            Self::Binary { op, lhs, rhs } => {
                let result = op.apply(lhs.eval(lookup)?, rhs.eval(lookup)?);
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::NonFinite { op: op.symbol() })
                }
            }
        }
    }
}

/// A parsed arithmetic formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse `source`.
    ///
    /// # Errors
    ///
    /// Any lexical or grammatical error, including an empty formula and
    /// tokens left over after a complete expression.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.expr()?;
        if let Some(extra) = parser.peek() {
            return Err(unexpected(extra));
        }
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// The formula text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Every name the formula references, deduplicated.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.expr.collect_variables(&mut out);
        out
    }

    /// Evaluate with `lookup` supplying the value of each name.
    ///
    /// # Errors
    ///
    /// Whatever `lookup` returns, [`FormulaError::NonFinite`] if an
    /// operation yields infinity or NaN, or [`FormulaError::NonFiniteResult`]
    /// if the final value is not finite.
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, FormulaError>
    where
        F: Fn(&str) -> Result<f64, FormulaError>,
    {
        let result = self.expr.eval(&lookup)?;
        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::NonFiniteResult)
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn unexpected(spanned: &Spanned<'_>) -> FormulaError {
    FormulaError::UnexpectedToken {
        found: spanned.token.to_string(),
        offset: spanned.offset,
    }
}

struct Parser<'t, 'src> {
    tokens: &'t [Spanned<'src>],
    pos: usize,
    depth: usize,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn peek(&self) -> Option<&'t Spanned<'src>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Spanned<'src>> {
        let spanned = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(spanned)
    }

    fn descend(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.peek().and_then(|s| match s.token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        }) {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        while let Some(op) = self.peek().and_then(|s| match s.token {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            _ => None,
        }) {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        match self.peek().map(|s| s.token) {
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.factor()?;
                self.depth -= 1;
                Ok(Expr::Negate(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.factor()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let spanned = self.next().ok_or(FormulaError::UnexpectedEnd)?;
        match spanned.token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => Ok(Expr::Variable(name.to_string())),
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(unexpected(other)),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            _ => Err(unexpected(spanned)),
        }
    }
}
