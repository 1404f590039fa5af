//! # formkit-formula — Derivation Engine
//!
//! Computes derived field values from their parent fields.
//!
//! ## Pipeline
//!
//! ```text
//! "price * qty + 2"  ──lexer──▶  tokens  ──parser──▶  Expr  ──eval──▶  f64
//! ```
//!
//! Formulas are arithmetic only: numbers, parent field ids, `+ - * /`,
//! unary minus, and parentheses. There is no other syntax and nothing is
//! executed, so every failure mode is a [`FormulaError`] variant.
//!
//! Variables are resolved as whole tokens against the derived field's
//! declared parents. `price` never matches inside `unit_price`.
//!
//! ## Failure Policy
//!
//! [`resolve`] never fails: a formula that does not parse, references an
//! undeclared name, reads a non-numeric parent, or produces a non-finite
//! number falls back to the field's default value. [`evaluate_derived`]
//! exposes the underlying error for diagnostics.
//!
//! ## Propagation
//!
//! [`propagate`] recomputes every derived field from current values until
//! nothing changes. Parents are never derived, so one pass settles all
//! derived values and a second pass confirms it.

pub mod derive;
pub mod error;
pub mod lexer;
pub mod parser;

pub use derive::{evaluate_derived, propagate, resolve};
pub use error::FormulaError;
pub use parser::{BinaryOp, Expr, Formula};
