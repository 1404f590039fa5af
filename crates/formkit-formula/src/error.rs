//! Formula errors. Offsets are byte offsets into the formula source.

use thiserror::Error;

/// Why a formula could not be parsed or evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// The formula is empty or whitespace.
    #[error("formula is empty")]
    Empty,

    /// A character outside the formula alphabet.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Where it occurs.
        offset: usize,
    },

    /// A numeric literal that does not parse.
    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber {
        /// The literal text.
        text: String,
        /// Where it starts.
        offset: usize,
    },

    /// A token the grammar does not allow at this position.
    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// Where it starts.
        offset: usize,
    },

    /// The formula ended in the middle of an expression.
    #[error("unexpected end of formula")]
    UnexpectedEnd,

    /// Parentheses or unary operators nest deeper than the parser allows.
    #[error("formula nests deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
    },

    /// A name that is not a declared parent of the field.
    #[error("undefined variable {name}")]
    UndefinedVariable {
        /// The name as written.
        name: String,
    },

    /// A parent whose current value has no numeric reading.
    #[error("parent field {name} does not hold a number")]
    NonNumericOperand {
        /// The parent id.
        name: String,
    },

    /// An operation produced infinity or NaN (e.g. division by zero).
    #[error("{op} produced a non-finite result")]
    NonFinite {
        /// The operation, as written.
        op: char,
    },

    /// The formula evaluated to infinity or NaN without any single
    /// operation overflowing, e.g. through a non-finite parent value.
    #[error("formula produced a non-finite result")]
    NonFiniteResult,
}
