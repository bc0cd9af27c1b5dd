//! Error types for the filter parser and evaluator.

use thiserror::Error;

use crate::models::DueParseError;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while parsing or evaluating a filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// An unexpected token was encountered during parsing.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
        /// Byte offset of the token in the input.
        position: usize,
    },

    /// The expression ended where an operand was required.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// An unclosed parenthesis was found.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    /// A `@` or `#` prefix had no name after it.
    #[error("missing name after '{prefix}'")]
    EmptyName {
        /// The prefix character.
        prefix: char,
    },

    /// A quoted name was not terminated.
    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A phrase is neither a priority nor a recognized date form.
    #[error("unrecognized date or keyword: {value}")]
    UnknownDateToken {
        /// The phrase as written.
        value: String,
    },

    /// A phrase has a recognized date form but names no real date or time.
    #[error("invalid date: {value}")]
    InvalidDate {
        /// The phrase as written.
        value: String,
    },

    /// An item's stored due date could not be interpreted.
    #[error(transparent)]
    InvalidDue(#[from] DueParseError),
}

impl FilterError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    /// Creates an unknown date token error.
    pub fn unknown_date_token(value: impl Into<String>) -> Self {
        FilterError::UnknownDateToken {
            value: value.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        FilterError::InvalidDate {
            value: value.into(),
        }
    }
}
