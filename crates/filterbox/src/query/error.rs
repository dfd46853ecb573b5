//! Error types for the query parser.

use thiserror::Error;

/// A specialized Result type for query parsing operations.
pub type ParseResult<T> = Result<T, ParsedError>;

/// A syntax error in a filter query.
///
/// Every variant carries the byte offset of the offending token so front ends
/// can point at it. Parsing stops at the first error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParsedError {
    /// A token that cannot appear at this point of the query.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The source text of the token.
        token: String,
        /// Byte offset of the token.
        position: usize,
    },

    /// The query ended while more input was required.
    #[error("unexpected end of query, expected {expected}")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: &'static str,
        /// Byte offset of the end of input.
        position: usize,
    },

    /// An opening parenthesis was never closed.
    #[error("unclosed parenthesis at position {position}")]
    UnclosedParenthesis {
        /// Byte offset of the `(`.
        position: usize,
    },

    /// A closing parenthesis without a matching `(`.
    #[error("unmatched closing parenthesis at position {position}")]
    UnmatchedParenthesis {
        /// Byte offset of the `)`.
        position: usize,
    },

    /// Parenthesis nesting exceeded the parser's recursion limit.
    #[error("expression nested deeper than {max_depth} levels at position {position}")]
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
        /// Byte offset of the `(` that crossed the limit.
        position: usize,
    },
}

impl ParsedError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        ParsedError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    /// Creates an unexpected end of input error.
    pub fn unexpected_end(expected: &'static str, position: usize) -> Self {
        ParsedError::UnexpectedEndOfInput { expected, position }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the byte offset the error refers to.
    pub fn position(&self) -> usize {
        match self {
            ParsedError::UnexpectedToken { position, .. }
            | ParsedError::UnexpectedEndOfInput { position, .. }
            | ParsedError::UnclosedParenthesis { position }
            | ParsedError::UnmatchedParenthesis { position }
            | ParsedError::NestingTooDeep { position, .. } => *position,
        }
    }
}
