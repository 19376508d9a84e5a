//! Error types for Skopik parsing and tree manipulation.
//!
//! Every failure the parser can hit is fatal for the document being parsed:
//! callers either get a complete root [`Scope`](crate::Scope) or exactly one
//! [`Error`]. The only local recovery happens for single literals the parser
//! cannot make sense of, which degrade to `null` with a logged warning
//! instead of producing an error.
//!
//! ## Error Categories
//!
//! - **Lexical errors**: unterminated strings and block comments
//! - **Literal errors**: malformed numeric literals such as `1.2.3` or `0x`
//! - **Structural errors**: mismatched brackets, bad statements, truncated input
//! - **Invariant violations**: tuple kind mismatches, out-of-order array indices
//!
//! ## Examples
//!
//! ```rust
//! use skopik::{parse_str, Error};
//!
//! let err = parse_str("bad = 1..2").unwrap_err();
//! assert!(matches!(err, Error::MalformedNumber { line: 1, .. }));
//! assert_eq!(err.line(), Some(1));
//! ```

use crate::value::Kind;
use std::fmt;
use thiserror::Error;

/// Represents every error that can occur while parsing or building a Skopik tree.
///
/// Variants raised during a parse carry the 1-based line they were detected on.
/// Errors raised directly by container operations (outside of a parse) use line 0.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error while reading the source
    #[error("IO error: {0}")]
    Io(String),

    /// Unterminated string or comment, or a stray comment marker
    #[error("Lexical error at line {line}: {msg}")]
    Lex { line: usize, msg: String },

    /// A numeric-looking token that breaks the number grammar or does not fit its kind
    #[error("Malformed number literal '{token}' at line {line}: {msg}")]
    MalformedNumber {
        line: usize,
        token: String,
        msg: String,
    },

    /// A tuple element whose kind differs from the tuple's first element
    #[error("Tuple type mismatch at line {line}: expected {expected}, found {found}")]
    TupleTypeMismatch {
        line: usize,
        expected: Kind,
        found: Kind,
    },

    /// An explicit array index that is negative or not above the highest index so far
    #[error("Array index {index} at line {line} is out of order: next free index is {next}")]
    ArrayIndexOrder { line: usize, index: i64, next: usize },

    /// A statement that cannot be read, e.g. `name :` not followed by a block
    #[error("Malformed statement at line {line}: {msg}")]
    MalformedStatement { line: usize, msg: String },

    /// A structural token that does not fit the block currently open
    #[error("Unexpected '{token}' at line {line}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        token: String,
        expected: String,
    },

    /// Input ended while a block was still open
    #[error("Unexpected end of input at line {line}, expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    /// A statement or element was attached to a value that cannot hold it
    #[error("A {kind} cannot hold {what} (line {line})")]
    UnsupportedParent {
        line: usize,
        kind: Kind,
        what: &'static str,
    },

    /// A reference to something that is not a child of the given scope
    #[error("Invalid reference: {0}")]
    Reference(String),

    /// Custom error, mostly raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::Error;
    ///
    /// let err = Error::lex(3, "unterminated string");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn lex(line: usize, msg: impl Into<String>) -> Self {
        Error::Lex {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a malformed number error for `token`.
    pub fn malformed_number(line: usize, token: &str, msg: impl Into<String>) -> Self {
        Error::MalformedNumber {
            line,
            token: token.to_string(),
            msg: msg.into(),
        }
    }

    /// Creates a malformed statement error.
    pub fn malformed_statement(line: usize, msg: impl Into<String>) -> Self {
        Error::MalformedStatement {
            line,
            msg: msg.into(),
        }
    }

    /// Creates an unexpected token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skopik::Error;
    ///
    /// let err = Error::unexpected_token(7, "]", "'}'");
    /// assert!(err.to_string().contains("expected '}'"));
    /// ```
    pub fn unexpected_token(line: usize, token: &str, expected: &str) -> Self {
        Error::UnexpectedToken {
            line,
            token: token.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            expected: expected.to_string(),
        }
    }

    /// Creates an error for a reference that cannot be resolved.
    pub fn reference(msg: impl Into<String>) -> Self {
        Error::Reference(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the source line the error was detected on, if it has one.
    ///
    /// Line 0 means the error came from a container operation outside of a parse.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lex { line, .. }
            | Error::MalformedNumber { line, .. }
            | Error::TupleTypeMismatch { line, .. }
            | Error::ArrayIndexOrder { line, .. }
            | Error::MalformedStatement { line, .. }
            | Error::UnexpectedToken { line, .. }
            | Error::UnexpectedEof { line, .. }
            | Error::UnsupportedParent { line, .. } => Some(*line),
            Error::Io(_) | Error::Reference(_) | Error::Custom(_) => None,
        }
    }

    /// Rebinds the line of a located error, used when a container operation
    /// fails in the middle of a parse.
    #[must_use]
    pub fn at_line(mut self, at: usize) -> Self {
        match &mut self {
            Error::Lex { line, .. }
            | Error::MalformedNumber { line, .. }
            | Error::TupleTypeMismatch { line, .. }
            | Error::ArrayIndexOrder { line, .. }
            | Error::MalformedStatement { line, .. }
            | Error::UnexpectedToken { line, .. }
            | Error::UnexpectedEof { line, .. }
            | Error::UnsupportedParent { line, .. } => *line = at,
            Error::Io(_) | Error::Reference(_) | Error::Custom(_) => {}
        }
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_located_errors() {
        assert_eq!(Error::lex(4, "x").line(), Some(4));
        assert_eq!(Error::malformed_number(2, "1..2", "x").line(), Some(2));
        assert_eq!(Error::custom("x").line(), None);
        assert_eq!(Error::reference("x").line(), None);
    }

    #[test]
    fn test_at_line_rebinds_container_errors() {
        let err = Error::TupleTypeMismatch {
            line: 0,
            expected: Kind::Int32,
            found: Kind::String,
        };
        let err = err.at_line(9);
        assert_eq!(err.line(), Some(9));
        assert!(err.to_string().contains("expected Int32, found String"));

        let err = Error::custom("untouched").at_line(9);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_messages_name_the_token() {
        let err = Error::malformed_number(1, "0x", "hexadecimal literal has no digits");
        let msg = err.to_string();
        assert!(msg.contains("'0x'"));
        assert!(msg.contains("line 1"));
    }
}
