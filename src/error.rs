//! Error types for record parsing and serialization.
//!
//! Parsing reports one of three grammar-level failures:
//!
//! - **Invalid type**: the next token cannot be classified as any value kind
//! - **Syntax errors**: structural violations such as a missing comma, an
//!   unterminated string/array/object, or trailing data after a complete value
//! - **Escape errors**: malformed `\x`/`\u` escapes or invalid code points
//!
//! Every grammar error carries the byte offset into the *preprocessed* buffer
//! (the input with comments and insignificant whitespace removed).
//!
//! Host bindings usually need to map these onto their own exception classes;
//! [`Error::category`] gives the coarse class (`TypeError` vs `SyntaxError`).
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsrs::{parse, Error, ErrorCategory};
//!
//! let err = parse("{a:1 b:2}").unwrap_err();
//! assert!(matches!(err, Error::Syntax { .. }));
//! assert_eq!(err.category(), ErrorCategory::SyntaxError);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing or serializing records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The leading character of a value matches no grammar production.
    #[error("Invalid type at offset {offset}: {msg}")]
    InvalidType { offset: usize, msg: String },

    /// A grammar rule was violated.
    #[error("Syntax error at offset {offset}: {msg}")]
    Syntax { offset: usize, msg: String },

    /// A string escape sequence could not be decoded.
    #[error("Invalid escape sequence at offset {offset}: {msg}")]
    Escape { offset: usize, msg: String },

    /// Arrays and objects were nested deeper than the configured limit.
    #[error("Nesting depth limit of {limit} exceeded at offset {offset}")]
    DepthLimitExceeded { offset: usize, limit: usize },

    /// Misuse at a host boundary (wrong argument count or type).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse error class, matching the exception a script host would raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    TypeError,
    SyntaxError,
    Error,
}

impl Error {
    /// Creates a classification error for an unrecognized leading token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsrs::Error;
    ///
    /// let err = Error::invalid_type(3, "unexpected character '#'");
    /// assert!(err.to_string().contains("offset 3"));
    /// ```
    pub fn invalid_type(offset: usize, msg: &str) -> Self {
        Error::InvalidType {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error at the given offset of the preprocessed buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsrs::Error;
    ///
    /// let err = Error::syntax(10, "missing comma in object");
    /// assert!(err.to_string().contains("missing comma"));
    /// ```
    pub fn syntax(offset: usize, msg: &str) -> Self {
        Error::Syntax {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an escape-decoding error.
    pub fn escape(offset: usize, msg: &str) -> Self {
        Error::Escape {
            offset,
            msg: msg.to_string(),
        }
    }

    pub fn depth_limit(offset: usize, limit: usize) -> Self {
        Error::DepthLimitExceeded { offset, limit }
    }

    /// Creates an argument error for binding layers that validate call arity or types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsrs::{Error, ErrorCategory};
    ///
    /// let err = Error::argument("Wrong number of arguments");
    /// assert_eq!(err.category(), ErrorCategory::TypeError);
    /// ```
    pub fn argument(msg: &str) -> Self {
        Error::Argument(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the offset into the preprocessed buffer, if this is a grammar error.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::InvalidType { offset, .. }
            | Error::Syntax { offset, .. }
            | Error::Escape { offset, .. }
            | Error::DepthLimitExceeded { offset, .. } => Some(*offset),
            Error::Argument(_) | Error::Io(_) | Error::Custom(_) => None,
        }
    }

    /// Returns the host exception class this error maps to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidType { .. } | Error::Argument(_) => ErrorCategory::TypeError,
            Error::Syntax { .. } | Error::Escape { .. } | Error::DepthLimitExceeded { .. } => {
                ErrorCategory::SyntaxError
            }
            Error::Io(_) | Error::Custom(_) => ErrorCategory::Error,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::invalid_type(0, "x").category(),
            ErrorCategory::TypeError
        );
        assert_eq!(Error::syntax(0, "x").category(), ErrorCategory::SyntaxError);
        assert_eq!(Error::escape(0, "x").category(), ErrorCategory::SyntaxError);
        assert_eq!(
            Error::depth_limit(0, 4).category(),
            ErrorCategory::SyntaxError
        );
        assert_eq!(Error::custom("x").category(), ErrorCategory::Error);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Error::syntax(7, "trailing data").offset(), Some(7));
        assert_eq!(Error::argument("arity").offset(), None);
    }
}
