//! Configuration options for record parsing.
//!
//! The textual format itself has no knobs: serialization output is fixed.
//! Parsing is recursive descent, so the only tunable is how deeply arrays and
//! objects may nest before the parser gives up instead of growing the stack.
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsrs::{parse_with_options, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_depth(2);
//! assert!(parse_with_options("[[1]]", &options).is_ok());
//! assert!(parse_with_options("[[[1]]]", &options).is_err());
//! ```

/// Default nesting limit for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for [`parse_with_options`](crate::parse_with_options).
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, Some(128));
///
/// let options = ParseOptions::new().unlimited_depth();
/// assert_eq!(options.max_depth, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and objects; `None` disables the check.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParseOptions {
    /// Creates default options (nesting limited to 128 levels).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth of arrays and objects.
    ///
    /// A depth of 1 admits a flat array or object; 0 admits only scalars.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Removes the nesting limit. Deeply nested input can then exhaust the stack.
    #[must_use]
    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }
}
