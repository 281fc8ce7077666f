//! # serde_jsrs
//!
//! A Serde-compatible library for a JavaScript-flavoured record format: a
//! superset of JSON meant for data exchange between services.
//!
//! ## The format
//!
//! Compared to JSON, record text allows:
//!
//! - bare object keys (`{name:'Marcus'}`) and single-quoted strings;
//! - `undefined`, distinct from `null`, and array holes (`[1,,3]`);
//! - `//` line comments and `/* */` block comments;
//! - extra escapes: `\a \v \0 \xHH \u{H...}`;
//! - hexadecimal, octal and binary numbers (`0xff`, `0o17`, `0b101`) plus
//!   `Infinity` and `NaN`.
//!
//! Output is always compact: no whitespace, single quotes around strings, bare
//! keys where possible. Dates are written as quoted ISO-8601 strings.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_jsrs = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_jsrs::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     nickname: Option<String>,
//! }
//!
//! let person = Person { name: "Marcus".to_string(), age: 42, nickname: None };
//!
//! let text = to_string(&person).unwrap();
//! assert_eq!(text, "{name:'Marcus',age:42}");
//!
//! let back: Person = from_str(&text).unwrap();
//! assert_eq!(person, back);
//! ```
//!
//! ### Dynamic values
//!
//! ```rust
//! use serde_jsrs::{parse, stringify, Value};
//!
//! let value = parse("{ /* who */ name: \"Marcus\", scores: [1,,3] }").unwrap();
//! let scores = value.as_object().unwrap().get("scores").unwrap();
//! assert_eq!(scores.as_array().unwrap()[1], Value::Undefined);
//!
//! assert_eq!(stringify(&value), "{name:'Marcus',scores:[1,,3]}");
//! ```
//!
//! ### Building values with `record!`
//!
//! ```rust
//! use serde_jsrs::record;
//!
//! let value = record!({ "name": "Marcus", "tags": ["a", undefined, "b"] });
//! assert_eq!(value.to_string(), "{name:'Marcus',tags:['a',,'b']}");
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`Error`]. Its [`category`](Error::category) tells the
//! classic type/syntax distinction apart: an unrecognised token is a
//! [`ErrorCategory::TypeError`], while malformed structure (missing commas,
//! unterminated literals, bad escapes, trailing data) is a
//! [`ErrorCategory::SyntaxError`].
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: one `debug` record per parse or
//! stringify call and `trace` output from the preprocessing pass. Nothing is
//! emitted unless the application installs a logger.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - typed round trip of a person record
//! - **`dynamic_values.rs`** - parsing, inspecting and building [`Value`]s
//!
//! Run one with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod escape;
pub mod macros;
pub mod map;
pub mod options;
pub mod preprocess;
pub mod ser;
pub mod value;

pub use de::{from_value, parse, parse_with_options, sniff, Deserializer, Parser, ValueKind};
pub use error::{Error, ErrorCategory, Result};
pub use map::RecordMap;
pub use options::ParseOptions;
pub use preprocess::preprocess;
pub use ser::{format_number, stringify, to_value, Serializer, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to record text.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(text, "{x:1,y:-2}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g. a map with
/// boolean keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(stringify(&to_value(value)?))
}

/// Serialize any `T: Serialize` as record text into a writer.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![Some(1), None, Some(3)]).unwrap();
/// assert_eq!(buffer, b"[1,,3]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from record text.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{ x: 1, 'y': 0x10 }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 16 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a valid record or its shape does not
/// match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?)
}

/// Deserialize an instance of type `T` from record text with custom parse options.
///
/// # Errors
///
/// See [`from_str`]; additionally fails when nesting exceeds the configured depth.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &ParseOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_with_options(s, options)?)
}

/// Deserialize an instance of type `T` from an I/O stream of record text.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::from_reader;
/// use std::io::Cursor;
///
/// let values: Vec<f64> = from_reader(Cursor::new(b"[1.5, 2]")).unwrap();
/// assert_eq!(values, vec![1.5, 2.0]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or the text
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader.read_to_string(&mut string).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => Error::argument(&e.to_string()),
        _ => Error::io(&e.to_string()),
    })?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of record text.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::from_slice;
///
/// let flag: bool = from_slice(b"true").unwrap();
/// assert!(flag);
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid record,
/// or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::argument(&e.to_string()))?;
    from_str(s)
}
