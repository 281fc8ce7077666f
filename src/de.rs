//! Record parsing.
//!
//! This module turns record text into a [`Value`] and, through the
//! [`Deserializer`], into any `T: Deserialize`.
//!
//! ## Overview
//!
//! Parsing runs in two passes:
//!
//! 1. [`preprocess`](crate::preprocess) strips comments and whitespace outside
//!    string literals.
//! 2. A recursive-descent [`Parser`] walks the compact buffer. At every value
//!    position [`sniff`] looks at the current byte to pick one of seven
//!    productions, and each production reports how many bytes it consumed.
//!
//! The whole buffer must be consumed by the top-level value; anything left
//! over is a syntax error.
//!
//! ## Usage
//!
//! ```rust
//! use serde_jsrs::{parse, Value};
//!
//! let value = parse("[1,,3]").unwrap();
//! assert_eq!(
//!     value,
//!     Value::Array(vec![Value::from(1), Value::Undefined, Value::from(3)])
//! );
//! ```
//!
//! Typed deserialization goes through the crate-level functions:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = serde_jsrs::from_str("{x:1,y:2}").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::escape::unescape_at;
use crate::preprocess::{preprocess, TOKEN_BOUNDARY};
use crate::value::iso_date;
use crate::{Error, ParseOptions, RecordMap, Result, Value};
use serde::de::{self, IntoDeserializer, Unexpected};
use serde::forward_to_deserialize_any;

/// The grammar production a value is read and written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

/// Classifies the value starting at the front of `input`.
///
/// Only the first byte is inspected, except for `null` and `undefined` whose
/// full literal must be present. A `,` or `]` denotes an implicit
/// `undefined` (an array hole). Returns `None` when nothing matches.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{sniff, ValueKind};
///
/// assert_eq!(sniff(b"{a:1}"), Some(ValueKind::Object));
/// assert_eq!(sniff(b",3]"), Some(ValueKind::Undefined));
/// assert_eq!(sniff(b"-1"), Some(ValueKind::Number));
/// assert_eq!(sniff(b"nul"), None);
/// assert_eq!(sniff(b"#"), None);
/// ```
#[must_use]
pub fn sniff(input: &[u8]) -> Option<ValueKind> {
    match *input.first()? {
        b',' | b']' => Some(ValueKind::Undefined),
        b'{' => Some(ValueKind::Object),
        b'[' => Some(ValueKind::Array),
        b'\'' | b'"' => Some(ValueKind::String),
        b't' | b'f' => Some(ValueKind::Boolean),
        b'n' => input.starts_with(b"null").then_some(ValueKind::Null),
        b'u' => input
            .starts_with(b"undefined")
            .then_some(ValueKind::Undefined),
        b'0'..=b'9' | b'.' | b'+' | b'-' => Some(ValueKind::Number),
        _ => None,
    }
}

/// A production result: the value and the number of bytes it consumed.
type Parsed<T> = Result<(T, usize)>;

/// Recursive-descent parser over a preprocessed buffer.
///
/// Every production takes the index it starts at and returns the value
/// together with its consumed length, so the caller advances its own cursor.
pub struct Parser<'a> {
    input: &'a [u8],
    max_depth: Option<usize>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over an already preprocessed buffer.
    pub fn new(input: &'a [u8], options: &ParseOptions) -> Self {
        Parser {
            input,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Parses exactly one value that must span the whole buffer.
    pub fn parse_document(&mut self) -> Result<Value> {
        let (value, consumed) = self.parse_value(0)?;
        if consumed != self.input.len() {
            return Err(Error::syntax(consumed, "Invalid format: trailing data"));
        }
        Ok(value)
    }

    /// Sniffs the value at `pos` and runs the matching production.
    pub fn parse_value(&mut self, pos: usize) -> Parsed<Value> {
        let kind = sniff(&self.input[pos..]).ok_or_else(|| self.unclassified(pos))?;
        match kind {
            ValueKind::Undefined => self.parse_undefined(pos),
            ValueKind::Null => self.parse_null(pos),
            ValueKind::Boolean => self.parse_bool(pos),
            ValueKind::Number => self.parse_number(pos),
            ValueKind::String => {
                let (s, consumed) = self.parse_string(pos)?;
                Ok((Value::String(s), consumed))
            }
            ValueKind::Array => self.parse_array(pos),
            ValueKind::Object => self.parse_object(pos),
        }
    }

    fn unclassified(&self, pos: usize) -> Error {
        match self.input.get(pos) {
            None => Error::invalid_type(pos, "Unexpected end of input"),
            Some(&b) if b.is_ascii_graphic() => {
                Error::invalid_type(pos, &format!("Unexpected character '{}'", b as char))
            }
            Some(&b) => Error::invalid_type(pos, &format!("Unexpected byte 0x{:02x}", b)),
        }
    }

    fn rest(&self, pos: usize) -> &'a [u8] {
        &self.input[pos.min(self.input.len())..]
    }

    fn enter(&mut self, pos: usize) -> Result<()> {
        self.depth += 1;
        match self.max_depth {
            Some(limit) if self.depth > limit => Err(Error::depth_limit(pos, limit)),
            _ => Ok(()),
        }
    }

    fn parse_undefined(&mut self, pos: usize) -> Parsed<Value> {
        match self.input.get(pos) {
            // Implicit hole: nothing is consumed, the delimiter belongs to the array.
            Some(b',') | Some(b']') => Ok((Value::Undefined, 0)),
            _ if self.rest(pos).starts_with(b"undefined") => Ok((Value::Undefined, 9)),
            _ => Err(Error::invalid_type(
                pos,
                "Invalid format of undefined value",
            )),
        }
    }

    fn parse_null(&mut self, pos: usize) -> Parsed<Value> {
        if self.rest(pos).starts_with(b"null") {
            Ok((Value::Null, 4))
        } else {
            Err(Error::invalid_type(pos, "Invalid format of null value"))
        }
    }

    fn parse_bool(&mut self, pos: usize) -> Parsed<Value> {
        let rest = self.rest(pos);
        if rest.starts_with(b"true") {
            Ok((Value::Bool(true), 4))
        } else if rest.starts_with(b"false") {
            Ok((Value::Bool(false), 5))
        } else {
            Err(Error::invalid_type(pos, "Invalid format: expected boolean"))
        }
    }

    /// Scans up to the next delimiter and converts the longest numeric prefix.
    ///
    /// The span is not validated: `12abc` reads as `12` and `abc` as `0`.
    /// Changing that would change which documents are accepted, so the
    /// leniency stays even though it is surprising.
    fn parse_number(&mut self, pos: usize) -> Parsed<Value> {
        let span_len = self
            .rest(pos)
            .iter()
            .position(|&b| matches!(b, b',' | b'}' | b']') || b == TOKEN_BOUNDARY)
            .unwrap_or(self.input.len() - pos);
        let span = &self.input[pos..pos + span_len];
        if is_legacy_octal(span) {
            return Err(Error::syntax(pos, "Invalid number: legacy octal literal"));
        }
        Ok((Value::Number(number_prefix(span)), span_len))
    }

    /// Reads a quoted string; `pos` must point at the opening quote.
    pub fn parse_string(&mut self, pos: usize) -> Parsed<String> {
        let quote = self.input[pos];
        let mut bytes = Vec::new();
        let mut i = pos + 1;
        loop {
            match self.input.get(i) {
                None => return Err(Error::syntax(pos, "Error while parsing string: unterminated")),
                Some(&b) if b == quote => break,
                Some(b'\\') => {
                    let consumed = unescape_at(self.input, i + 1, &mut bytes)?;
                    i += 1 + consumed;
                }
                Some(&b) => {
                    bytes.push(b);
                    i += 1;
                }
            }
        }

        // `\xNN` may leave invalid UTF-8 behind; such bytes become U+FFFD.
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(&err.into_bytes()).into_owned(),
        };
        Ok((text, i + 1 - pos))
    }

    fn parse_array(&mut self, pos: usize) -> Parsed<Value> {
        self.enter(pos)?;
        if self.input.get(pos + 1) == Some(&b']') {
            self.depth -= 1;
            return Ok((Value::Array(Vec::new()), 2));
        }

        let mut items = Vec::new();
        let mut i = pos + 1;
        loop {
            if i >= self.input.len() {
                return Err(Error::syntax(pos, "Invalid format in array: unterminated"));
            }
            let (item, consumed) = self.parse_value(i)?;
            // Holes are kept as explicit `Undefined` elements.
            items.push(item);
            i += consumed;

            match self.input.get(i) {
                Some(b',') => i += 1,
                Some(b']') => {
                    i += 1;
                    break;
                }
                None => return Err(Error::syntax(pos, "Invalid format in array: unterminated")),
                Some(_) => return Err(Error::syntax(i, "Invalid format in array: missed comma")),
            }
        }

        self.depth -= 1;
        Ok((Value::Array(items), i - pos))
    }

    fn parse_object(&mut self, pos: usize) -> Parsed<Value> {
        self.enter(pos)?;
        let mut map = RecordMap::new();
        let mut i = pos + 1;
        loop {
            let key = match self.input.get(i) {
                None => return Err(Error::syntax(pos, "Invalid format in object: unterminated")),
                // Empty object, or a trailing comma before the brace.
                Some(b'}') => {
                    i += 1;
                    break;
                }
                Some(b'\'') | Some(b'"') => {
                    let (key, consumed) = self.parse_string(i)?;
                    i += consumed;
                    if self.input.get(i) != Some(&b':') {
                        return Err(Error::syntax(
                            i,
                            "Invalid format in object: expected ':' after key",
                        ));
                    }
                    i += 1;
                    key
                }
                Some(_) => {
                    let (key, consumed) = self.parse_bare_key(i)?;
                    i += consumed;
                    key
                }
            };

            if i >= self.input.len() {
                return Err(Error::syntax(pos, "Invalid format in object: unterminated"));
            }
            let (value, consumed) = self.parse_value(i)?;
            i += consumed;
            // Undefined members are dropped, matching the serializer's omission rule.
            if !value.is_undefined() {
                map.insert(key, value);
            }

            match self.input.get(i) {
                Some(b',') => i += 1,
                Some(b'}') => {
                    i += 1;
                    break;
                }
                None => return Err(Error::syntax(pos, "Invalid format in object: unterminated")),
                Some(_) => return Err(Error::syntax(i, "Invalid format in object: missed comma")),
            }
        }

        self.depth -= 1;
        Ok((Value::Object(map), i - pos))
    }

    /// Reads `[A-Za-z0-9_]+` followed by `:`; the consumed length includes the colon.
    fn parse_bare_key(&mut self, pos: usize) -> Parsed<String> {
        let len = self
            .rest(pos)
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        let end = pos + len;
        match self.input.get(end) {
            Some(b':') if len > 0 => {}
            Some(b':') => return Err(Error::syntax(end, "Invalid format in object: empty key")),
            Some(b'}') if len > 0 => {
                return Err(Error::syntax(end, "Invalid format in object: key without value"))
            }
            None => return Err(Error::syntax(end, "Invalid format in object: unterminated")),
            Some(_) => {
                return Err(Error::syntax(
                    end,
                    "Invalid format in object: key has invalid type",
                ))
            }
        }
        let key = self.input[pos..end].iter().map(|&b| b as char).collect();
        Ok((key, len + 1))
    }
}

/// Converts the longest numeric prefix of `span`, the way C `strtod` does.
///
/// Accepts an optional sign followed by `Infinity`/`inf`/`nan` (any case), a
/// `0x`/`0o`/`0b` radix literal, or a decimal with optional fraction and
/// exponent. A span without any numeric prefix yields `0`.
fn number_prefix(span: &[u8]) -> f64 {
    let (negative, body) = match span.first() {
        Some(b'-') => (true, &span[1..]),
        Some(b'+') => (false, &span[1..]),
        _ => (false, span),
    };

    let magnitude = special_prefix(body)
        .or_else(|| radix_prefix(body))
        .or_else(|| decimal_prefix(body));

    match magnitude {
        Some(m) if negative => -m,
        Some(m) => m,
        None => 0.0,
    }
}

/// `0` followed by another digit, as in `0123`; radix literals use `0o`.
fn is_legacy_octal(span: &[u8]) -> bool {
    let body = match span.first() {
        Some(b'-' | b'+') => &span[1..],
        _ => span,
    };
    matches!(body, [b'0', d, ..] if d.is_ascii_digit())
}

fn special_prefix(body: &[u8]) -> Option<f64> {
    let starts_with = |word: &[u8]| {
        body.len() >= word.len() && body[..word.len()].eq_ignore_ascii_case(word)
    };
    if starts_with(b"inf") {
        Some(f64::INFINITY)
    } else if starts_with(b"nan") {
        Some(f64::NAN)
    } else {
        None
    }
}

fn radix_prefix(body: &[u8]) -> Option<f64> {
    let radix = match body.get(..2)? {
        [b'0', b'x' | b'X'] => 16,
        [b'0', b'o' | b'O'] => 8,
        [b'0', b'b' | b'B'] => 2,
        _ => return None,
    };
    let mut value = None;
    for &b in &body[2..] {
        match (b as char).to_digit(radix) {
            Some(digit) => value = Some(value.unwrap_or(0.0) * f64::from(radix) + f64::from(digit)),
            None => break,
        }
    }
    // "0x" without digits falls back to the decimal "0".
    value
}

fn decimal_prefix(body: &[u8]) -> Option<f64> {
    let count_digits = |from: usize| {
        body.get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let int_digits = count_digits(0);
    let mut len = int_digits;
    let mut frac_digits = 0;
    if body.get(len) == Some(&b'.') {
        frac_digits = count_digits(len + 1);
        if int_digits + frac_digits > 0 {
            len += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(body.get(len), Some(b'e') | Some(b'E')) {
        let sign = usize::from(matches!(body.get(len + 1), Some(b'+') | Some(b'-')));
        let exp_digits = count_digits(len + 1 + sign);
        if exp_digits > 0 {
            len += 1 + sign + exp_digits;
        }
    }

    std::str::from_utf8(&body[..len]).ok()?.parse().ok()
}

/// Parses record text into a [`Value`] with default options.
///
/// # Errors
///
/// - [`Error::InvalidType`] when a value position starts with a character no
///   production accepts (including empty input).
/// - [`Error::Syntax`] for a missing comma, an unterminated string, array or
///   object, or trailing data after a complete value.
/// - [`Error::Escape`] for a malformed escape or an invalid code point.
/// - [`Error::DepthLimitExceeded`] when nesting exceeds the default limit.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{parse, Value};
///
/// let value = parse("{ /*c*/ a : 1 // trailing\n }").unwrap();
/// assert_eq!(value.as_object().unwrap().get("a"), Some(&Value::from(1)));
///
/// assert!(parse("123 456").is_err());
/// ```
pub fn parse(text: &str) -> Result<Value> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses record text into a [`Value`] with custom options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Value> {
    let buffer = preprocess(text);
    let result = Parser::new(&buffer, options).parse_document();
    match &result {
        Ok(_) => log::debug!("parsed record of {} bytes", text.len()),
        Err(err) => log::debug!("failed to parse record of {} bytes: {}", text.len(), err),
    }
    result
}

/// Interprets a [`Value`] as an instance of type `T`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_jsrs::{from_value, parse};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Birth { date: String, place: String }
///
/// let value = parse("{date:'1990-02-15T00:00:00.000Z',place:'Rome'}").unwrap();
/// let birth: Birth = from_value(value).unwrap();
/// assert_eq!(birth.place, "Rome");
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(Deserializer::new(value))
}

/// A serde deserializer over a parsed [`Value`].
pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    pub fn new(value: Value) -> Self {
        Deserializer { value }
    }

    /// Parses `input` and wraps the result.
    ///
    /// # Errors
    ///
    /// See [`parse`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        parse(input).map(Deserializer::new)
    }
}

impl Value {
    fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Value::Undefined | Value::Function => Unexpected::Option,
            Value::Null => Unexpected::Unit,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(n) => Unexpected::Float(*n),
            Value::String(s) => Unexpected::Str(s),
            Value::Array(_) => Unexpected::Seq,
            Value::Object(_) => Unexpected::Map,
            Value::Date(_) => Unexpected::Other("date"),
        }
    }
}

fn type_mismatch(value: &Value, expected: &dyn de::Expected) -> Error {
    <Error as de::Error>::invalid_type(value.unexpected(), expected)
}

/// Whole numbers in `i128` range, for integer-typed targets.
fn integral(n: f64) -> Option<i128> {
    const LIMIT: f64 = 1.7014118346046923e38; // 2^127
    if n.fract() == 0.0 && n.abs() < LIMIT {
        Some(n as i128)
    } else {
        None
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.value {
                    Value::Number(n) => match integral(n).and_then(|i| <$ty>::try_from(i).ok()) {
                        Some(i) => visitor.$visit(i),
                        None => Err(<Error as de::Error>::invalid_value(
                            Unexpected::Float(n),
                            &visitor,
                        )),
                    },
                    other => Err(type_mismatch(&other, &visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Function => visitor.visit_none(),
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visitor.visit_f64(n),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Date(dt) => visitor.visit_string(iso_date(&dt)),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null | Value::Function => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Undefined | Value::Null => visitor.visit_unit(),
            other => Err(type_mismatch(&other, &visitor)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer::new(variant, value)),
                None => Err(Error::custom("Expected enum variant")),
            },
            Value::Object(_) => Err(Error::custom(
                "Expected an object with a single variant key",
            )),
            other => Err(type_mismatch(&other, &"string or single-key object")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf seq tuple
        tuple_struct map struct identifier
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(Deserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: RecordMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(MapKeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Object keys are always text; numeric targets parse the key, so maps
/// written with number keys read back.
struct MapKeyDeserializer {
    key: String,
}

macro_rules! deserialize_numeric_key {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key.parse::<$ty>() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => Err(<Error as de::Error>::invalid_value(
                        Unexpected::Str(&self.key),
                        &visitor,
                    )),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    deserialize_numeric_key! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        bool char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Deserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null | Value::Undefined => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: &[(&str, Value)]) -> Value {
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_sniff_table() {
        assert_eq!(sniff(b"]"), Some(ValueKind::Undefined));
        assert_eq!(sniff(b"undefined"), Some(ValueKind::Undefined));
        assert_eq!(sniff(b"undef"), None);
        assert_eq!(sniff(b"null"), Some(ValueKind::Null));
        assert_eq!(sniff(b"'x'"), Some(ValueKind::String));
        assert_eq!(sniff(b"\"x\""), Some(ValueKind::String));
        assert_eq!(sniff(b"true"), Some(ValueKind::Boolean));
        assert_eq!(sniff(b"fals"), Some(ValueKind::Boolean));
        assert_eq!(sniff(b".5"), Some(ValueKind::Number));
        assert_eq!(sniff(b"+5"), Some(ValueKind::Number));
        assert_eq!(sniff(b"[]"), Some(ValueKind::Array));
        assert_eq!(sniff(b"asdf"), None);
        assert_eq!(sniff(b""), None);
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("undefined").unwrap(), Value::Undefined);
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("-3").unwrap(), Value::Number(-3.0));
        assert_eq!(parse("1e+100").unwrap(), Value::Number(1e100));
        assert_eq!(parse("'str'").unwrap(), Value::from("str"));
        assert_eq!(parse("\"str\"").unwrap(), Value::from("str"));
    }

    #[test]
    fn test_malformed_literals() {
        assert!(matches!(parse("tru"), Err(Error::InvalidType { .. })));
        assert!(matches!(parse("nul"), Err(Error::InvalidType { .. })));
        assert!(matches!(parse("asdf"), Err(Error::InvalidType { .. })));
        assert!(matches!(parse("#+"), Err(Error::InvalidType { .. })));
        assert!(matches!(parse(""), Err(Error::InvalidType { .. })));
        assert!(matches!(parse("truex"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_number_prefix_leniency() {
        assert_eq!(number_prefix(b"12abc"), 12.0);
        assert_eq!(number_prefix(b"abc"), 0.0);
        assert_eq!(number_prefix(b"-"), 0.0);
        assert_eq!(number_prefix(b"1.5e3x"), 1500.0);
        assert_eq!(number_prefix(b"1e"), 1.0);
        assert_eq!(number_prefix(b".5"), 0.5);
        assert_eq!(number_prefix(b"5."), 5.0);
        assert_eq!(number_prefix(b"-Infinity"), f64::NEG_INFINITY);
        assert!(number_prefix(b"NaN").is_nan());
    }

    #[test]
    fn test_number_radix_literals() {
        assert_eq!(number_prefix(b"0xff"), 255.0);
        assert_eq!(number_prefix(b"0xAF"), 175.0);
        assert_eq!(number_prefix(b"0b1010"), 10.0);
        assert_eq!(number_prefix(b"0o123"), 83.0);
        assert_eq!(number_prefix(b"-0x10"), -16.0);
        assert_eq!(number_prefix(b"0x"), 0.0);
    }

    #[test]
    fn test_legacy_octal_rejected() {
        for text in ["0123", "-0123", "[1,007]", "{a:00}"] {
            assert!(
                matches!(parse(text), Err(Error::Syntax { .. })),
                "{text} should be rejected"
            );
        }
        assert_eq!(parse("0").unwrap(), Value::from(0));
        assert_eq!(parse("0.5").unwrap(), Value::from(0.5));
        assert_eq!(parse("-0e3").unwrap(), Value::from(-0.0));
        assert_eq!(parse("0o17").unwrap(), Value::from(15));
    }

    #[test]
    fn test_number_span_swallows_junk_up_to_delimiter() {
        let value = parse("{a:1:2,b:3}").unwrap();
        assert_eq!(
            value,
            object(&[("a", Value::from(1)), ("b", Value::from(3))])
        );
    }

    #[test]
    fn test_arrays_and_holes() {
        assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(
            parse("[1,,3]").unwrap(),
            Value::Array(vec![Value::from(1), Value::Undefined, Value::from(3)])
        );
        assert_eq!(
            parse("[1,]").unwrap(),
            Value::Array(vec![Value::from(1), Value::Undefined])
        );
        assert_eq!(
            parse("[,]").unwrap(),
            Value::Array(vec![Value::Undefined, Value::Undefined])
        );
        assert_eq!(
            parse("['outer',['inner']]").unwrap(),
            Value::Array(vec![
                Value::from("outer"),
                Value::Array(vec![Value::from("inner")])
            ])
        );
    }

    #[test]
    fn test_array_errors() {
        assert!(matches!(parse("[1"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[1,"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("['a' 'b']"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[#]"), Err(Error::InvalidType { .. })));
    }

    #[test]
    fn test_objects() {
        assert_eq!(parse("{}").unwrap(), object(&[]));
        assert_eq!(
            parse("{'key': 42}").unwrap(),
            object(&[("key", Value::from(42))])
        );
        assert_eq!(
            parse("{\"key\": 42}").unwrap(),
            object(&[("key", Value::from(42))])
        );
        assert_eq!(
            parse("{'*':42,'a b':1}").unwrap(),
            object(&[("*", Value::from(42)), ("a b", Value::from(1))])
        );
        assert_eq!(parse("{value:undefined}").unwrap(), object(&[]));
        assert_eq!(parse("{a:,b:1}").unwrap(), object(&[("b", Value::from(1))]));
        assert_eq!(parse("{a:1,}").unwrap(), object(&[("a", Value::from(1))]));
    }

    #[test]
    fn test_object_duplicate_keys_last_wins() {
        let value = parse("{a:1,b:2,a:3}").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get("a"), Some(&Value::from(3)));
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_object_errors() {
        assert!(matches!(parse("{a:1 b:2}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a:1;b:2}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a:1"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{:1}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{'a' 1}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a-b:1}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("{a:}"), Err(Error::InvalidType { .. })));
        assert!(matches!(
            parse("{key:42,fn:function(){}}"),
            Err(Error::InvalidType { .. })
        ));
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse("'\\n\\t'").unwrap(), Value::from("\n\t"));
        assert_eq!(parse("'\\u0041'").unwrap(), Value::from("A"));
        assert_eq!(parse("'it\\'s'").unwrap(), Value::from("it's"));
        assert_eq!(parse("\"say \\\"hi\\\"\"").unwrap(), Value::from("say \"hi\""));
        assert_eq!(parse("'a\"b'").unwrap(), Value::from("a\"b"));
        assert_eq!(parse("'\\0'").unwrap(), Value::from("\0"));
        assert_eq!(
            parse("'\\u{1F49A}\\u{1F49B}'").unwrap(),
            Value::from("💚💛")
        );
        assert_eq!(parse("'\\xff'").unwrap(), Value::from("\u{FFFD}"));
    }

    #[test]
    fn test_string_errors() {
        assert!(matches!(parse("'unterminated"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("'\\ud800'"), Err(Error::Escape { .. })));
        assert!(matches!(parse("'\\xZZ'"), Err(Error::Escape { .. })));
        assert!(matches!(parse("'\\q'"), Err(Error::Escape { .. })));
    }

    #[test]
    fn test_trailing_data() {
        let err = parse("123 456").unwrap_err();
        assert_eq!(err, Error::syntax(3, "Invalid format: trailing data"));
        assert!(matches!(parse("[1]]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse(","), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::new().with_max_depth(3);
        assert!(parse_with_options("[[[1]]]", &options).is_ok());
        assert!(matches!(
            parse_with_options("[[[[1]]]]", &options),
            Err(Error::DepthLimitExceeded { limit: 3, .. })
        ));
        assert!(matches!(
            parse_with_options("{a:{b:{c:{}}}}", &options),
            Err(Error::DepthLimitExceeded { .. })
        ));

        let deep = "[".repeat(10_000) + &"]".repeat(10_000);
        assert!(matches!(
            parse(&deep),
            Err(Error::DepthLimitExceeded { limit: 128, .. })
        ));
    }

    #[test]
    fn test_depth_counts_siblings_once() {
        let options = ParseOptions::new().with_max_depth(2);
        assert!(parse_with_options("[[1],[2],{a:1},[]]", &options).is_ok());
        assert!(parse_with_options("[[1],{a:[]}]", &options).is_err());
    }

    #[test]
    fn test_from_value_integers() {
        let n: u8 = from_value(Value::from(200)).unwrap();
        assert_eq!(n, 200);
        assert!(from_value::<u8>(Value::from(300)).is_err());
        assert!(from_value::<i32>(Value::from(1.5)).is_err());
        assert!(from_value::<i32>(Value::from("1")).is_err());
        let f: f64 = from_value(Value::from(1.5)).unwrap();
        assert_eq!(f, 1.5);
    }

    #[test]
    fn test_from_value_options() {
        let none: Option<i32> = from_value(Value::Undefined).unwrap();
        assert_eq!(none, None);
        let none: Option<i32> = from_value(Value::Null).unwrap();
        assert_eq!(none, None);
        let some: Option<i32> = from_value(Value::from(4)).unwrap();
        assert_eq!(some, Some(4));
    }
}
