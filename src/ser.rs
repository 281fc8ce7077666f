//! Record serialization.
//!
//! Writing happens in two steps. Rust data is first converted into a
//! [`Value`] tree by [`ValueSerializer`]; the tree is then rendered as text by
//! [`Serializer`]. Hand-built values go straight to the second step through
//! [`stringify`].
//!
//! ## Output rules
//!
//! - Numbers use the shortest round-trip form, switching to exponent notation
//!   outside `[1e-7, 1e21)` (see [`format_number`]).
//! - Strings are always single-quoted and escaped with [`crate::escape`].
//! - Object keys stay bare when they are identifiers and are quoted otherwise.
//! - Object members holding `undefined` or a function are left out.
//! - `undefined` array elements become holes, so `[1, undefined, 3]` is
//!   written as `[1,,3]`.
//! - Dates are written as quoted ISO-8601 strings with milliseconds.
//!
//! No whitespace is ever emitted.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Birth { date: &'static str, place: &'static str }
//!
//! let text = serde_jsrs::to_string(&Birth { date: "1990-02-15", place: "Rome" }).unwrap();
//! assert_eq!(text, "{date:'1990-02-15',place:'Rome'}");
//! ```

use crate::escape::{escape_into, is_bare_identifier};
use crate::value::iso_date;
use crate::{Error, RecordMap, Result, Value};
use serde::{ser, Serialize};

/// Renders [`Value`] trees as record text.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{Serializer, Value};
///
/// let mut serializer = Serializer::new();
/// serializer.serialize_value(&Value::Array(vec![Value::from(1), Value::Null]));
/// assert_eq!(serializer.into_inner(), "[1,null]");
/// ```
#[derive(Debug, Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Serializer {
            output: String::with_capacity(128),
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the text of `value`.
    ///
    /// Returns `false`, writing nothing, when the value has no textual form
    /// (a [`Value::Function`]).
    pub fn serialize_value(&mut self, value: &Value) -> bool {
        match value {
            Value::Undefined => self.output.push_str("undefined"),
            Value::Null => self.output.push_str("null"),
            Value::Bool(true) => self.output.push_str("true"),
            Value::Bool(false) => self.output.push_str("false"),
            Value::Number(n) => self.output.push_str(&format_number(*n)),
            Value::String(s) => self.write_string(s),
            Value::Date(dt) => self.write_string(&iso_date(dt)),
            Value::Array(items) => self.write_array(items),
            Value::Object(map) => self.write_object(map),
            Value::Function => return false,
        }
        true
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('\'');
        escape_into(&mut self.output, s);
        self.output.push('\'');
    }

    fn write_key(&mut self, key: &str) {
        if is_bare_identifier(key) {
            self.output.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    fn write_array(&mut self, items: &[Value]) {
        self.output.push('[');
        let last = items.len().saturating_sub(1);
        for (index, item) in items.iter().enumerate() {
            // A function writes nothing and also skips its separator, so
            // `[1, fn, 3]` comes out as `[1,3]` and a trailing function leaves
            // `[1,]`, which reads back as a hole.
            if !item.is_undefined() && !self.serialize_value(item) {
                continue;
            }
            if index != last {
                self.output.push(',');
            }
        }
        self.output.push(']');
    }

    fn write_object(&mut self, map: &RecordMap) {
        self.output.push('{');
        let mut first = true;
        for (key, value) in map {
            if value.is_undefined() || value.is_function() {
                continue;
            }
            if !first {
                self.output.push(',');
            }
            first = false;
            self.write_key(key);
            self.output.push(':');
            self.serialize_value(value);
        }
        self.output.push('}');
    }
}

/// Renders a value without logging; used by `Display`.
pub(crate) fn render(value: &Value) -> String {
    let mut serializer = Serializer::new();
    serializer.serialize_value(value);
    serializer.into_inner()
}

/// Serializes a [`Value`] to record text.
///
/// Never fails. A top-level [`Value::Function`] yields an empty string.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{parse, stringify};
///
/// let value = parse("{ name : \"Marcus\", tags : [ 'a' , , 'b' ] }").unwrap();
/// assert_eq!(stringify(&value), "{name:'Marcus',tags:['a',,'b']}");
/// ```
#[must_use]
pub fn stringify(value: &Value) -> String {
    let text = render(value);
    log::debug!("stringified record into {} bytes", text.len());
    text
}

/// Formats a number the way JavaScript's `Number.prototype.toString` does.
///
/// The digits are the shortest ones that read back to the same `f64`.
/// Magnitudes in `[1e-7, 1e21)` are written positionally and everything else
/// in exponent form with an explicit exponent sign.
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(0.001), "0.001");
/// assert_eq!(format_number(1e100), "1e+100");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(f64::NAN), "NaN");
/// ```
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3".
    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if n < 0.0 {
        out.push('-');
    }
    if k <= point && point <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((point - k) as usize));
    } else if 0 < point && point <= 21 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if -6 < point && point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(&digits);
    } else {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if exponent >= 0 { '+' } else { '-' });
        out.push_str(&exponent.abs().to_string());
    }
    out
}

/// Converts any `T: Serialize` into a [`Value`] tree.
///
/// `None` becomes `Undefined` (the member is left out of objects), unit
/// becomes `Null`, and enum variants carrying data become single-member
/// objects keyed by the variant name.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: RecordMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn tagged(variant: &'static str, value: Value) -> Value {
    let mut map = RecordMap::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Object(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v.iter().map(|&b| Value::Number(f64::from(b))).collect();
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Undefined)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0), None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len, Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.vec);
        match self.variant {
            Some(variant) => tagged(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: RecordMap::with_capacity(capacity),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        let object = Value::Object(self.map);
        match self.variant {
            Some(variant) => tagged(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Object keys are strings; numeric map keys are written in their text form.
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(n) => format_number(n),
            _ => return Err(Error::custom("Map keys must be strings or numbers")),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Converts a `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{to_value, Value};
///
/// let value = to_value(&(1, "two", None::<u8>)).unwrap();
/// assert_eq!(
///     value,
///     Value::Array(vec![Value::from(1), Value::from("two"), Value::Undefined])
/// );
/// ```
///
/// # Errors
///
/// Returns an error if a map key is neither a string nor a number, or if a
/// `Serialize` implementation reports one.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}
