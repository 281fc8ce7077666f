/// Builds a [`Value`](crate::Value) from record-like syntax.
///
/// Object keys are string literals. `undefined` and `null` are recognised as
/// keywords; any other expression goes through [`to_value`](crate::to_value).
///
/// # Examples
///
/// ```rust
/// use serde_jsrs::{record, Value};
///
/// let value = record!({
///     "name": "Marcus",
///     "born": { "place": "Rome", "year": 121 },
///     "slots": [1, undefined, 3],
///     "spouse": null
/// });
///
/// assert_eq!(
///     value.to_string(),
///     "{name:'Marcus',born:{place:'Rome',year:121},slots:[1,,3],spouse:null}"
/// );
/// ```
#[macro_export]
macro_rules! record {
    (undefined) => {
        $crate::Value::Undefined
    };

    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::record!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::RecordMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::RecordMap::new();
        $(
            object.insert($key.to_string(), $crate::record!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else: numbers, strings, variables and other expressions.
    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Undefined)
    };
}
