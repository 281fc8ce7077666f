use serde_jsrs::{record, stringify, RecordMap, Value};

#[test]
fn test_record_macro_keywords() {
    assert_eq!(record!(undefined), Value::Undefined);
    assert_eq!(record!(null), Value::Null);
    assert_eq!(record!(true), Value::Bool(true));
    assert_eq!(record!(false), Value::Bool(false));
}

#[test]
fn test_record_macro_numbers() {
    assert_eq!(record!(42), Value::Number(42.0));
    assert_eq!(record!(3.5), Value::Number(3.5));
    assert_eq!(record!(-123), Value::Number(-123.0));
    assert_eq!(record!(u64::MAX), Value::Number(u64::MAX as f64));
}

#[test]
fn test_record_macro_strings() {
    assert_eq!(record!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(record!(""), Value::String(String::new()));
}

#[test]
fn test_record_macro_arrays() {
    assert_eq!(record!([]), Value::Array(vec![]));

    let arr = record!([1, "two", null, undefined, [true]]);
    match arr {
        Value::Array(vec) => {
            assert_eq!(vec.len(), 5);
            assert_eq!(vec[0], Value::Number(1.0));
            assert_eq!(vec[1], Value::String("two".to_string()));
            assert_eq!(vec[2], Value::Null);
            assert_eq!(vec[3], Value::Undefined);
            assert_eq!(vec[4], Value::Array(vec![Value::Bool(true)]));
        }
        _ => panic!("Expected array"),
    }
}

#[test]
fn test_record_macro_objects() {
    assert_eq!(record!({}), Value::Object(RecordMap::new()));

    let obj = record!({
        "name": "Marcus Aurelius",
        "birth": { "place": "Rome" },
        "tags": ["emperor", "philosopher"],
    });

    let map = obj.as_object().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(
        map.get("name"),
        Some(&Value::String("Marcus Aurelius".to_string()))
    );
    assert_eq!(
        map.get("birth").and_then(Value::as_object).and_then(|b| b.get("place")),
        Some(&Value::from("Rome"))
    );
    assert_eq!(
        map.keys().cloned().collect::<Vec<_>>(),
        vec!["name", "birth", "tags"]
    );
}

#[test]
fn test_record_macro_variables() {
    let city = "Kiev";
    let floor = 1;
    let spouse: Option<&str> = None;

    let value = record!({ "city": city, "floor": floor, "spouse": spouse });
    assert_eq!(stringify(&value), "{city:'Kiev',floor:1}");
}

#[test]
fn test_record_macro_renders() {
    let value = record!({
        "holes": [1, undefined, 3],
        "odd key": null,
        "gone": undefined
    });
    assert_eq!(stringify(&value), "{holes:[1,,3],'odd key':null}");
}
