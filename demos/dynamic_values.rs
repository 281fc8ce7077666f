//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use chrono::{TimeZone, Utc};
use serde::Serialize;
use serde_jsrs::{parse, record, stringify, to_value, Value};
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build a message dynamically with the record! macro
    let mut message = record!({
        "host": "localhost",
        "port": 8080,
        "slots": [1, undefined, 3],
        "debug": true,
        "trace": undefined
    });

    // Host-only values: dates become strings, functions disappear
    if let Value::Object(obj) = &mut message {
        let sent = Utc.with_ymd_and_hms(2016, 9, 7, 11, 59, 57).single();
        obj.insert("sent".to_string(), Value::from(sent));
        obj.insert("callback".to_string(), Value::Function);
    }
    println!("Message as record:\n{}\n", stringify(&message));

    // Parse text and inspect it
    let parsed = parse("{ /* sample */ host: 'localhost', port: 0x1F90, slots: [1,,3] }")?;
    if let Value::Object(obj) = &parsed {
        if let Some(host) = obj.get("host").and_then(Value::as_str) {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(Value::as_i64) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::Array(slots)) = obj.get("slots") {
            let holes = slots.iter().filter(|v| v.is_undefined()).count();
            println!("Accessing field 'slots': {} items, {} holes\n", slots.len(), holes);
        }
    }

    // Convert an existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as record:\n{}\n", user_value);

    println!("Type checks:");
    println!("  kind:      {:?}", user_value.kind());
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());

    // Errors carry a category and an offset into the compacted input
    if let Err(err) = parse("{a:1 b:2}") {
        println!("\nRejected input: {} ({:?})", err, err.category());
    }

    Ok(())
}
