//! Typed record serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_jsrs::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Birth {
    date: String,
    place: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Person {
    name: String,
    passport: String,
    birth: Birth,
    spouse: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let person = Person {
        name: "Marcus Aurelius".to_string(),
        passport: "AE127095".to_string(),
        birth: Birth {
            date: "1990-02-15T00:00:00.000Z".to_string(),
            place: "Rome".to_string(),
        },
        spouse: None,
    };

    // `None` fields are left out of the record entirely
    let text = to_string(&person)?;
    println!("Record:\n{}\n", text);

    let back: Person = from_str(&text)?;
    assert_eq!(person, back);
    println!("✓ Round-trip successful");

    // Hand-written input may use comments, either quote and trailing commas
    let edited: Person = from_str(
        r#"{
            name: "Marcus Aurelius", // full name
            passport: 'AE127095',
            birth: { date: '1990-02-15T00:00:00.000Z', place: 'Rome', },
            spouse: 'Faustina',
        }"#,
    )?;
    println!("Parsed hand-written record: {:?}", edited);

    Ok(())
}
