use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_jsrs::{from_str, parse, preprocess, stringify, to_string};

#[derive(Serialize, Deserialize, Clone)]
struct Birth {
    date: String,
    place: String,
}

#[derive(Serialize, Deserialize, Clone)]
struct Address {
    country: String,
    city: String,
    zip: String,
    street: String,
    building: String,
    floor: String,
    room: String,
}

#[derive(Serialize, Deserialize, Clone)]
struct Person {
    name: String,
    passport: String,
    birth: Birth,
    address: Address,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn marcus() -> Person {
    Person {
        name: "Marcus Aurelius".to_string(),
        passport: "AE127095".to_string(),
        birth: Birth {
            date: "1990-02-15T00:00:00.000Z".to_string(),
            place: "Rome".to_string(),
        },
        address: Address {
            country: "Ukraine".to_string(),
            city: "Kiev".to_string(),
            zip: "03056".to_string(),
            street: "Pobedy".to_string(),
            building: "37".to_string(),
            floor: "1".to_string(),
            room: "158".to_string(),
        },
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_serialize_record(c: &mut Criterion) {
    let person = marcus();

    c.bench_function("serialize_record", |b| {
        b.iter(|| to_string(black_box(&person)))
    });
}

fn benchmark_deserialize_record(c: &mut Criterion) {
    let text = to_string(&marcus()).unwrap();

    c.bench_function("deserialize_record", |b| {
        b.iter(|| from_str::<Person>(black_box(&text)))
    });
}

fn benchmark_parse_stringify_value(c: &mut Criterion) {
    let text = to_string(&marcus()).unwrap();
    let value = parse(&text).unwrap();

    let mut group = c.benchmark_group("value");
    group.bench_function("parse", |b| b.iter(|| parse(black_box(&text))));
    group.bench_function("stringify", |b| b.iter(|| stringify(black_box(&value))));
    group.finish();
}

fn benchmark_preprocess(c: &mut Criterion) {
    let commented = format!(
        "/* header */\n{}\n// trailer\n",
        to_string(&products(100)).unwrap().replace(',', ",\n  ")
    );

    c.bench_function("preprocess_commented", |b| {
        b.iter(|| preprocess(black_box(&commented)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 100, 1000].iter() {
        let items = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&items)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 100, 1000].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str::<Vec<Product>>(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let plain = "a".repeat(1000);
    let escaped = "it's\n\t\u{1}".repeat(200);

    let mut group = c.benchmark_group("strings");
    group.bench_function("serialize_plain", |b| {
        b.iter(|| to_string(black_box(&plain)))
    });
    group.bench_function("serialize_escaped", |b| {
        b.iter(|| to_string(black_box(&escaped)))
    });

    let escaped_text = to_string(&escaped).unwrap();
    group.bench_function("deserialize_escaped", |b| {
        b.iter(|| from_str::<String>(black_box(&escaped_text)))
    });
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let person = marcus();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("record_serialize", |b| {
        b.iter(|| serde_jsrs::to_string(black_box(&person)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&person)))
    });

    let record_str = serde_jsrs::to_string(&person).unwrap();
    let json_str = serde_json::to_string(&person).unwrap();

    group.bench_function("record_deserialize", |b| {
        b.iter(|| serde_jsrs::from_str::<Person>(black_box(&record_str)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<Person>(black_box(&json_str)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_record,
    benchmark_deserialize_record,
    benchmark_parse_stringify_value,
    benchmark_preprocess,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_strings,
    benchmark_comparison_with_json
);
criterion_main!(benches);
