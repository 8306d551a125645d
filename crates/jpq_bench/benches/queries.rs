#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jpq_core::parser::Parser;
use jpq_core::{JsonPath, query};
use serde_json::{Value, json};

const STORE_JSON: &str = include_str!("../data/store.json");

fn bench_path_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_parsing");

    let paths = [
        ("field_chain", "store.bicycle.color"),
        ("brackets", "store['book'][0]['title']"),
        ("function", "store.book.size()"),
        ("filter", "store.book.findAll { it.price < 10 && it.isbn }.title"),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::from_parameter(name), &path, |b, p| {
            b.iter(|| Parser::parse(black_box(p)))
        });
    }

    group.finish();
}

fn bench_basic_selectors(c: &mut Criterion) {
    let doc: Value = serde_json::from_str(STORE_JSON).unwrap();

    let mut group = c.benchmark_group("basic_selectors");

    let paths = [
        ("root", "$"),
        ("property", "store"),
        ("nested", "store.book"),
        ("index", "store.book[0]"),
        ("negative_index", "store.book[-1]"),
        ("wildcard", "store.book[*]"),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::new("store", name), &path, |b, p| {
            b.iter(|| query(black_box(*p), black_box(&doc)))
        });
    }

    group.finish();
}

fn bench_projections(c: &mut Criterion) {
    let doc: Value = serde_json::from_str(STORE_JSON).unwrap();

    let mut group = c.benchmark_group("projections");

    let paths = [
        ("field_over_array", "store.book.author"),
        ("missing_field", "store.book.isbn"),
        ("wildcard_then_field", "store.book[*].title"),
        ("size", "store.book.size()"),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::new("store", name), &path, |b, p| {
            b.iter(|| query(black_box(*p), black_box(&doc)))
        });
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let doc: Value = serde_json::from_str(STORE_JSON).unwrap();

    let mut group = c.benchmark_group("filters");

    let paths = [
        ("existence", "store.book.findAll { it.isbn }"),
        ("comparison", "store.book.findAll { it.price < 10 }"),
        (
            "logical",
            r#"store.book.findAll { it.price < 10 && it.category == "fiction" }"#,
        ),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::new("store", name), &path, |b, p| {
            b.iter(|| query(black_box(*p), black_box(&doc)))
        });
    }

    group.finish();
}

fn bench_typed_extraction(c: &mut Criterion) {
    let json_path = JsonPath::new(STORE_JSON).unwrap();

    let mut group = c.benchmark_group("typed_extraction");

    group.bench_function("get_string", |b| {
        b.iter(|| json_path.get_string(black_box("store.book[0].author")))
    });
    group.bench_function("get_double", |b| {
        b.iter(|| json_path.get_double(black_box("store.bicycle.price")))
    });
    group.bench_function("get_list_f64", |b| {
        b.iter(|| json_path.get_list::<f64>(black_box("store.book.price")))
    });

    group.finish();
}

fn catalog(books: usize) -> Value {
    let items: Vec<Value> = (0..books)
        .map(|i| {
            json!({
                "category": if i % 2 == 0 { "fiction" } else { "reference" },
                "author": format!("Author {i}"),
                "title": format!("Book {i}"),
                "price": (i % 40) as f64 + 0.95,
            })
        })
        .collect();
    json!({ "store": { "book": items } })
}

fn bench_by_document_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_size");

    let path = "store.book.findAll { it.price < 10 }.title";

    for size in [10_usize, 100, 1000] {
        let doc = catalog(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, d| {
            b.iter(|| query(black_box(path), black_box(d)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_path_parsing,
    bench_basic_selectors,
    bench_projections,
    bench_filters,
    bench_typed_extraction,
    bench_by_document_size,
);
criterion_main!(benches);
