//! End-to-end queries against a bookstore document.
//!
//! These tests drive the public facade the way a consumer would: decode
//! once, query with path expressions, and pull typed values out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use jpq_core::{Error, EvalError, JsonPath, ParseError};
use serde::Deserialize;
use serde_json::{Value, json};

const STORE_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/store.json");

fn store() -> JsonPath {
    JsonPath::from_file(STORE_FILE).expect("failed to load store fixture")
}

#[test]
fn test_fixture_loads() {
    let json_path = store();
    let document = json_path.document();
    assert!(document.is_object());
    assert_eq!(json_path.get_int("store.size()").unwrap(), 2);
}

#[test]
fn test_empty_path_and_root_marker_select_the_document() {
    let json_path = store();
    assert_eq!(json_path.get("").unwrap(), *json_path.document());
    assert_eq!(json_path.get("$").unwrap(), *json_path.document());
    assert_eq!(
        json_path.get("$.store.book[0].title").unwrap(),
        json!("Sayings of the Century")
    );
}

#[test]
fn test_dot_and_bracket_forms_are_equivalent() {
    let json_path = store();
    let dotted = json_path.get("store.book[0].title").unwrap();
    let bracketed = json_path.get("store['book'][0]['title']").unwrap();
    assert_eq!(dotted, bracketed);
    assert_eq!(dotted, json!("Sayings of the Century"));
}

#[test]
fn test_negative_indices_count_from_the_end() {
    let json_path = store();
    assert_eq!(
        json_path.get("store.book[-1].title").unwrap(),
        json!("The Lord of the Rings")
    );
    for i in 0..4 {
        let from_front = json_path.get(&format!("store.book[{i}].title")).unwrap();
        let from_back = json_path.get(&format!("store.book[{}].title", i - 4)).unwrap();
        assert_eq!(from_front, from_back);
    }
}

#[test]
fn test_field_access_projects_over_arrays() {
    let json_path = store();
    assert_eq!(
        json_path.get("store.book.author").unwrap(),
        json!(["Nigel Rees", "Evelyn Waugh", "Herman Melville", "J. R. R. Tolkien"])
    );
}

#[test]
fn test_category_queries() {
    let json_path = store();
    assert_eq!(
        json_path.get("store.book.category").unwrap(),
        json!(["reference", "fiction", "fiction", "fiction"])
    );
    assert_eq!(json_path.get("store.book[0].category").unwrap(), json!("reference"));
    assert_eq!(json_path.get("store.book[-1].category").unwrap(), json!("fiction"));
}

#[test]
fn test_projection_fills_missing_fields_with_null() {
    let json_path = store();
    assert_eq!(
        json_path.get("store.book.isbn").unwrap(),
        json!([null, null, "0-553-21311-3", "0-395-19395-8"])
    );
}

#[test]
fn test_wildcard_on_arrays_and_objects() {
    let json_path = store();
    let explicit = json_path.get("store.book[*].title").unwrap();
    let projected = json_path.get("store.book.title").unwrap();
    assert_eq!(explicit, projected);
    assert_eq!(json_path.get("store.bicycle[*]").unwrap(), json!(["red", 19.95]));
}

#[test]
fn test_size_of_collections() {
    let json_path = store();
    assert_eq!(json_path.get_int("store.book.size()").unwrap(), 4);
    assert_eq!(json_path.get_int("store.size()").unwrap(), 2);
    assert_eq!(json_path.get_int("store.magazine.size()").unwrap(), 0);
}

#[test]
fn test_find_all_keeps_document_order() {
    let json_path = store();
    let titles = json_path
        .get("store.book.findAll { it.price >= 5 && it.price <= 15 }.title")
        .unwrap();
    assert_eq!(titles, json!(["Sayings of the Century", "Sword of Honour", "Moby Dick"]));
    let prices: Vec<f64> = json_path
        .get_list("store.book.findAll { it.price >= 5 && it.price <= 15 }.price")
        .unwrap();
    assert_eq!(prices, [8.95, 12.99, 8.99]);
}

#[test]
fn test_find_all_with_named_loop_variable() {
    let json_path = store();
    let titles = json_path
        .get("store.book.findAll { book -> book.price >= 5 && book.price <= 15 }.title")
        .unwrap();
    assert_eq!(titles, json!(["Sayings of the Century", "Sword of Honour", "Moby Dick"]));
}

#[test]
fn test_find_all_with_bare_field_keeps_truthy_elements() {
    let json_path = store();
    assert_eq!(json_path.get_int("store.book.findAll { it.isbn }.size()").unwrap(), 2);
    assert_eq!(
        json_path.get("store.book.findAll { it.isbn != null }.author").unwrap(),
        json!(["Herman Melville", "J. R. R. Tolkien"])
    );
}

#[test]
fn test_typed_getters() {
    let json_path = store();
    assert_eq!(json_path.get_string("store.book[0].author").unwrap(), "Nigel Rees");
    assert_eq!(json_path.get_double("store.bicycle.price").unwrap(), 19.95);
    assert_eq!(json_path.get_float("store.bicycle.price").unwrap(), 19.95f64 as f32);
    assert_eq!(json_path.get_string("store.bicycle.price").unwrap(), "19.95");
}

#[test]
fn test_integer_getters_truncate_out_of_range_numbers() {
    let json_path = JsonPath::new(r#"{ "count": 300, "label": "300" }"#).unwrap();
    // 300 = 0x12C; the low byte is 0x2C = 44
    assert_eq!(json_path.get_byte("count").unwrap(), 44);
    assert_eq!(json_path.get_short("count").unwrap(), 300);
    assert!(json_path.get_byte("label").is_err());
    assert_eq!(json_path.get_short("label").unwrap(), 300);
}

#[test]
fn test_get_list_of_typed_values() {
    let json_path = store();
    let authors: Vec<String> = json_path.get_list("store.book.author").unwrap();
    assert_eq!(authors.len(), 4);
    assert!(authors.contains(&"J. R. R. Tolkien".to_string()));
    let prices: Vec<f64> = json_path.get_list("store.book.price").unwrap();
    assert_eq!(prices, [8.95, 12.99, 8.99, 22.99]);
}

#[test]
fn test_get_map_of_mixed_values() {
    let json_path = store();
    let bicycle: HashMap<String, Value> = json_path.get_map("store.bicycle").unwrap();
    assert_eq!(bicycle.len(), 2);
    assert_eq!(bicycle["color"], json!("red"));
    assert_eq!(bicycle["price"], json!(19.95));
}

#[test]
fn test_option_distinguishes_null_from_present() {
    let json_path = store();
    let missing: Option<String> = json_path.get_as("store.book[0].isbn").unwrap();
    assert_eq!(missing, None);
    let present: Option<String> = json_path.get_as("store.book[2].isbn").unwrap();
    assert_eq!(present, Some("0-553-21311-3".to_string()));

    let isbns: Vec<Option<String>> = json_path.get_list("store.book.isbn").unwrap();
    assert_eq!(isbns[..2], [None, None]);
    assert_eq!(isbns[2].as_deref(), Some("0-553-21311-3"));
    assert!(json_path.get_list::<String>("store.book.isbn").is_err());
}

#[derive(Debug, PartialEq, Deserialize)]
struct Book {
    category: String,
    author: String,
    title: String,
    isbn: Option<String>,
    price: f64,
}

#[test]
fn test_get_object_maps_structured_fragments() {
    let json_path = store();
    let book: Book = json_path.get_object("store.book[3]").unwrap();
    assert_eq!(
        book,
        Book {
            category: "fiction".to_string(),
            author: "J. R. R. Tolkien".to_string(),
            title: "The Lord of the Rings".to_string(),
            isbn: Some("0-395-19395-8".to_string()),
            price: 22.99,
        }
    );
    let books: Vec<Book> = json_path.get_object("store.book").unwrap();
    assert_eq!(books.len(), 4);
    assert_eq!(books[0].isbn, None);
}

#[test]
fn test_set_root_scopes_every_query() {
    let mut json_path = store();
    json_path.set_root("store.book");
    assert_eq!(json_path.get_int("size()").unwrap(), 4);
    let authors: Vec<String> = json_path.get_list("author").unwrap();
    assert!(authors.contains(&"J. R. R. Tolkien".to_string()));
    assert_eq!(json_path.get("[0].title").unwrap(), json!("Sayings of the Century"));
    json_path.set_root("store.bicycle");
    assert_eq!(json_path.get_string("color").unwrap(), "red");
}

#[test]
fn test_unsupported_function_is_a_path_error() {
    let error = store().get("store.book.price.max()").unwrap_err();
    assert!(matches!(
        error,
        Error::Path(ParseError::UnsupportedFunction { ref name, .. }) if name == "max"
    ));
}

#[test]
fn test_unsupported_predicate_operator_is_a_path_error() {
    let error = store().get("store.book.findAll { it.price % 2 }").unwrap_err();
    assert!(matches!(error, Error::Path(ParseError::UnsupportedPredicate { .. })));
}

#[test]
fn test_index_out_of_range_is_an_eval_error() {
    let error = store().get("store.book[10].title").unwrap_err();
    assert!(matches!(
        error,
        Error::Eval(EvalError::IndexOutOfRange { index: 10, len: 4 })
    ));
}

#[test]
fn test_indexing_a_scalar_is_an_eval_error() {
    let error = store().get("store.bicycle.color[0]").unwrap_err();
    assert!(matches!(error, Error::Eval(EvalError::TypeMismatch { .. })));
}

#[test]
fn test_coercing_a_string_to_int_fails() {
    let error = store().get_int("store.book[0].title").unwrap_err();
    assert!(matches!(error, Error::Coercion(_)));
}

#[test]
fn test_queries_are_deterministic() {
    let json_path = store();
    let first = json_path.get("store.book.findAll { it.price < 10 }.title").unwrap();
    let second = json_path.get("store.book.findAll { it.price < 10 }.title").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, json!(["Sayings of the Century", "Moby Dick"]));
}

#[test]
fn test_prettify_round_trips() {
    let json_path = store();
    let pretty = json_path.prettify().unwrap();
    let reparsed = JsonPath::new(&pretty).unwrap();
    assert_eq!(reparsed.document(), json_path.document());
}
