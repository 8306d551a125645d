//! jpq_core - dot-notation JSON query library with typed extraction
//!
//! This library parses dot/bracket path expressions, evaluates them
//! against decoded JSON documents, and coerces the selected fragments
//! into plain Rust types.
//!
//! # Example
//! ```
//! use jpq_core::JsonPath;
//!
//! let json_path = JsonPath::new(
//!     r#"{
//!         "store": {
//!             "book": [
//!                 { "title": "Sayings of the Century", "price": 8.95 },
//!                 { "title": "Moby Dick", "price": 8.99 }
//!             ]
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! let titles: Vec<String> = json_path.get_list("store.book.title").unwrap();
//! assert_eq!(titles, ["Sayings of the Century", "Moby Dick"]);
//!
//! let cheap = json_path.get("store.book.findAll { it.price < 8.97 }.title").unwrap();
//! assert_eq!(cheap, serde_json::json!(["Sayings of the Century"]));
//! ```

pub mod ast;
pub mod coerce;
pub mod eval;
pub mod json_path;
pub mod lexer;
pub mod mapper;
pub mod parser;

use serde_json::Value;

pub use coerce::{CoercionError, FromValue};
pub use eval::EvalError;
pub use json_path::JsonPath;
pub use lexer::LexError;
pub use mapper::{MapperError, ObjectMapper, SerdeMapper};
pub use parser::ParseError;

/// Error type for document queries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document text could not be decoded as JSON
    #[error("invalid document: {0}")]
    DocumentParse(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The path expression could not be parsed
    #[error(transparent)]
    Path(#[from] ParseError),
    /// The path could not be applied to the document
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// The selected fragment could not be coerced to the requested type
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    /// The bound object mapper rejected the selected fragment
    #[error("object mapping failed: {0}")]
    ObjectMapping(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Evaluate a path expression against a JSON value
///
/// # Arguments
/// * `path` - A path expression (e.g., "store.book[0].title")
/// * `document` - The JSON value to query
///
/// # Returns
/// The selected fragment, or an error if the path is invalid or does
/// not apply to the document's shape
///
/// # Example
/// ```
/// use serde_json::json;
/// use jpq_core::query;
///
/// let doc = json!({"store": {"book": [{"title": "Moby Dick"}]}});
/// let title = query("store.book[0].title", &doc).unwrap();
/// assert_eq!(title, json!("Moby Dick"));
/// ```
pub fn query(path: &str, document: &Value) -> Result<Value, Error> {
    let parsed = parser::Parser::parse(path)?;
    Ok(eval::evaluate(&parsed, document)?)
}
