//! Typed facade over path parsing and evaluation.

use std::collections::HashMap;
use std::hash::Hash;
use std::io;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::Error;
use crate::coerce::{CoercionError, FromValue};
use crate::eval;
use crate::mapper::{ObjectMapper, SerdeMapper};
use crate::parser::Parser;

/// Typed query access to a decoded JSON document.
///
/// The document is decoded once at construction and never mutated
/// afterwards, so clones share it cheaply and queries from multiple
/// threads need no synchronization. A root path can be bound with
/// [`set_root`](Self::set_root) to shorten repeated queries, and
/// [`using`](Self::using) rebinds the object mapper without re-decoding.
#[derive(Debug, Clone)]
pub struct JsonPath<M = SerdeMapper> {
    document: Arc<Value>,
    root_path: String,
    mapper: M,
}

impl JsonPath {
    /// Decode a document from JSON text.
    pub fn new(text: &str) -> Result<Self, Error> {
        let value = serde_json::from_str(text).map_err(|e| Error::DocumentParse(Box::new(e)))?;
        Ok(Self::from_value(value))
    }

    /// Decode a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let value = serde_json::from_slice(bytes).map_err(|e| Error::DocumentParse(Box::new(e)))?;
        Ok(Self::from_value(value))
    }

    /// Decode a document from a reader without buffering it first.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, Error> {
        let value = serde_json::from_reader(reader).map_err(|e| Error::DocumentParse(Box::new(e)))?;
        Ok(Self::from_value(value))
    }

    /// Decode a document from a file on disk.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::DocumentParse(Box::new(e)))?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Fetch a document from a URL with a blocking request and decode
    /// the response body; transport and HTTP status failures count as
    /// document failures.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        let response = ureq::get(url)
            .call()
            .map_err(|e| Error::DocumentParse(Box::new(e)))?;
        Self::from_reader(response.into_reader())
    }

    /// Wrap an already-decoded document.
    pub fn from_value(value: Value) -> Self {
        debug!(kind = eval::value_kind(&value), "document bound");
        Self {
            document: Arc::new(value),
            root_path: String::new(),
            mapper: SerdeMapper,
        }
    }
}

impl<M: ObjectMapper> JsonPath<M> {
    /// Extract the fragment selected by `path` as a raw JSON value.
    ///
    /// The empty path and `"$"` select the whole document (or the
    /// fragment under the bound root path).
    pub fn get(&self, path: &str) -> Result<Value, Error> {
        self.eval_path(path)
    }

    /// Extract the fragment at `path`, coerced to `T`.
    pub fn get_as<T: FromValue>(&self, path: &str) -> Result<T, Error> {
        let value = self.eval_path(path)?;
        Ok(T::from_value(&value)?)
    }

    /// Extract a boolean.
    pub fn get_bool(&self, path: &str) -> Result<bool, Error> {
        self.get_as(path)
    }

    /// Extract a single character.
    pub fn get_char(&self, path: &str) -> Result<char, Error> {
        self.get_as(path)
    }

    /// Extract an 8-bit integer; integer-valued numbers are truncated.
    pub fn get_byte(&self, path: &str) -> Result<i8, Error> {
        self.get_as(path)
    }

    /// Extract a 16-bit integer; integer-valued numbers are truncated.
    pub fn get_short(&self, path: &str) -> Result<i16, Error> {
        self.get_as(path)
    }

    /// Extract a 32-bit integer; integer-valued numbers are truncated.
    pub fn get_int(&self, path: &str) -> Result<i32, Error> {
        self.get_as(path)
    }

    /// Extract a 64-bit integer.
    pub fn get_long(&self, path: &str) -> Result<i64, Error> {
        self.get_as(path)
    }

    /// Extract a single-precision float.
    pub fn get_float(&self, path: &str) -> Result<f32, Error> {
        self.get_as(path)
    }

    /// Extract a double-precision float.
    pub fn get_double(&self, path: &str) -> Result<f64, Error> {
        self.get_as(path)
    }

    /// Extract a string; scalars render in their canonical form.
    pub fn get_string(&self, path: &str) -> Result<String, Error> {
        self.get_as(path)
    }

    /// Extract an array, coercing every element to `T`.
    pub fn get_list<T: FromValue>(&self, path: &str) -> Result<Vec<T>, Error> {
        let value = self.eval_path(path)?;
        let Value::Array(items) = value else {
            return Err(CoercionError::new("list", &value).into());
        };
        let mut list = Vec::with_capacity(items.len());
        for item in &items {
            list.push(T::from_value(item)?);
        }
        Ok(list)
    }

    /// Extract an object, coercing keys to `K` and values to `V`.
    ///
    /// Keys pass through the same coercion as string values, so an
    /// object with numeric-looking keys can be read as `HashMap<i64, _>`.
    pub fn get_map<K, V>(&self, path: &str) -> Result<HashMap<K, V>, Error>
    where
        K: FromValue + Eq + Hash,
        V: FromValue,
    {
        let value = self.eval_path(path)?;
        let Value::Object(entries) = value else {
            return Err(CoercionError::new("map", &value).into());
        };
        let mut map = HashMap::with_capacity(entries.len());
        for (key, item) in &entries {
            map.insert(K::from_value(&Value::String(key.clone()))?, V::from_value(item)?);
        }
        Ok(map)
    }

    /// Extract the fragment at `path` and map it onto `T`.
    ///
    /// Arrays and objects are rendered to canonical JSON text and handed
    /// to the bound [`ObjectMapper`]; scalars deserialize directly.
    pub fn get_object<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let value = self.eval_path(path)?;
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            let text =
                serde_json::to_string(&value).map_err(|e| Error::ObjectMapping(Box::new(e)))?;
            self.mapper.deserialize(&text).map_err(Error::ObjectMapping)
        } else {
            serde_json::from_value(value.clone()).map_err(|_| {
                Error::Coercion(CoercionError::new(std::any::type_name::<T>(), &value))
            })
        }
    }

    /// The bound root path, or `""` when none is set.
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Bind a root path that prefixes every subsequent query.
    ///
    /// Rebinding requires `&mut self`, so a shared instance keeps a
    /// stable root for all of its readers.
    pub fn set_root(&mut self, root_path: impl Into<String>) -> &mut Self {
        self.root_path = root_path.into();
        self
    }

    /// Rebind the object mapper, sharing the document and root path.
    pub fn using<M2: ObjectMapper>(&self, mapper: M2) -> JsonPath<M2> {
        JsonPath {
            document: Arc::clone(&self.document),
            root_path: self.root_path.clone(),
            mapper,
        }
    }

    /// Render the whole document as pretty-printed JSON.
    pub fn prettify(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(&*self.document)
            .map_err(|e| Error::ObjectMapping(Box::new(e)))
    }

    /// Borrow the decoded document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    fn eval_path(&self, path: &str) -> Result<Value, Error> {
        let full = self.full_path(path);
        let parsed = Parser::parse(&full)?;
        debug!(path = %full, segments = parsed.segments.len(), "evaluating path");
        Ok(eval::evaluate(&parsed, &self.document)?)
    }

    fn full_path(&self, path: &str) -> String {
        if self.root_path.is_empty() {
            return path.to_string();
        }
        let mut full = String::with_capacity(self.root_path.len() + path.len() + 1);
        full.push_str(&self.root_path);
        if !self.root_path.ends_with('.') {
            full.push('.');
        }
        full.push_str(path);
        full
    }
}
