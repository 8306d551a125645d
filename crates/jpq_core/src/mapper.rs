//! Pluggable mapping of JSON text onto typed values

use serde::de::DeserializeOwned;

/// Error type mappers report; the cause is preserved as-is
pub type MapperError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Deserializes canonical JSON text into a caller-chosen type.
///
/// The facade re-serializes extracted containers to canonical text and
/// hands it to the bound mapper, so alternative implementations can
/// apply their own conventions.
pub trait ObjectMapper {
    fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T, MapperError>;
}

/// Default mapper backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeMapper;

impl ObjectMapper for SerdeMapper {
    fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T, MapperError> {
        serde_json::from_str(json).map_err(Into::into)
    }
}
