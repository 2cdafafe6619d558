use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value as JSON text, keeping its serialized field names
pub fn to_json<T: Serialize + ?Sized>(item: &T) -> serde_json::Result<String> {
    serde_json::to_string(item)
}

/// Decode JSON text into the target type
pub fn from_json<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    serde_json::from_str(json)
}
