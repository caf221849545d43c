//! Field deserializers that log and drop invalid values instead of failing the
//! whole record. Used for user-editable pictograph data.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| match T::deserialize(&raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Ignoring invalid value {}: {}", raw, e);
            None
        }
    }))
}

/// Like [`deserialize`] but falls back to `T::default()`, for fields that
/// always carry a value once loaded.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    deserialize(deserializer).map(Option::unwrap_or_default)
}
