//! LocalStorage access for persisted JSON blobs

use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Decode the value stored under `key`; missing or corrupt entries read as None
pub fn read<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", key, e);
            None
        }
    }
}

/// Encode and store `value` under `key`
pub fn write<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let storage = local_storage().ok_or_else(|| "LocalStorage unavailable".to_string())?;
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    storage
        .set_item(key, &json)
        .map_err(|e| format!("set_item({key}) rejected: {e:?}"))
}
