//! Persistent key-value storage shared by the account and room stores.
//!
//! Every logical collection lives under one key as a single JSON document.
//! Stores read the whole document, modify it, and write the whole document
//! back; there is no incremental update.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod file;
pub mod ids;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Current account (secret stripped).
pub const USER_KEY: &str = "user";
/// All registered accounts, secrets included.
pub const USERS_KEY: &str = "users";
/// All interview rooms across every account.
pub const ROOMS_KEY: &str = "interviewRooms";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document under '{key}' is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("An account with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Minimal string key-value contract, modelled on browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Backing store handle passed to every consumer at construction time.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes the document under `key`. An absent key is `None`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
    }
}

/// Encodes `value` and replaces the document under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_json_absent_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = read_json(&store, USERS_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, ROOMS_KEY, &json!([{"id": "1"}])).unwrap();
        let value: Option<serde_json::Value> = read_json(&store, ROOMS_KEY).unwrap();
        assert_eq!(value.unwrap()[0]["id"], "1");
    }

    #[test]
    fn test_read_json_reports_corrupt_document() {
        let store = MemoryStore::new();
        store.set(USERS_KEY, "{not json").unwrap();
        let err = read_json::<Vec<String>>(&store, USERS_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == USERS_KEY));
    }
}
