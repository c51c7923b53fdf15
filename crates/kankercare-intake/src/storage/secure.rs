//! Obfuscating store for session artifacts
//!
//! Values are JSON-serialized and base64-encoded before they reach the
//! backend. This keeps tokens from being readable at a glance; it is NOT
//! encryption and provides no confidentiality.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::backend::KeyValueStore;
use crate::error::StorageError;

const AUTH_TOKEN_KEY: &str = "auth_token";
const USER_DATA_KEY: &str = "user_data";

/// Secure store
///
/// Encode/decode failures never reach the caller: writes are logged and
/// dropped, unreadable values read as absent.
#[derive(Clone)]
pub struct SecureStorage {
    backend: Arc<dyn KeyValueStore>,
}

impl SecureStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value) {
            tracing::error!(key, error = %e, "failed to store data securely");
        }
    }

    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to retrieve data securely");
                None
            }
        }
    }

    pub fn remove_item(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::error!(key, error = %e, "failed to remove stored item");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            tracing::error!(error = %e, "failed to clear storage");
        }
    }

    fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec(value).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.backend.set(key, STANDARD.encode(json))
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(encoded) = self.backend.get(key)? else {
            return Ok(None);
        };
        if encoded.is_empty() {
            return Ok(None);
        }
        let json = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| StorageError::Decode(e.to_string()))?;
        serde_json::from_slice(&json)
            .map(Some)
            .map_err(|e| StorageError::Decode(e.to_string()))
    }
}

/// Profile kept alongside the token after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub email: String,
    pub login_time: DateTime<Utc>,
}

/// Session helper on top of [`SecureStorage`]
#[derive(Clone)]
pub struct AuthStorage {
    store: SecureStorage,
}

impl AuthStorage {
    pub fn new(store: SecureStorage) -> Self {
        Self { store }
    }

    pub fn set_auth_token(&self, token: &str) {
        self.store.set_item(AUTH_TOKEN_KEY, token);
    }

    pub fn auth_token(&self) -> Option<String> {
        self.store.get_item(AUTH_TOKEN_KEY)
    }

    pub fn remove_auth_token(&self) {
        self.store.remove_item(AUTH_TOKEN_KEY);
    }

    pub fn set_user_data(&self, user: &UserData) {
        self.store.set_item(USER_DATA_KEY, user);
    }

    pub fn user_data(&self) -> Option<UserData> {
        self.store.get_item(USER_DATA_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some_and(|t| !t.is_empty())
    }

    /// Drop the session and everything else held in the store
    pub fn logout(&self) {
        self.remove_auth_token();
        self.store.remove_item(USER_DATA_KEY);
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn stores() -> (Arc<MemoryStore>, SecureStorage) {
        let backend = Arc::new(MemoryStore::new());
        (backend.clone(), SecureStorage::new(backend))
    }

    #[test]
    fn test_roundtrip_is_encoded() {
        let (backend, store) = stores();
        store.set_item("k", &vec!["a", "b"]);

        let raw = backend.get("k").unwrap().unwrap();
        assert_eq!(raw, STANDARD.encode(r#"["a","b"]"#));
        assert_eq!(store.get_item::<Vec<String>>("k"), Some(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_, store) = stores();
        assert_eq!(store.get_item::<String>("absent"), None);
    }

    #[test]
    fn test_corrupt_values_read_as_absent() {
        let (backend, store) = stores();
        backend.insert_raw("not-base64", "%%%");
        backend.insert_raw("not-json", &STANDARD.encode("{broken"));
        backend.insert_raw("wrong-type", &STANDARD.encode("42"));

        assert_eq!(store.get_item::<String>("not-base64"), None);
        assert_eq!(store.get_item::<String>("not-json"), None);
        assert_eq!(store.get_item::<String>("wrong-type"), None);
    }

    #[test]
    fn test_auth_session_lifecycle() {
        let (backend, store) = stores();
        let auth = AuthStorage::new(store.clone());
        assert!(!auth.is_authenticated());

        auth.set_auth_token("mock_token_1");
        auth.set_user_data(&UserData {
            email: "siti@example.com".into(),
            login_time: Utc::now(),
        });
        store.set_item("draft", "sisa data");

        assert!(auth.is_authenticated());
        assert_eq!(auth.user_data().unwrap().email, "siti@example.com");

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.user_data().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let (_, store) = stores();
        let auth = AuthStorage::new(store);
        auth.set_auth_token("");
        assert!(!auth.is_authenticated());
    }
}
