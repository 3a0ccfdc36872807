//! High-level API for managing stored credentials.

use crate::{SecureStorage, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};

/// Persisted session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token from the backend
    pub token: String,
    /// Email the session was established for
    pub email: String,
}

/// Persisted registration form data, held between OTP request and verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Display name for the new account
    pub full_name: String,
    /// Email the OTP was sent to
    pub email: String,
    /// Optional phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Password for the new account (opaque to this layer)
    pub password: String,
}

/// High-level API for storing and retrieving credentials
pub struct CredentialStore {
    storage: Box<dyn SecureStorage>,
}

impl CredentialStore {
    /// Create a new credential store with the given storage backend
    pub fn new(storage: Box<dyn SecureStorage>) -> Self {
        Self { storage }
    }

    // ==========================================
    // Session
    // ==========================================

    /// Store the session record and the bare token.
    pub fn set_session(&self, record: &SessionRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| crate::StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::USER, &json)?;
        self.storage.set(StorageKeys::USER_TOKEN, &record.token)
    }

    /// Retrieve the stored session record, if any.
    ///
    /// Returns `Ok(None)` when no record is stored or the stored value
    /// cannot be decoded.
    pub fn get_session(&self) -> StorageResult<Option<SessionRecord>> {
        match self.storage.get(StorageKeys::USER)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    tracing::warn!("Stored session record is unreadable: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Check whether a session record is stored.
    pub fn has_session(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::USER)
    }

    /// Remove the session and any pending registration.
    ///
    /// All three keys are attempted even when one removal fails; the first
    /// failure is reported. Idempotent.
    pub fn clear_session(&self) -> StorageResult<()> {
        let mut first_error = None;
        for key in [
            StorageKeys::USER_TOKEN,
            StorageKeys::USER_DETAILS,
            StorageKeys::USER,
        ] {
            if let Err(e) = self.storage.delete(key) {
                tracing::warn!(key, "Failed to remove stored credential: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ==========================================
    // Pending registration
    // ==========================================

    /// Store the registration form data awaiting OTP verification.
    pub fn set_pending_registration(&self, record: &RegistrationRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| crate::StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::USER_DETAILS, &json)
    }

    /// Retrieve the pending registration, if any.
    pub fn get_pending_registration(&self) -> StorageResult<Option<RegistrationRecord>> {
        match self.storage.get(StorageKeys::USER_DETAILS)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    tracing::warn!("Stored registration record is unreadable: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Remove the pending registration. Returns whether a value was removed.
    pub fn clear_pending_registration(&self) -> StorageResult<bool> {
        self.storage.delete(StorageKeys::USER_DETAILS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory storage for testing. Clones share the same map so tests
    /// can inspect what the store wrote.
    #[derive(Clone, Default)]
    struct MemoryStorage {
        data: std::sync::Arc<Mutex<HashMap<String, String>>>,
    }

    impl MemoryStorage {
        fn new() -> Self {
            Self::default()
        }
    }

    impl SecureStorage for MemoryStorage {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            Ok(self.data.lock().unwrap().remove(key).is_some())
        }
    }

    fn create_store() -> CredentialStore {
        CredentialStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_session_roundtrip() {
        let store = create_store();
        assert!(!store.has_session().unwrap());

        let record = SessionRecord {
            token: "tok-abc".to_string(),
            email: "user@example.com".to_string(),
        };
        store.set_session(&record).unwrap();

        assert!(store.has_session().unwrap());
        assert_eq!(store.get_session().unwrap(), Some(record));
    }

    #[test]
    fn test_set_session_writes_bare_token() {
        let storage = MemoryStorage::new();
        let store = CredentialStore::new(Box::new(storage.clone()));

        store
            .set_session(&SessionRecord {
                token: "tok-xyz".to_string(),
                email: "user@example.com".to_string(),
            })
            .unwrap();

        // The bare token lives under its own key for host runtimes that
        // only need the credential.
        assert_eq!(
            storage.get(StorageKeys::USER_TOKEN).unwrap(),
            Some("tok-xyz".to_string())
        );
    }

    #[test]
    fn test_clear_session_removes_all_keys() {
        let store = create_store();

        store
            .set_session(&SessionRecord {
                token: "t".to_string(),
                email: "a@b.co".to_string(),
            })
            .unwrap();
        store
            .set_pending_registration(&RegistrationRecord {
                full_name: "Ada".to_string(),
                email: "a@b.co".to_string(),
                phone: None,
                password: "pw".to_string(),
            })
            .unwrap();

        store.clear_session().unwrap();
        assert!(!store.has_session().unwrap());
        assert!(store.get_pending_registration().unwrap().is_none());

        // Idempotent
        store.clear_session().unwrap();
    }

    #[test]
    fn test_pending_registration_roundtrip() {
        let store = create_store();
        assert!(store.get_pending_registration().unwrap().is_none());

        let record = RegistrationRecord {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("5551234".to_string()),
            password: "secret".to_string(),
        };
        store.set_pending_registration(&record).unwrap();
        assert_eq!(store.get_pending_registration().unwrap(), Some(record));

        assert!(store.clear_pending_registration().unwrap());
        assert!(!store.clear_pending_registration().unwrap());
    }

    #[test]
    fn test_registration_record_uses_camel_case() {
        let record = RegistrationRecord {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("fullName"));
        assert!(!json.contains("full_name"));
        // phone is omitted when absent
        assert!(!json.contains("phone"));
    }

    #[test]
    fn test_unreadable_session_record_reads_as_none() {
        let storage = Box::new(MemoryStorage::new());
        storage.set(StorageKeys::USER, "not json").unwrap();
        let store = CredentialStore::new(storage);

        assert_eq!(store.get_session().unwrap(), None);
    }

    #[test]
    fn test_clear_session_reports_first_failure() {
        /// Storage whose deletes always fail
        struct FailingStorage;

        impl SecureStorage for FailingStorage {
            fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
                Ok(())
            }
            fn get(&self, _key: &str) -> StorageResult<Option<String>> {
                Ok(None)
            }
            fn delete(&self, key: &str) -> StorageResult<bool> {
                Err(StorageError::Backend(format!("cannot remove {}", key)))
            }
        }

        let store = CredentialStore::new(Box::new(FailingStorage));
        let err = store.clear_session().unwrap_err();
        assert!(err.to_string().contains("userToken"));
    }
}
