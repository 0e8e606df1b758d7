//! Secure secret storage for the memos access token.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use keyring::Entry;

use crate::credentials::non_blank;
use crate::{Error, Result};

pub const SECRET_SERVICE_NAME: &str = "memoshare";
pub const SECRET_ACCESS_TOKEN: &str = "memos_access_token";

/// Key/value secret holder shared by every surface of the app.
pub trait SecretStore: Send + Sync {
    fn read_secret(&self, name: &str) -> Result<Option<String>>;
    fn write_secret(&self, name: &str, value: &str) -> Result<()>;
    fn delete_secret(&self, name: &str) -> Result<()>;
}

/// OS keyring backed store.
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service_name: String,
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self {
            service_name: SECRET_SERVICE_NAME.to_string(),
        }
    }
}

impl KeyringSecretStore {
    #[must_use]
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self, name: &str) -> Result<Entry> {
        Entry::new(&self.service_name, name).map_err(map_keyring_error)
    }
}

impl SecretStore for KeyringSecretStore {
    fn read_secret(&self, name: &str) -> Result<Option<String>> {
        let entry = self.entry(name)?;
        match entry.get_password() {
            Ok(value) => Ok(non_blank(Some(value))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(map_keyring_error(error)),
        }
    }

    fn write_secret(&self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::SecureStorage(
                "secret value must not be empty".to_string(),
            ));
        }
        self.entry(name)?
            .set_password(value)
            .map_err(map_keyring_error)
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        let entry = self.entry(name)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(map_keyring_error(error)),
        }
    }
}

/// Process-local store, used by tests and headless environments without a keyring.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    secrets: Arc<Mutex<HashMap<String, String>>>,
}

impl SecretStore for MemorySecretStore {
    fn read_secret(&self, name: &str) -> Result<Option<String>> {
        let guard = self
            .secrets
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        Ok(guard.get(name).cloned())
    }

    fn write_secret(&self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::SecureStorage(
                "secret value must not be empty".to_string(),
            ));
        }
        let mut guard = self
            .secrets
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        guard.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        let mut guard = self
            .secrets
            .lock()
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        guard.remove(name);
        Ok(())
    }
}

fn map_keyring_error(error: keyring::Error) -> Error {
    match error {
        keyring::Error::NoEntry => Error::SecureStorage("secret does not exist".to_string()),
        other => Error::SecureStorage(other.to_string()),
    }
}
