//! Shared configuration store.
//!
//! The share surface, the heatmap refresher, and the main app all read the
//! same group directory: `shared-config.json` holds the memos host and the
//! optional openId, while the access token lives in a [`SecretStore`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::credentials::{non_blank, CredentialSource};
use crate::secret_store::{KeyringSecretStore, SecretStore, SECRET_ACCESS_TOKEN};
use crate::Result;

const SHARED_CONFIG_FILE: &str = "shared-config.json";
const ENV_GROUP_DIR: &str = "MEMOSHARE_GROUP_DIR";

/// Non-secret values of the shared store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub open_id: Option<String>,
}

impl SharedConfig {
    pub fn from_raw(host: Option<String>, open_id: Option<String>) -> Self {
        Self {
            host: non_blank(host),
            open_id: non_blank(open_id),
        }
    }
}

/// Directory shared between every surface of the app.
///
/// `MEMOSHARE_GROUP_DIR` overrides the platform config directory.
pub fn default_group_dir() -> PathBuf {
    if let Some(path) = std::env::var_os(ENV_GROUP_DIR).map(PathBuf::from) {
        return path;
    }
    dirs::config_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("memoshare")
}

pub fn shared_config_path(group_dir: &Path) -> PathBuf {
    group_dir.join(SHARED_CONFIG_FILE)
}

/// Load the shared config; a missing or unreadable file is an empty config.
pub fn load_shared_config_from_path(path: &Path) -> SharedConfig {
    if !path.exists() {
        return SharedConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<SharedConfig>(&content) {
            Ok(config) => SharedConfig::from_raw(config.host, config.open_id),
            Err(error) => {
                tracing::warn!(
                    "Failed to parse shared config at {}: {}",
                    path.display(),
                    error
                );
                SharedConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!(
                "Failed to read shared config at {}: {}",
                path.display(),
                error
            );
            SharedConfig::default()
        }
    }
}

pub fn save_shared_config_to_path(config: &SharedConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let normalized = SharedConfig::from_raw(config.host.clone(), config.open_id.clone());
    let content = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// The shared store as seen by one process: config file plus secret holder.
#[derive(Debug, Clone)]
pub struct SharedStore<S: SecretStore = KeyringSecretStore> {
    group_dir: PathBuf,
    secrets: S,
}

impl SharedStore<KeyringSecretStore> {
    /// Store rooted at [`default_group_dir`] with the OS keyring.
    pub fn open_default() -> Self {
        Self::new(default_group_dir(), KeyringSecretStore::default())
    }
}

impl<S: SecretStore> SharedStore<S> {
    pub fn new(group_dir: impl Into<PathBuf>, secrets: S) -> Self {
        Self {
            group_dir: group_dir.into(),
            secrets,
        }
    }

    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }

    pub fn config_path(&self) -> PathBuf {
        shared_config_path(&self.group_dir)
    }

    pub fn load(&self) -> SharedConfig {
        load_shared_config_from_path(&self.config_path())
    }

    pub fn save(&self, config: &SharedConfig) -> Result<()> {
        save_shared_config_to_path(config, &self.config_path())
    }

    pub fn save_access_token(&self, token: &str) -> Result<()> {
        self.secrets.write_secret(SECRET_ACCESS_TOKEN, token)
    }

    /// Remove host, openId, and token.
    pub fn clear(&self) -> Result<()> {
        let path = self.config_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        self.secrets.delete_secret(SECRET_ACCESS_TOKEN)
    }
}

impl<S: SecretStore> CredentialSource for SharedStore<S> {
    fn host(&self) -> Result<Option<String>> {
        Ok(self.load().host)
    }

    fn open_id(&self) -> Result<Option<String>> {
        Ok(self.load().open_id)
    }

    fn access_token(&self) -> Result<Option<String>> {
        self.secrets.read_secret(SECRET_ACCESS_TOKEN)
    }
}
