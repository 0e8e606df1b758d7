use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use memoshare_core::config::SharedStore;
use memoshare_core::secret_store::KeyringSecretStore;

use crate::error::CliError;

/// Shared store for `--group-dir`, or the default location.
pub fn open_store(group_dir: Option<PathBuf>) -> SharedStore {
    match group_dir {
        Some(group_dir) => SharedStore::new(group_dir, KeyringSecretStore::default()),
        None => SharedStore::open_default(),
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}
