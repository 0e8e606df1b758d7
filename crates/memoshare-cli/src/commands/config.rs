use memoshare_core::config::SharedStore;
use memoshare_core::credentials::{non_blank, parse_host, CredentialSource};
use memoshare_core::secret_store::SecretStore;
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::error::CliError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigSummary {
    pub config_path: String,
    pub host: Option<String>,
    pub open_id: Option<String>,
    pub access_token_set: bool,
}

pub fn run_config<S: SecretStore>(
    command: ConfigCommands,
    store: &SharedStore<S>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Set {
            host,
            open_id,
            access_token,
        } => {
            run_config_set(store, host, open_id, access_token)?;
            println!("Saved shared configuration to {}", store.config_path().display());
            Ok(())
        }
        ConfigCommands::Show { json } => {
            let summary = describe_config(store);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("config:       {}", summary.config_path);
                println!("host:         {}", summary.host.as_deref().unwrap_or("(not set)"));
                println!(
                    "openId:       {}",
                    summary.open_id.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "access token: {}",
                    if summary.access_token_set {
                        "stored"
                    } else {
                        "(not set)"
                    }
                );
            }
            Ok(())
        }
        ConfigCommands::Clear => {
            store.clear()?;
            println!("Cleared shared configuration");
            Ok(())
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn run_config_set<S: SecretStore>(
    store: &SharedStore<S>,
    host: Option<String>,
    open_id: Option<String>,
    access_token: Option<String>,
) -> Result<(), CliError> {
    if host.is_none() && open_id.is_none() && access_token.is_none() {
        return Err(CliError::Config(
            "nothing to set; pass --host, --open-id, or --access-token".to_string(),
        ));
    }

    let mut config = store.load();
    if let Some(host) = non_blank(host) {
        parse_host(&host).map_err(|_| {
            CliError::Config(format!("'{host}' is not an http:// or https:// URL"))
        })?;
        config.host = Some(host);
    }
    if open_id.is_some() {
        config.open_id = non_blank(open_id);
    }
    store.save(&config)?;

    if let Some(access_token) = non_blank(access_token) {
        store.save_access_token(&access_token)?;
    }
    Ok(())
}

pub fn describe_config<S: SecretStore>(store: &SharedStore<S>) -> ConfigSummary {
    let config = store.load();
    let access_token_set = match store.access_token() {
        Ok(token) => token.is_some(),
        Err(error) => {
            tracing::warn!("Failed to read access token: {}", error);
            false
        }
    };

    ConfigSummary {
        config_path: store.config_path().display().to_string(),
        host: config.host,
        open_id: config.open_id,
        access_token_set,
    }
}
