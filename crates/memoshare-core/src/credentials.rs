//! Credential resolution from the shared store.

use std::fmt;

use url::Url;

use crate::{Error, Result};

/// Connection details for one memos server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Server base URL, always ending in `/`.
    pub host: Url,
    pub access_token: Option<String>,
    pub open_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("host", &self.host.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("open_id", &self.open_id)
            .finish()
    }
}

/// Read surface of the shared configuration store.
pub trait CredentialSource: Send + Sync {
    fn host(&self) -> Result<Option<String>>;
    fn open_id(&self) -> Result<Option<String>>;
    fn access_token(&self) -> Result<Option<String>>;
}

impl CredentialSource for Credentials {
    fn host(&self) -> Result<Option<String>> {
        Ok(Some(self.host.to_string()))
    }

    fn open_id(&self) -> Result<Option<String>> {
        Ok(self.open_id.clone())
    }

    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.access_token.clone())
    }
}

/// Resolve credentials for the current process.
///
/// Only a missing or unparsable host is fatal. The token and openId are
/// optional; a secure storage failure while reading the token is logged and
/// treated as "no token".
pub fn resolve_credentials<C>(source: &C) -> Result<Credentials>
where
    C: CredentialSource + ?Sized,
{
    let host = source
        .host()
        .map_err(|error| Error::NotAuthenticated(format!("failed to read host: {error}")))?;
    let host = non_blank(host)
        .ok_or_else(|| Error::NotAuthenticated("no memos host is configured".to_string()))?;
    let host = parse_host(&host)?;

    let access_token = match source.access_token() {
        Ok(token) => non_blank(token),
        Err(error) => {
            tracing::warn!("Failed to read memos access token: {}", error);
            None
        }
    };
    let open_id = match source.open_id() {
        Ok(open_id) => non_blank(open_id),
        Err(error) => {
            tracing::warn!("Failed to read memos openId: {}", error);
            None
        }
    };

    Ok(Credentials {
        host,
        access_token,
        open_id,
    })
}

/// Trim a stored value, treating blank text the same as a missing one.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a configured host into a base URL suitable for joining API paths.
pub fn parse_host(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|error| Error::NotAuthenticated(format!("invalid memos host '{raw}': {error}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::NotAuthenticated(format!(
            "memos host must be an http:// or https:// URL, got '{raw}'"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SharedConfig, SharedStore};
    use crate::error::ErrorKind;
    use crate::secret_store::{
        KeyringSecretStore, MemorySecretStore, SecretStore, SECRET_ACCESS_TOKEN,
    };

    struct FailingTokenSource;

    impl CredentialSource for FailingTokenSource {
        fn host(&self) -> Result<Option<String>> {
            Ok(Some("https://memos.example.com".to_string()))
        }

        fn open_id(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn access_token(&self) -> Result<Option<String>> {
            Err(Error::SecureStorage("locked".to_string()))
        }
    }

    fn store_with_host(host: Option<&str>) -> (tempfile::TempDir, SharedStore<MemorySecretStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SharedStore::new(dir.path(), MemorySecretStore::default());
        store
            .save(&SharedConfig::from_raw(host.map(str::to_string), None))
            .unwrap();
        (dir, store)
    }

    #[test]
    fn missing_host_is_not_authenticated() {
        let (_dir, store) = store_with_host(None);
        let error = resolve_credentials(&store).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
    }

    #[test]
    fn unparsable_host_is_not_authenticated() {
        let (_dir, store) = store_with_host(Some("not a url"));
        let error = resolve_credentials(&store).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);

        let (_dir, store) = store_with_host(Some("ftp://memos.example.com"));
        let error = resolve_credentials(&store).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
    }

    #[test]
    fn token_is_optional() {
        let (_dir, store) = store_with_host(Some("https://memos.example.com"));
        let credentials = resolve_credentials(&store).unwrap();
        assert_eq!(credentials.host.as_str(), "https://memos.example.com/");
        assert_eq!(credentials.access_token, None);
        assert_eq!(credentials.open_id, None);
    }

    #[test]
    fn token_and_open_id_are_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = MemorySecretStore::default();
        secrets.write_secret(SECRET_ACCESS_TOKEN, "tok").unwrap();
        let store = SharedStore::new(dir.path(), secrets);
        store
            .save(&SharedConfig::from_raw(
                Some("http://localhost:5230/memos".to_string()),
                Some("oid".to_string()),
            ))
            .unwrap();

        let credentials = resolve_credentials(&store).unwrap();
        assert_eq!(credentials.host.as_str(), "http://localhost:5230/memos/");
        assert_eq!(credentials.access_token.as_deref(), Some("tok"));
        assert_eq!(credentials.open_id.as_deref(), Some("oid"));
    }

    #[test]
    fn token_read_failure_degrades_to_anonymous() {
        let credentials = resolve_credentials(&FailingTokenSource).unwrap();
        assert_eq!(credentials.access_token, None);
    }

    #[test]
    fn blank_values_count_as_missing() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" \n\t ".to_string())), None);
        assert_eq!(
            non_blank(Some(" https://memos.example.com ".to_string())).as_deref(),
            Some("https://memos.example.com")
        );
    }

    #[test]
    fn whitespace_token_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = MemorySecretStore::default();
        let store = SharedStore::new(dir.path(), secrets);
        store
            .save(&SharedConfig::from_raw(
                Some("https://memos.example.com".to_string()),
                Some("   ".to_string()),
            ))
            .unwrap();

        let credentials = resolve_credentials(&store).unwrap();
        assert_eq!(credentials.open_id, None);
        assert_eq!(credentials.access_token, None);
    }

    #[test]
    #[ignore = "needs an OS keyring"]
    fn keyring_backed_store_resolves_saved_token() {
        let dir = tempfile::tempdir().unwrap();
        let service_name = format!("memoshare-test-{}", uuid::Uuid::now_v7());
        let store = SharedStore::new(
            dir.path(),
            KeyringSecretStore::with_service_name(service_name.clone()),
        );
        store
            .save(&SharedConfig::from_raw(
                Some("https://memos.example.com".to_string()),
                None,
            ))
            .unwrap();
        store.save_access_token("keyring-token").unwrap();

        // A second handle on the same group dir sees the token written by the first.
        let reopened = SharedStore::new(
            dir.path(),
            KeyringSecretStore::with_service_name(service_name),
        );
        let credentials = resolve_credentials(&reopened).unwrap();
        assert_eq!(credentials.access_token.as_deref(), Some("keyring-token"));

        reopened.clear().unwrap();
        assert_eq!(resolve_credentials(&store).unwrap().access_token, None);
    }

    #[test]
    fn debug_output_redacts_token() {
        let credentials = Credentials {
            host: parse_host("https://memos.example.com").unwrap(),
            access_token: Some("super-secret".to_string()),
            open_id: None,
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
