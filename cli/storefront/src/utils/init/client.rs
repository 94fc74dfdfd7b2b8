use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use storefront_client::{Client, MockClient, StorefrontClient, StorefrontClientConfig};
use tracing::debug;

use crate::config::Config;

/// Path to a JSON file of canned responses, replaces the HTTP client when set.
pub const STOREFRONT_MOCK_DATA_VAR: &str = "_STOREFRONT_USE_MOCK";

/// Initialize the product API client
///
/// - Initialize a mock client if `$_STOREFRONT_USE_MOCK` points to mock data
/// - Initialize an HTTP client for the configured base URL otherwise
pub fn init_client(config: &Config) -> Result<Client, anyhow::Error> {
    if let Ok(path_str) = std::env::var(STOREFRONT_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock storefront client");
        return Ok(MockClient::new(Some(path))?.into());
    }

    let mut extra_headers: BTreeMap<String, String> = BTreeMap::new();

    // Let the backend tell CI traffic apart
    if std::env::var("CI").is_ok() {
        extra_headers.insert("storefront-ci".to_string(), "true".to_string());
    };

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("storefront/{}", env!("CARGO_PKG_VERSION")));

    let client_config = StorefrontClientConfig {
        base_url: config.base_url.to_string(),
        extra_headers,
        user_agent: Some(user_agent),
    };

    debug!("using storefront client with url: {}", config.base_url);
    let client =
        StorefrontClient::new(client_config).context("Could not create storefront client")?;
    Ok(client.into())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn missing_mock_file_is_an_error() {
        temp_env::with_var(STOREFRONT_MOCK_DATA_VAR, Some("/does/not/exist.json"), || {
            let err = init_client(&Config::default()).unwrap_err();
            assert!(err.to_string().contains("doesn't exist"));
        });
    }

    #[test]
    #[serial]
    fn mock_file_selects_mock_client() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        temp_env::with_var(STOREFRONT_MOCK_DATA_VAR, Some(file.path()), || {
            let client = init_client(&Config::default()).unwrap();
            assert!(matches!(client, Client::Mock(_)));
        });
    }

    #[test]
    #[serial]
    fn http_client_uses_configured_url() {
        temp_env::with_var_unset(STOREFRONT_MOCK_DATA_VAR, || {
            let config = Config {
                base_url: "http://localhost:8080/api".parse().unwrap(),
                ..Config::default()
            };
            let client = init_client(&config).unwrap();
            let Client::Storefront(client) = client else {
                panic!("expected an HTTP client");
            };
            assert_eq!(client.base_url().as_str(), "http://localhost:8080/api");
        });
    }
}
