use std::collections::HashMap;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use log::debug;
use serde::{Deserialize, Serialize};
use storefront_client::DEFAULT_PAGE_SIZE;
use storefront_sdk::models::notification::DEFAULT_DISMISS_DELAY;
use url::Url;
use xdg::BaseDirectories;

/// Name of storefront managed directories
const STOREFRONT_DIR_NAME: &str = "storefront";
const STOREFRONT_CONFIG_DIR_VAR: &str = "STOREFRONT_CONFIG_DIR";
const STOREFRONT_ENV_PREFIX: &str = "STOREFRONT_";
pub const STOREFRONT_CONFIG_FILE: &str = "storefront.toml";

/// The deployed product API
pub const DEFAULT_BASE_URL: &str = "https://clavecompas-production.up.railway.app/clavecompas";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Base URL of the product API
    pub base_url: Url,
    /// Number of products requested per page
    pub page_size: NonZeroU32,
    /// Seconds until notifications are dismissed
    pub notification_timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
            notification_timeout_secs: DEFAULT_DISMISS_DELAY.as_secs(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default url is valid"))
}

impl Config {
    /// Creates a [Config] from defaults, config files and the environment
    ///
    /// Sources, later ones overriding earlier ones:
    ///
    /// - `/etc/storefront.toml`
    /// - `storefront/storefront.toml` in the XDG config directories
    /// - `$STOREFRONT_CONFIG_DIR/storefront.toml`
    /// - `$STOREFRONT_<KEY>` variables
    pub fn parse() -> Result<Config> {
        let raw = Self::raw_config()?;
        let config: Config = raw.try_deserialize().context("Could not parse config")?;
        debug!("using config: {config:?}");
        Ok(config)
    }

    fn raw_config() -> Result<HierarchicalConfig> {
        let defaults = Config::default();
        let mut builder = HierarchicalConfig::builder()
            .set_default("base_url", defaults.base_url.as_str())?
            .set_default("page_size", i64::from(defaults.page_size.get()))?
            .set_default(
                "notification_timeout_secs",
                defaults.notification_timeout_secs as i64,
            )?;

        // read from /etc
        builder = builder.add_source(
            config::File::from(PathBuf::from("/etc").join(STOREFRONT_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // look for files in XDG_CONFIG_DIRS locations
        let storefront_dirs = BaseDirectories::with_prefix(STOREFRONT_DIR_NAME);
        for file in storefront_dirs.find_config_files(STOREFRONT_CONFIG_FILE) {
            debug!("reading config file {file:?}");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }

        // Add explicit STOREFRONT_CONFIG_DIR file last
        if let Ok(config_dir) = env::var(STOREFRONT_CONFIG_DIR_VAR) {
            debug!("`${STOREFRONT_CONFIG_DIR_VAR}` set: {config_dir}");
            builder = builder.add_source(
                config::File::from(PathBuf::from(config_dir).join(STOREFRONT_CONFIG_FILE))
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        // override via env variables
        let storefront_envs: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k != STOREFRONT_CONFIG_DIR_VAR)
            .filter_map(|(k, v)| {
                k.strip_prefix(STOREFRONT_ENV_PREFIX)
                    .map(|k| (k.to_owned(), v))
            })
            .collect();

        let builder = builder.add_source(
            Environment::default()
                .source(Some(storefront_envs))
                .try_parsing(true),
        );

        Ok(builder.build()?)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}
