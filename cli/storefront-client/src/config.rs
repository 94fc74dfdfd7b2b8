//! Configuration types for storefront client construction.

use std::collections::BTreeMap;

/// Configuration for storefront client construction.
#[derive(Debug, Clone, Default)]
pub struct StorefrontClientConfig {
    /// Base URL of the product API, e.g. `https://shop.example/api`.
    ///
    /// Endpoints are appended as path segments,
    /// so a trailing slash is neither required nor harmful.
    pub base_url: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional user agent to send instead of reqwest's default.
    pub user_agent: Option<String>,
}

impl StorefrontClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}
