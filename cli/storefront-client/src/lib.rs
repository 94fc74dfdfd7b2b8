//! HTTP client for the storefront product API.
//!
//! This crate provides:
//! - A client for the product service with an injected base URL
//! - Normalization of the paged product listing
//! - An injectable error reporter so callers can observe failed requests
//! - A mock client that replays canned responses, for tests and offline use
//!
//! ## Usage
//!
//! ```ignore
//! use storefront_client::{ApiPage, ClientTrait, StorefrontClient, StorefrontClientConfig};
//!
//! let config = StorefrontClientConfig::new("https://shop.example/api");
//! let client = StorefrontClient::new(config)?;
//! let page = client.list_products(ApiPage::FIRST, DEFAULT_PAGE_SIZE).await;
//! ```

mod client;
mod config;
mod error;
mod mock;
mod reporter;
pub mod types;

pub use client::{Client, ClientTrait, DEFAULT_PAGE_SIZE, StorefrontClient};
pub use config::StorefrontClientConfig;
pub use error::{StorefrontClientError, display_chain};
pub use mock::{GenericResponse, MockClient, MockDataError, MockRequest, Response};
pub use reporter::{ErrorReporter, Operation, RecordingReporter, TracingReporter};
pub use types::{ApiPage, Category, Product, ProductId, ProductInput, ProductPage, UiPage};
