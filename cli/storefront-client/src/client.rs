//! Storefront client for the product API.

use std::fmt::Debug;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontClientConfig;
use crate::error::StorefrontClientError;
use crate::mock::MockClient;
use crate::reporter::{ErrorReporter, Operation, TracingReporter};
use crate::types::{
    ApiPage,
    Category,
    Envelope,
    ListProductsResponse,
    Product,
    ProductId,
    ProductInput,
    ProductPage,
};

/// Number of products requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(10).unwrap();

/// The product API interface.
///
/// Implemented over HTTP by [`StorefrontClient`]
/// and with canned responses by [`MockClient`].
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Fetch one page of products.
    async fn try_list_products(
        &self,
        page: ApiPage,
        page_size: NonZeroU32,
    ) -> Result<ProductPage, StorefrontClientError>;

    /// Fetch one page of products, substituting an empty first page on failure.
    ///
    /// The failure is still passed to the client's error reporter.
    async fn list_products(&self, page: ApiPage, page_size: NonZeroU32) -> ProductPage {
        self.try_list_products(page, page_size)
            .await
            .unwrap_or_default()
    }

    async fn create_product(&self, product: &ProductInput)
    -> Result<Product, StorefrontClientError>;

    async fn update_product(
        &self,
        id: ProductId,
        product: &ProductInput,
    ) -> Result<Product, StorefrontClientError>;

    /// Remove a product.
    ///
    /// The backend exposes deletion as a `PUT` to the product without a body.
    async fn delete_product(&self, id: ProductId) -> Result<(), StorefrontClientError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StorefrontClientError>;
}

#[enum_dispatch(ClientTrait)]
#[derive(Debug)]
pub enum Client {
    Storefront(StorefrontClient),
    Mock(MockClient),
}

/// A client for the storefront product service.
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: Url,
    config: StorefrontClientConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new client from configuration, reporting errors via `tracing`.
    pub fn new(config: StorefrontClientConfig) -> Result<Self, StorefrontClientError> {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    pub fn with_reporter(
        config: StorefrontClientConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self, StorefrontClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| StorefrontClientError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            })?;
        if base_url.cannot_be_a_base() {
            return Err(StorefrontClientError::Other(format!(
                "'{}' cannot be used as a base url",
                config.base_url
            )));
        }

        let http = build_http_client(&config)?;

        Ok(Self {
            http,
            base_url,
            config,
            reporter,
        })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorefrontClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StorefrontClientError::Other(format!(
                    "'{}' cannot be used as a base url",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, StorefrontClientError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "sending storefront request");
        Ok(self.http.request(method, url))
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<String, StorefrontClientError> {
        let response = request
            .send()
            .await
            .map_err(StorefrontClientError::Transport)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(StorefrontClientError::Transport)?;

        if !status.is_success() {
            return Err(StorefrontClientError::Status { status, body });
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, StorefrontClientError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(StorefrontClientError::Decode)
    }

    fn report(&self, operation: Operation) -> impl Fn(&StorefrontClientError) + '_ {
        move |err| self.reporter.report(operation, err)
    }
}

impl ClientTrait for StorefrontClient {
    #[instrument(skip(self))]
    async fn try_list_products(
        &self,
        page: ApiPage,
        page_size: NonZeroU32,
    ) -> Result<ProductPage, StorefrontClientError> {
        let result = async {
            let request = self.request(Method::GET, &["products"])?.query(&[
                ("page", page.get()),
                ("pageSize", page_size.get()),
            ]);
            let response: ListProductsResponse = self.send(request).await?;
            Ok::<_, StorefrontClientError>(ProductPage::from(response))
        }
        .await;

        result.inspect_err(self.report(Operation::ListProducts))
    }

    #[instrument(skip_all, fields(name = %product.name))]
    async fn create_product(
        &self,
        product: &ProductInput,
    ) -> Result<Product, StorefrontClientError> {
        let result = async {
            let request = self.request(Method::POST, &["products"])?.json(product);
            let created: Envelope<Product> = self.send(request).await?;
            Ok::<_, StorefrontClientError>(created.into_inner())
        }
        .await;

        result.inspect_err(self.report(Operation::CreateProduct))
    }

    #[instrument(skip(self, product))]
    async fn update_product(
        &self,
        id: ProductId,
        product: &ProductInput,
    ) -> Result<Product, StorefrontClientError> {
        let result = async {
            let id = id.to_string();
            let request = self.request(Method::PUT, &["products", &id])?.json(product);
            let updated: Envelope<Product> = self.send(request).await?;
            Ok::<_, StorefrontClientError>(updated.into_inner())
        }
        .await;

        result.inspect_err(self.report(Operation::UpdateProduct))
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), StorefrontClientError> {
        let result = async {
            let id = id.to_string();
            let request = self.request(Method::PUT, &["products", &id])?;
            self.send_raw(request).await?;
            Ok::<_, StorefrontClientError>(())
        }
        .await;

        result.inspect_err(self.report(Operation::DeleteProduct))
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, StorefrontClientError> {
        let result = async {
            let request = self.request(Method::GET, &["categories"])?;
            let categories: Envelope<Vec<Category>> = self.send(request).await?;
            Ok::<_, StorefrontClientError>(categories.into_inner())
        }
        .await;

        result.inspect_err(self.report(Operation::ListCategories))
    }
}

fn build_http_client(config: &StorefrontClientConfig) -> Result<reqwest::Client, StorefrontClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key)
                .map_err(|e| StorefrontClientError::Other(e.to_string()))?,
            header::HeaderValue::from_str(value)
                .map_err(|e| StorefrontClientError::Other(e.to_string()))?,
        );
    }

    debug!(
        base_url = %config.base_url,
        extra_headers = config.extra_headers.len(),
        "building storefront HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| StorefrontClientError::Other(e.to_string()))
}
