//! A client that replays canned responses instead of talking to the service.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ClientTrait;
use crate::error::StorefrontClientError;
use crate::reporter::{ErrorReporter, Operation, TracingReporter};
use crate::types::{ApiPage, Category, Product, ProductId, ProductInput, ProductPage};

#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("failed to read mock response file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse mock response file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A non-success answer from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

/// One canned response, consumed by the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    ProductPage(ProductPage),
    Product(Product),
    Categories(Vec<Category>),
    Deleted,
    Error(GenericResponse),
}

impl Response {
    fn kind(&self) -> &'static str {
        match self {
            Response::ProductPage(_) => "product page",
            Response::Product(_) => "product",
            Response::Categories(_) => "categories",
            Response::Deleted => "deleted",
            Response::Error(_) => "error",
        }
    }
}

/// A request as seen by [`MockClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    ListProducts { page: ApiPage, page_size: NonZeroU32 },
    CreateProduct(ProductInput),
    UpdateProduct(ProductId, ProductInput),
    DeleteProduct(ProductId),
    ListCategories,
}

/// Replays [`Response`]s in the order they were pushed
/// and records every request it receives.
#[derive(Debug, Clone)]
pub struct MockClient {
    mock_responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self {
            mock_responses: Default::default(),
            requests: Default::default(),
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl MockClient {
    /// Create a mock client, optionally preloaded with responses from a JSON file.
    ///
    /// The file holds a list of [`Response`]s.
    pub fn new(mock_data_path: Option<impl AsRef<Path>>) -> Result<Self, MockDataError> {
        let client = Self::default();
        if let Some(path) = mock_data_path {
            let responses = read_mock_responses(path.as_ref())?;
            client.push_responses(responses);
        }
        Ok(client)
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn push_responses(&self, responses: impl IntoIterator<Item = Response>) {
        if let Ok(mut queue) = self.mock_responses.lock() {
            queue.extend(responses);
        }
    }

    pub fn push_product_page(&self, page: ProductPage) {
        self.push_responses([Response::ProductPage(page)]);
    }

    pub fn push_product(&self, product: Product) {
        self.push_responses([Response::Product(product)]);
    }

    pub fn push_categories(&self, categories: Vec<Category>) {
        self.push_responses([Response::Categories(categories)]);
    }

    pub fn push_error(&self, status: u16, body: impl Into<String>) {
        self.push_responses([Response::Error(GenericResponse {
            status,
            body: body.into(),
        })]);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.mock_responses
            .lock()
            .map(|queue| queue.len())
            .unwrap_or_default()
    }

    /// Record `request`, then pop the next response and hand it to `extract`.
    fn respond<T>(
        &self,
        operation: Operation,
        request: MockRequest,
        expected: &str,
        extract: impl FnOnce(Response) -> Result<T, Response>,
    ) -> Result<T, StorefrontClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let next = self
            .mock_responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());

        let result = match next {
            None => Err(StorefrontClientError::Other(format!(
                "expected {expected} mock response, found nothing"
            ))),
            Some(Response::Error(GenericResponse { status, body })) => {
                Err(match StatusCode::from_u16(status) {
                    Ok(status) => StorefrontClientError::Status { status, body },
                    Err(_) => StorefrontClientError::Other(format!(
                        "invalid mock status code {status}"
                    )),
                })
            },
            Some(response) => extract(response).map_err(|other| {
                StorefrontClientError::Other(format!(
                    "expected {expected} mock response, found {}",
                    other.kind()
                ))
            }),
        };

        result.inspect_err(|err| self.reporter.report(operation, err))
    }
}

fn read_mock_responses(path: &Path) -> Result<Vec<Response>, MockDataError> {
    let contents = fs::read_to_string(path).map_err(|source| MockDataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| MockDataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ClientTrait for MockClient {
    async fn try_list_products(
        &self,
        page: ApiPage,
        page_size: NonZeroU32,
    ) -> Result<ProductPage, StorefrontClientError> {
        self.respond(
            Operation::ListProducts,
            MockRequest::ListProducts { page, page_size },
            "product page",
            |response| match response {
                Response::ProductPage(page) => Ok(page),
                other => Err(other),
            },
        )
    }

    async fn create_product(
        &self,
        product: &ProductInput,
    ) -> Result<Product, StorefrontClientError> {
        self.respond(
            Operation::CreateProduct,
            MockRequest::CreateProduct(product.clone()),
            "product",
            |response| match response {
                Response::Product(product) => Ok(product),
                other => Err(other),
            },
        )
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: &ProductInput,
    ) -> Result<Product, StorefrontClientError> {
        self.respond(
            Operation::UpdateProduct,
            MockRequest::UpdateProduct(id, product.clone()),
            "product",
            |response| match response {
                Response::Product(product) => Ok(product),
                other => Err(other),
            },
        )
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StorefrontClientError> {
        self.respond(
            Operation::DeleteProduct,
            MockRequest::DeleteProduct(id),
            "deleted",
            |response| match response {
                Response::Deleted => Ok(()),
                other => Err(other),
            },
        )
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StorefrontClientError> {
        self.respond(
            Operation::ListCategories,
            MockRequest::ListCategories,
            "categories",
            |response| match response {
                Response::Categories(categories) => Ok(categories),
                other => Err(other),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::DEFAULT_PAGE_SIZE;
    use crate::reporter::RecordingReporter;

    #[tokio::test]
    async fn replays_responses_in_order() {
        let client = MockClient::default();
        client.push_product_page(ProductPage::default());
        client.push_responses([Response::Deleted]);

        let page = client
            .try_list_products(ApiPage::new(1), DEFAULT_PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(page, ProductPage::default());
        client.delete_product(ProductId::new(9)).await.unwrap();

        assert_eq!(client.remaining(), 0);
        assert_eq!(client.requests(), vec![
            MockRequest::ListProducts {
                page: ApiPage::new(1),
                page_size: DEFAULT_PAGE_SIZE,
            },
            MockRequest::DeleteProduct(ProductId::new(9)),
        ]);
    }

    #[tokio::test]
    async fn error_response_becomes_status_error() {
        let reporter = RecordingReporter::new();
        let client = MockClient::default().with_reporter(Arc::new(reporter.clone()));
        client.push_error(503, "");

        let err = client.list_categories().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(reporter.reports()[0].0, Operation::ListCategories);
    }

    #[tokio::test]
    async fn empty_queue_fails_listing_softly() {
        let client = MockClient::default();
        let page = client
            .list_products(ApiPage::FIRST, DEFAULT_PAGE_SIZE)
            .await;
        assert_eq!(page, ProductPage::default());
    }

    #[tokio::test]
    async fn mismatched_response_is_an_error() {
        let client = MockClient::default();
        client.push_categories(vec![]);

        let err = client
            .create_product(&ProductInput::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected product mock response, found categories"
        );
    }

    #[tokio::test]
    async fn reads_responses_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let contents = json!([
            { "product_page": {
                "items": [{ "idProduct": 1, "name": "Bajo" }],
                "total_pages": 2,
                "current_page_index": 0,
            }},
            { "error": { "status": 500 } },
        ]);
        write!(file, "{contents}").unwrap();

        let client = MockClient::new(Some(file.path())).unwrap();
        let page = client
            .try_list_products(ApiPage::FIRST, DEFAULT_PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(page.items[0].name, "Bajo");
        assert_eq!(page.total_pages.get(), 2);

        let page = client.list_products(ApiPage::new(1), DEFAULT_PAGE_SIZE).await;
        assert_eq!(page, ProductPage::default());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = MockClient::new(Some("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, MockDataError::Read { .. }));
    }
}
