//! Paging through the product listing.
//!
//! Users count pages from 1, the backend counts from 0.
//! [`PageController`] only ever stores the user-facing [`UiPage`]
//! and converts at the point where it calls the client.

use std::mem;
use std::num::NonZeroU32;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storefront_client::{
    ApiPage,
    ClientTrait,
    DEFAULT_PAGE_SIZE,
    Product,
    StorefrontClientError,
    UiPage,
};
use thiserror::Error;
use tracing::{debug, instrument};

use super::featured::{FEATURED_LIMIT, sample};
use super::home::HomeView;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page {requested} does not exist, the last page is {total_pages}")]
    OutOfRange { requested: u32, total_pages: u32 },
}

/// Result of a (re)load of the current page.
#[derive(Debug)]
pub enum LoadOutcome {
    /// New products were fetched and the featured selection was redrawn.
    Loaded,
    /// The fetch failed and the previous products are still shown.
    ///
    /// The error has already been passed to the client's reporter.
    Failed(StorefrontClientError),
    /// The requested page was already shown, nothing was fetched.
    Unchanged,
}

/// Owns the paging state of the home page.
#[derive(Debug)]
pub struct PageController<C, R = StdRng> {
    client: C,
    rng: R,
    page_size: NonZeroU32,
    current_page: UiPage,
    total_pages: NonZeroU32,
    products: Vec<Product>,
    featured: Vec<Product>,
    loading: bool,
}

impl<C: ClientTrait> PageController<C> {
    pub fn new(client: C) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }
}

impl<C: ClientTrait, R: Rng> PageController<C, R> {
    /// Create a controller that draws featured products from `rng`.
    pub fn with_rng(client: C, rng: R) -> Self {
        Self {
            client,
            rng,
            page_size: DEFAULT_PAGE_SIZE,
            current_page: UiPage::FIRST,
            total_pages: NonZeroU32::MIN,
            products: Vec::new(),
            featured: Vec::new(),
            loading: false,
        }
    }

    pub fn with_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn current_page(&self) -> UiPage {
        self.current_page
    }

    pub fn total_pages(&self) -> NonZeroU32 {
        self.total_pages
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Products of the last successfully fetched page.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn featured(&self) -> &[Product] {
        &self.featured
    }

    /// Only observable from inside [`PageController::load`].
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Whether a pagination control is worth showing.
    pub fn show_pagination(&self) -> bool {
        self.total_pages.get() > 1
    }

    pub fn view(&self) -> HomeView {
        HomeView {
            featured: self.featured.clone(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            loading: self.loading,
        }
    }

    /// Fetch the current page.
    ///
    /// On success the products and page count are replaced,
    /// the featured selection is redrawn,
    /// and the current page is set to the page the backend actually returned,
    /// capped at the last page.
    /// On failure all of that is left as it was.
    #[instrument(skip(self), fields(page = %self.current_page))]
    pub async fn load(&mut self) -> LoadOutcome {
        self.loading = true;
        let requested = self.current_page;
        let result = self
            .client
            .try_list_products(ApiPage::from(requested), self.page_size)
            .await;
        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                debug!("keeping previously loaded products");
                return LoadOutcome::Failed(err);
            },
        };

        self.total_pages = page.total_pages;
        self.featured = sample(&page.items, FEATURED_LIMIT, &mut self.rng);
        self.products = page.items;

        // a page index past the page count would leave no page to move to
        let returned = UiPage::from(page.current_page_index).min(UiPage::from(self.total_pages));
        if returned != requested {
            debug!(%requested, %returned, "backend returned a different page");
            self.current_page = returned;
        }

        debug!(
            products = self.products.len(),
            total_pages = self.total_pages.get(),
            "loaded products"
        );
        LoadOutcome::Loaded
    }

    /// Switch to the 1-based `page` and fetch it.
    ///
    /// Pages outside `1..=total_pages` are rejected without fetching.
    /// If the fetch fails the previous page stays current.
    pub async fn request_page(&mut self, page: u32) -> Result<LoadOutcome, PageError> {
        let Some(target) = UiPage::new(page).filter(|target| target.get() <= self.total_pages.get())
        else {
            return Err(PageError::OutOfRange {
                requested: page,
                total_pages: self.total_pages.get(),
            });
        };

        if target == self.current_page {
            return Ok(LoadOutcome::Unchanged);
        }

        let previous = mem::replace(&mut self.current_page, target);
        let outcome = self.load().await;
        if let LoadOutcome::Failed(_) = outcome {
            self.current_page = previous;
        }
        Ok(outcome)
    }

    pub async fn next_page(&mut self) -> Result<LoadOutcome, PageError> {
        self.request_page(self.current_page.get().saturating_add(1))
            .await
    }

    pub async fn previous_page(&mut self) -> Result<LoadOutcome, PageError> {
        self.request_page(self.current_page.get() - 1).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use storefront_client::{MockClient, MockRequest, ProductId, ProductPage};

    use super::*;

    pub(crate) fn product(id: i64) -> Product {
        serde_json::from_value(json!({
            "idProduct": id,
            "name": format!("Producto {id}"),
            "description": "Descripción",
            "imageUrls": [format!("https://img.example/{id}.jpg")],
        }))
        .unwrap()
    }

    pub(crate) fn page(ids: std::ops::Range<i64>, total_pages: u32, index: u32) -> ProductPage {
        ProductPage {
            items: ids.map(product).collect(),
            total_pages: NonZeroU32::new(total_pages).unwrap(),
            current_page_index: ApiPage::new(index),
        }
    }

    pub(crate) fn controller(client: MockClient) -> PageController<MockClient> {
        PageController::with_rng(client, StdRng::seed_from_u64(42))
    }

    fn requested_pages(client: &MockClient) -> Vec<u32> {
        client
            .requests()
            .into_iter()
            .filter_map(|request| match request {
                MockRequest::ListProducts { page, .. } => Some(page.get()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn first_load_fetches_api_page_zero() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));

        let mut controller = controller(client.clone());
        let outcome = controller.load().await;

        assert!(matches!(outcome, LoadOutcome::Loaded));
        assert_eq!(requested_pages(&client), vec![0]);
        assert_eq!(controller.current_page(), UiPage::FIRST);
        assert_eq!(controller.total_pages().get(), 3);
        assert_eq!(controller.products().len(), 10);
        assert_eq!(controller.featured().len(), 10);
        assert!(controller.show_pagination());
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn page_change_fetches_previous_api_page() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));
        client.push_product_page(page(10..20, 3, 1));

        let mut controller = controller(client.clone());
        controller.load().await;
        let outcome = controller.request_page(2).await.unwrap();

        assert!(matches!(outcome, LoadOutcome::Loaded));
        assert_eq!(requested_pages(&client), vec![0, 1]);
        assert_eq!(controller.current_page().get(), 2);
        assert_eq!(controller.products()[0].id_product, ProductId::new(10));
    }

    #[tokio::test]
    async fn out_of_range_page_is_rejected_without_fetching() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));

        let mut controller = controller(client.clone());
        controller.load().await;

        assert_eq!(controller.request_page(4).await.unwrap_err(), PageError::OutOfRange {
            requested: 4,
            total_pages: 3
        });
        assert!(controller.request_page(0).await.is_err());
        assert!(controller.previous_page().await.is_err());
        assert_eq!(requested_pages(&client), vec![0]);
        assert_eq!(controller.current_page(), UiPage::FIRST);
    }

    #[tokio::test]
    async fn same_page_is_not_refetched() {
        let client = MockClient::default();
        client.push_product_page(page(0..3, 1, 0));

        let mut controller = controller(client.clone());
        controller.load().await;
        let outcome = controller.request_page(1).await.unwrap();

        assert!(matches!(outcome, LoadOutcome::Unchanged));
        assert_eq!(requested_pages(&client), vec![0]);
        assert!(!controller.show_pagination());
    }

    #[tokio::test]
    async fn current_page_follows_returned_page() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 5, 0));
        client.push_product_page(page(20..30, 5, 2));

        let mut controller = controller(client.clone());
        controller.load().await;
        controller.request_page(5).await.unwrap();

        assert_eq!(requested_pages(&client), vec![0, 4]);
        assert_eq!(controller.current_page().get(), 3);
    }

    #[tokio::test]
    async fn returned_page_past_the_end_is_capped() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));
        client.push_product_page(page(10..20, 3, 5));
        client.push_product_page(page(0..10, 3, 1));

        let mut controller = controller(client.clone());
        controller.load().await;
        controller.request_page(2).await.unwrap();

        assert_eq!(controller.current_page().get(), 3);
        assert_eq!(controller.next_page().await.unwrap_err(), PageError::OutOfRange {
            requested: 4,
            total_pages: 3
        });

        controller.previous_page().await.unwrap();
        assert_eq!(requested_pages(&client), vec![0, 1, 1]);
        assert_eq!(controller.current_page().get(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_state() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));
        client.push_error(500, "");

        let mut controller = controller(client.clone());
        controller.load().await;
        let featured = controller.featured().to_vec();

        let outcome = controller.next_page().await.unwrap();

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(requested_pages(&client), vec![0, 1]);
        assert_eq!(controller.current_page(), UiPage::FIRST);
        assert_eq!(controller.total_pages().get(), 3);
        assert_eq!(controller.products().len(), 10);
        assert_eq!(controller.featured(), &featured[..]);
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn failed_first_load_keeps_defaults() {
        let client = MockClient::default();
        client.push_error(502, "");

        let mut controller = controller(client);
        let outcome = controller.load().await;

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(controller.products().is_empty());
        assert_eq!(controller.total_pages(), NonZeroU32::MIN);
        assert!(!controller.show_pagination());
    }

    #[tokio::test]
    async fn featured_is_a_subset_of_a_short_page() {
        let client = MockClient::default();
        client.push_product_page(page(0..4, 1, 0));

        let mut controller = controller(client);
        controller.load().await;

        let mut featured: Vec<_> = controller
            .featured()
            .iter()
            .map(|product| product.id_product.get())
            .collect();
        featured.sort();
        assert_eq!(featured, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_page_clears_featured() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 2, 0));
        client.push_product_page(page(0..0, 2, 1));

        let mut controller = controller(client);
        controller.load().await;
        controller.next_page().await.unwrap();

        assert!(controller.products().is_empty());
        assert!(controller.featured().is_empty());
    }

    #[tokio::test]
    async fn page_size_is_sent() {
        let client = MockClient::default();
        client.push_product_page(ProductPage::default());

        let mut controller =
            controller(client.clone()).with_page_size(NonZeroU32::new(25).unwrap());
        controller.load().await;

        assert_eq!(client.requests(), vec![MockRequest::ListProducts {
            page: ApiPage::FIRST,
            page_size: NonZeroU32::new(25).unwrap(),
        }]);
    }

    proptest! {
        #[test]
        fn requested_ui_page_is_sent_as_api_page(total in 2u32..50, target in 2u32..50) {
            prop_assume!(target <= total);

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let client = MockClient::default();
            client.push_product_page(page(0..1, total, 0));
            client.push_product_page(page(0..1, total, target - 1));

            let mut controller = controller(client.clone());
            runtime.block_on(async {
                controller.load().await;
                controller.request_page(target).await.unwrap();
            });

            prop_assert_eq!(requested_pages(&client), vec![0, target - 1]);
            prop_assert_eq!(controller.current_page().get(), target);
        }

        #[test]
        fn current_page_is_returned_index_plus_one(number in 0u32..100) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let client = MockClient::default();
            client.push_product_page(page(0..1, 100, number));

            let mut controller = controller(client);
            runtime.block_on(controller.load());

            prop_assert_eq!(controller.current_page().get(), number + 1);
        }
    }
}
