//! The home page: what it shows and how it reacts to the user.

use std::num::NonZeroU32;

use rand::Rng;
use storefront_client::{ClientTrait, Product, ProductId, UiPage, display_chain};
use tracing::debug;

use super::notification::Notification;
use super::page::{LoadOutcome, PageController, PageError};

pub const HERO_TITLE: &str = "Bienvenido a Clave & Compas";
pub const HERO_TAGLINE: &str = "Tu ritmo, nuestro sonido.";

/// Categories offered as shortcuts on the home page.
pub const HOME_CATEGORIES: [&str; 5] = [
    "Cuerda",
    "Percusión",
    "Viento",
    "Audio Profesional",
    "Instrumentos Electrónicos",
];

/// Everything needed to render the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub featured: Vec<Product>,
    pub current_page: UiPage,
    pub total_pages: NonZeroU32,
    /// Set while a fetch is in flight.
    ///
    /// [`PageController::load`](super::page::PageController::load) holds the controller
    /// for the whole fetch, so views taken from the controller always see `false`.
    /// Front-ends that render while waiting build the loading view themselves.
    pub loading: bool,
}

impl HomeView {
    pub fn show_pagination(&self) -> bool {
        self.total_pages.get() > 1
    }
}

/// Input from the user while the home page is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeEvent {
    /// Go to the 1-based page.
    RequestPage(u32),
    NextPage,
    PreviousPage,
    ViewDetail(ProductId),
    Search(String),
    Quit,
}

/// What the presentation layer should do after an event.
#[derive(Debug)]
pub enum HomeAction {
    Render,
    ShowDetail(Product),
    Notify(Notification),
    Quit,
}

/// Apply `event` to the controller.
pub async fn handle_event<C, R>(
    controller: &mut PageController<C, R>,
    event: HomeEvent,
) -> Vec<HomeAction>
where
    C: ClientTrait,
    R: Rng,
{
    let result = match event {
        HomeEvent::RequestPage(page) => controller.request_page(page).await,
        HomeEvent::NextPage => controller.next_page().await,
        HomeEvent::PreviousPage => controller.previous_page().await,
        HomeEvent::ViewDetail(id) => return show_detail(controller.products(), id),
        HomeEvent::Search(query) => {
            debug!(%query, "search is not wired to the backend");
            return vec![];
        },
        HomeEvent::Quit => return vec![HomeAction::Quit],
    };

    match result {
        Ok(LoadOutcome::Loaded) => vec![HomeAction::Render],
        Ok(LoadOutcome::Unchanged) => vec![],
        Ok(LoadOutcome::Failed(err)) => vec![
            HomeAction::Notify(Notification::error(format!(
                "Could not load products: {}",
                display_chain(&err)
            ))),
            HomeAction::Render,
        ],
        Err(err @ PageError::OutOfRange { .. }) => {
            vec![HomeAction::Notify(Notification::error(err.to_string()))]
        },
    }
}

fn show_detail(products: &[Product], id: ProductId) -> Vec<HomeAction> {
    match products.iter().find(|product| product.id_product == id) {
        Some(product) => vec![HomeAction::ShowDetail(product.clone())],
        None => vec![HomeAction::Notify(Notification::error(format!(
            "Product {id} is not on this page"
        )))],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storefront_client::MockClient;

    use super::*;
    use crate::models::notification::NotificationKind;
    use crate::models::page::tests::{controller, page};

    fn notification(actions: &[HomeAction]) -> Option<&Notification> {
        actions.iter().find_map(|action| match action {
            HomeAction::Notify(notification) => Some(notification),
            _ => None,
        })
    }

    #[tokio::test]
    async fn next_page_renders() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 2, 0));
        client.push_product_page(page(10..12, 2, 1));

        let mut controller = controller(client);
        controller.load().await;
        let actions = handle_event(&mut controller, HomeEvent::NextPage).await;

        assert!(matches!(actions[..], [HomeAction::Render]));
        let view = controller.view();
        assert_eq!(view.current_page.get(), 2);
        assert_eq!(view.featured.len(), 2);
        assert!(view.show_pagination());
    }

    #[tokio::test]
    async fn out_of_range_notifies_without_fetching() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));

        let mut controller = controller(client.clone());
        controller.load().await;
        let actions = handle_event(&mut controller, HomeEvent::RequestPage(4)).await;

        let notification = notification(&actions).unwrap();
        assert_eq!(notification.kind(), NotificationKind::Error);
        assert_eq!(
            notification.message(),
            "page 4 does not exist, the last page is 3"
        );
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_notifies_and_renders_previous_products() {
        let client = MockClient::default();
        client.push_product_page(page(0..10, 3, 0));
        client.push_error(500, "");

        let mut controller = controller(client);
        controller.load().await;
        let before = controller.view();
        let actions = handle_event(&mut controller, HomeEvent::RequestPage(3)).await;

        assert!(notification(&actions).is_some());
        assert!(matches!(actions.last(), Some(HomeAction::Render)));
        assert_eq!(controller.view(), before);
    }

    #[tokio::test]
    async fn view_detail_finds_product_on_current_page() {
        let client = MockClient::default();
        client.push_product_page(page(0..15, 1, 0));

        let mut controller = controller(client);
        controller.load().await;

        let actions = handle_event(&mut controller, HomeEvent::ViewDetail(ProductId::new(12))).await;
        match &actions[..] {
            [HomeAction::ShowDetail(product)] => assert_eq!(product.id_product, ProductId::new(12)),
            other => panic!("unexpected actions: {other:?}"),
        }

        let actions = handle_event(&mut controller, HomeEvent::ViewDetail(ProductId::new(99))).await;
        assert_eq!(
            notification(&actions).unwrap().message(),
            "Product 99 is not on this page"
        );
    }

    #[tokio::test]
    async fn search_and_quit_do_not_fetch() {
        let client = MockClient::default();
        let mut controller = controller(client.clone());

        let actions = handle_event(&mut controller, HomeEvent::Search("guitarra".into())).await;
        assert!(actions.is_empty());

        let actions = handle_event(&mut controller, HomeEvent::Quit).await;
        assert!(matches!(actions[..], [HomeAction::Quit]));
        assert!(client.requests().is_empty());
    }
}
