use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_client::{ApiPage, ClientTrait, ProductPage, UiPage};
use tracing::instrument;

use crate::config::Config;
use crate::utils::init::init_client;
use crate::utils::message;

// List one page of products
#[derive(Bpaf, Clone, Debug)]
pub struct List {
    /// Page to list, starting at 1
    #[bpaf(long, short, argument("PAGE"), fallback(UiPage::FIRST.get()))]
    page: u32,

    /// Number of products per page (default: configured page size)
    #[bpaf(long, argument("SIZE"))]
    page_size: Option<NonZeroU32>,

    /// Print the page as JSON
    #[bpaf(long)]
    json: bool,
}

impl List {
    #[instrument(name = "list", skip_all, fields(page = self.page))]
    pub async fn handle(self, config: Config) -> Result<()> {
        let page = UiPage::new(self.page).context("Pages are numbered starting at 1")?;
        let page_size = self.page_size.unwrap_or(config.page_size);

        let client = init_client(&config)?;
        let products = client.list_products(ApiPage::from(page), page_size).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&products)?);
            return Ok(());
        }

        if products.items.is_empty() {
            message::plain("No products found.");
            return Ok(());
        }

        println!("{}", format_page(&products));
        Ok(())
    }
}

fn format_page(products: &ProductPage) -> String {
    let mut lines: Vec<String> = products
        .items
        .iter()
        .map(|product| format!("#{} {}", product.id_product, product.name))
        .collect();
    lines.push(format!(
        "Page {} of {}",
        UiPage::from(products.current_page_index),
        products.total_pages
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn shows_one_based_page_number() {
        let products = ProductPage {
            items: vec![
                serde_json::from_value(json!({ "idProduct": 3, "name": "Maracas" })).unwrap(),
                serde_json::from_value(json!({ "idProduct": 4, "name": "Güiro" })).unwrap(),
            ],
            total_pages: NonZeroU32::new(4).unwrap(),
            current_page_index: ApiPage::new(1),
        };

        assert_eq!(format_page(&products), "#3 Maracas\n#4 Güiro\nPage 2 of 4");
    }
}
