use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_client::{Category, ClientTrait};
use tracing::instrument;

use crate::config::Config;
use crate::utils::init::init_client;
use crate::utils::message;

// List product categories
#[derive(Bpaf, Clone, Debug)]
pub struct Categories {
    /// Print the categories as JSON
    #[bpaf(long)]
    json: bool,
}

impl Categories {
    #[instrument(name = "categories", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = init_client(&config)?;
        let categories = client
            .list_categories()
            .await
            .context("Could not load categories")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&categories)?);
            return Ok(());
        }

        if categories.is_empty() {
            message::plain("No categories found.");
            return Ok(());
        }

        for category in &categories {
            println!("{}", category_label(category));
        }
        Ok(())
    }
}

/// The category name, or its raw JSON if it has none.
fn category_label(category: &Category) -> String {
    match category.name() {
        Some(name) => name.to_string(),
        None => category.raw().to_string(),
    }
}
