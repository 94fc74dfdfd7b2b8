use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bpaf::Bpaf;
use storefront_client::{ClientTrait, ProductId, ProductInput};
use tracing::instrument;

use crate::config::Config;
use crate::utils::dialog::{Confirm, Dialog};
use crate::utils::init::init_client;
use crate::utils::message;

fn read_product(path: &Path) -> Result<ProductInput> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Could not read product file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse product file {}", path.display()))
}

// Create a product
#[derive(Bpaf, Clone, Debug)]
pub struct Create {
    /// JSON file with the product fields
    #[bpaf(long, short, argument("FILE"))]
    file: PathBuf,
}

impl Create {
    #[instrument(name = "create", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let input = read_product(&self.file)?;
        let client = init_client(&config)?;

        let product = client
            .create_product(&input)
            .await
            .with_context(|| format!("Could not create product '{}'", input.name))?;

        message::created(format!(
            "Product '{}' created with id {}",
            product.name, product.id_product
        ));
        Ok(())
    }
}

// Update a product
#[derive(Bpaf, Clone, Debug)]
pub struct Update {
    /// JSON file with the product fields
    #[bpaf(long, short, argument("FILE"))]
    file: PathBuf,

    /// Id of the product to update
    #[bpaf(positional("ID"))]
    id: ProductId,
}

impl Update {
    #[instrument(name = "update", skip_all, fields(id = %self.id))]
    pub async fn handle(self, config: Config) -> Result<()> {
        let input = read_product(&self.file)?;
        let client = init_client(&config)?;

        let product = client
            .update_product(self.id, &input)
            .await
            .with_context(|| format!("Could not update product {}", self.id))?;

        message::updated(format!("Product '{}' updated", product.name));
        Ok(())
    }
}

// Delete a product
#[derive(Bpaf, Clone, Debug)]
pub struct Delete {
    /// Delete the product without confirmation.
    #[bpaf(short, long)]
    force: bool,

    /// Id of the product to delete
    #[bpaf(positional("ID"))]
    id: ProductId,
}

impl Delete {
    #[instrument(name = "delete", skip_all, fields(id = %self.id))]
    pub async fn handle(self, config: Config) -> Result<()> {
        let confirm = Dialog {
            message: "Are you sure?",
            help_message: Some("Use `-f` to force deletion"),
            typed: Confirm {
                default: Some(false),
            },
        };

        if !self.force && Dialog::can_prompt() && !confirm.prompt().await? {
            bail!("Product deletion cancelled");
        }

        let client = init_client(&config)?;
        client
            .delete_product(self.id)
            .await
            .with_context(|| format!("Could not delete product {}", self.id))?;

        message::deleted(format!("Product {} deleted", self.id));
        Ok(())
    }
}
