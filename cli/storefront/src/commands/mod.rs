mod categories;
mod home;
mod list;
mod product;

use std::fmt;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;

use crate::config::Config;

static STOREFRONT_DESCRIPTION: &'_ str = indoc! {"
    Browse and manage the Clave & Compas instrument catalog from the terminal."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(STOREFRONT_DESCRIPTION))]
pub struct StorefrontCli(#[bpaf(external(storefront_args))] pub StorefrontArgs);

/// Main storefront args parser
///
/// To parse the full command line, use [`StorefrontCli`] via [`storefront_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)]
pub struct StorefrontArgs {
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl StorefrontArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Home(args) => args.handle(config).await?,
            Commands::List(args) => args.handle(config).await?,
            Commands::Categories(args) => args.handle(config).await?,
            Commands::Create(args) => args.handle(config).await?,
            Commands::Update(args) => args.handle(config).await?,
            Commands::Delete(args) => args.handle(config).await?,
        }
        Ok(())
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// Show the home page with featured products
    #[bpaf(command)]
    Home(#[bpaf(external(home::home))] home::Home),

    /// List one page of products
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),

    /// List product categories
    #[bpaf(command)]
    Categories(#[bpaf(external(categories::categories))] categories::Categories),

    /// Create a product from a JSON file
    #[bpaf(command)]
    Create(#[bpaf(external(product::create))] product::Create),

    /// Replace a product with the contents of a JSON file
    #[bpaf(command)]
    Update(#[bpaf(external(product::update))] product::Update),

    /// Delete a product
    #[bpaf(command)]
    Delete(#[bpaf(external(product::delete))] product::Delete),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command")
    }
}
