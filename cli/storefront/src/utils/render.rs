//! Terminal rendering of the home page and product details.

use std::fmt::{self, Display};

use crossterm::style::Stylize;
use storefront_client::Product;
use storefront_sdk::models::home::{HERO_TAGLINE, HERO_TITLE, HOME_CATEGORIES, HomeView};

pub const SEARCH_PROMPT: &str = "¿Qué estás buscando?";
const BACK_TO_TOP: &str = "↑ Volver arriba";

/// One entry of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Current(u32),
    Gap,
}

impl Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{page}"),
            PageItem::Current(page) => write!(f, "[{page}]"),
            PageItem::Gap => write!(f, "…"),
        }
    }
}

/// Pages to offer around `current`.
///
/// The first and last page and the neighbours of the current page are always listed,
/// longer runs in between collapse into a gap.
pub fn pagination_items(current: u32, total: u32) -> Vec<PageItem> {
    let mut listed = vec![
        1,
        current.saturating_sub(1),
        current,
        current.saturating_add(1),
        total,
    ];
    listed.retain(|page| (1..=total).contains(page));
    listed.sort_unstable();
    listed.dedup();

    let mut items = Vec::new();
    let mut last_listed = 0;
    for page in listed {
        if page - last_listed == 2 {
            items.push(PageItem::Page(page - 1));
        } else if page - last_listed > 2 {
            items.push(PageItem::Gap);
        }
        items.push(if page == current {
            PageItem::Current(page)
        } else {
            PageItem::Page(page)
        });
        last_listed = page;
    }
    items
}

/// The whole home page.
pub struct DisplayHome<'a> {
    pub view: &'a HomeView,
    pub width: usize,
}

impl<'a> DisplayHome<'a> {
    pub fn new(view: &'a HomeView) -> Self {
        Self {
            view,
            width: textwrap::termwidth(),
        }
    }
}

impl Display for DisplayHome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HERO_TITLE.bold())?;
        writeln!(f, "{HERO_TAGLINE}")?;
        writeln!(f, "🔍 {SEARCH_PROMPT}")?;
        writeln!(f)?;

        let categories = HOME_CATEGORIES
            .iter()
            .map(|category| format!("[{category}]"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "{}", textwrap::fill(&categories, self.width))?;
        writeln!(f)?;

        if self.view.loading {
            writeln!(f, "Cargando productos...")?;
        } else if self.view.featured.is_empty() {
            writeln!(f, "No hay productos disponibles.")?;
        } else {
            writeln!(f, "{}", "Productos destacados".bold())?;
            for product in &self.view.featured {
                write!(f, "{}", DisplayProductCard {
                    product,
                    width: self.width,
                })?;
            }
        }

        if self.view.show_pagination() {
            let items = pagination_items(self.view.current_page.get(), self.view.total_pages.get())
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f)?;
            writeln!(f, "‹ {items} ›")?;
        }

        writeln!(f)?;
        write!(f, "{BACK_TO_TOP}")
    }
}

/// A product in the featured grid.
struct DisplayProductCard<'a> {
    product: &'a Product,
    width: usize,
}

impl Display for DisplayProductCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let product = self.product;
        writeln!(f, "  #{} {}", product.id_product, product.name.as_str().bold())?;
        if let Some(image) = product.cover_image() {
            writeln!(f, "      {image}")?;
        }
        if !product.description.is_empty() {
            writeln!(f, "{}", indented(&product.description, self.width))?;
        }
        Ok(())
    }
}

/// Everything known about a single product.
pub struct DisplayProduct<'a> {
    pub product: &'a Product,
    pub width: usize,
}

impl<'a> DisplayProduct<'a> {
    pub fn new(product: &'a Product) -> Self {
        Self {
            product,
            width: textwrap::termwidth(),
        }
    }
}

impl Display for DisplayProduct<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let product = self.product;
        writeln!(f, "{} (#{})", product.name.as_str().bold(), product.id_product)?;
        if let Some(price) = product.price {
            writeln!(f, "  Precio: {price:.2}")?;
        }
        if let Some(category) = &product.category {
            let label = category
                .get("name")
                .and_then(|name| name.as_str())
                .or_else(|| category.as_str());
            if let Some(label) = label {
                writeln!(f, "  Categoría: {label}")?;
            }
        }
        if !product.description.is_empty() {
            writeln!(f, "{}", indented(&product.description, self.width))?;
        }
        for image in &product.image_urls {
            writeln!(f, "  {image}")?;
        }
        Ok(())
    }
}

fn indented(text: &str, width: usize) -> String {
    let options = textwrap::Options::new(width.max(20))
        .initial_indent("      ")
        .subsequent_indent("      ");
    textwrap::fill(text, options)
}
