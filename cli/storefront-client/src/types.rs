//! Product, category and paging types exchanged with the product API.

use std::fmt;
use std::num::NonZeroU32;

use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a product as assigned by the backend (`idProduct`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    FromStr,
)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// A product as returned by the backend.
///
/// Fields this front-end does not interpret are kept in `extra`,
/// so a product can be read, modified and written back without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id_product: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// The image shown on product cards.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Request body for creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Product> for ProductInput {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            description: product.description,
            image_urls: product.image_urls,
            category: product.category,
            price: product.price,
            extra: product.extra,
        }
    }
}

/// A category exactly as returned by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(transparent)]
pub struct Category(Value);

impl Category {
    /// Label to show for this category.
    ///
    /// Categories are either plain strings or objects with a `name`.
    pub fn name(&self) -> Option<&str> {
        match &self.0 {
            Value::String(name) => Some(name),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

/// 1-based page number as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiPage(NonZeroU32);

impl UiPage {
    pub const FIRST: UiPage = UiPage(NonZeroU32::MIN);

    /// Returns `None` for page `0`, which does not exist in the UI.
    pub fn new(page: u32) -> Option<Self> {
        NonZeroU32::new(page).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for UiPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<NonZeroU32> for UiPage {
    fn from(page: NonZeroU32) -> Self {
        Self(page)
    }
}

/// 0-based page index as accepted by the backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
pub struct ApiPage(u32);

impl ApiPage {
    pub const FIRST: ApiPage = ApiPage(0);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<UiPage> for ApiPage {
    fn from(page: UiPage) -> Self {
        ApiPage(page.get() - 1)
    }
}

impl From<ApiPage> for UiPage {
    fn from(page: ApiPage) -> Self {
        UiPage(NonZeroU32::MIN.saturating_add(page.0))
    }
}

/// One page of products after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Total number of pages, never less than one.
    pub total_pages: NonZeroU32,
    /// The page the backend actually returned.
    pub current_page_index: ApiPage,
}

impl Default for ProductPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_pages: NonZeroU32::MIN,
            current_page_index: ApiPage::FIRST,
        }
    }
}

/// Wire format of `GET /products`.
///
/// `{ "response": { "content": [..], "totalPages": n, "number": k } }`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListProductsResponse {
    #[serde(default)]
    response: Option<PageBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageBody {
    #[serde(default)]
    content: Option<Vec<Product>>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
}

impl From<ListProductsResponse> for ProductPage {
    /// Missing content is an empty page,
    /// a missing or zero page count is one page,
    /// and a missing page index is the first page.
    fn from(response: ListProductsResponse) -> Self {
        let body = response.response.unwrap_or_default();
        ProductPage {
            items: body.content.unwrap_or_default(),
            total_pages: body
                .total_pages
                .and_then(NonZeroU32::new)
                .unwrap_or(NonZeroU32::MIN),
            current_page_index: ApiPage(body.number.unwrap_or_default()),
        }
    }
}

/// Single resources may come back bare or wrapped like the listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { response: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { response } => response,
            Envelope::Bare(inner) => inner,
        }
    }
}
