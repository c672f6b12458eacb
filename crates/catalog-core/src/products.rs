use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product scraped from a product page, normalized into the flat schema
/// written to `products.jsonl` and upserted to the destination table.
///
/// Built once per crawl from the page's embedded JSON and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Site product code (e.g. `"5BA285_2DXA_F0002_V_OOO"`); the upsert conflict key.
    pub product_code: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// List price.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Offer price, only set when it undercuts the list price.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    /// ISO 4217 currency code (e.g. `"EUR"`).
    pub currency: String,
    /// Price as the site renders it, e.g. `"€ 2,300"`.
    pub formatted_price: Option<String>,
    pub main_image: Option<String>,
    /// Gallery images in page order, excluding `main_image`.
    pub additional_images: Vec<String>,
    /// First breadcrumb entry.
    pub category: Option<String>,
    pub categories: Vec<String>,
    /// Attribute name to a string, or to an array of strings for multi-valued
    /// attributes such as sizes.
    pub attributes: Map<String, Value>,
    /// Page the record was scraped from.
    pub url: String,
    pub colors: Option<Value>,
    pub life_cycle: Option<String>,
    pub on_sale: Option<bool>,
    pub other_variants: Vec<Value>,
    pub size_codes: Vec<Value>,
    pub skus: Vec<Value>,
    /// The embedded product JSON exactly as decoded from the page.
    pub raw_data: Value,
}

impl ProductRecord {
    /// The price a shopper sees: the sale price when one exists, otherwise
    /// the list price.
    #[must_use]
    pub fn effective_price(&self) -> Option<Decimal> {
        self.sale_price.or(self.price)
    }

    /// Returns `true` if the record carries a sale price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }
}
