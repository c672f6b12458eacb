//! Conversion from the embedded product object to [`ProductRecord`].
//!
//! Lenient field reading lives in [`crate::fields`]; this module decides
//! which keys feed which record field and in what order of preference.

use catalog_core::ProductRecord;
use serde_json::Value;

use crate::client::SiteUrls;
use crate::embedded::extract_product_blob;
use crate::error::ParseError;
use crate::fields::{
    attribute_map, breadcrumb, category_from_url, currency_from_formatted, decimal_value,
    flag_value, summarize_prices, text_field, PriceSummary, DEFAULT_CURRENCY,
};

/// Keys tried in order for the product code.
const PRODUCT_CODE_KEYS: [&str; 3] = ["partNumber", "uniqueID", "mfPartNumber_ntk"];

/// Parses a fetched product page into a [`ProductRecord`].
///
/// # Errors
///
/// Returns [`ParseError::MissingBlob`] or [`ParseError::MalformedBlob`] if
/// the page has no decodable product object, and
/// [`ParseError::MissingProductCode`] if the object has no product code.
pub fn parse_product_page(
    html: &str,
    page_url: &str,
    site: &SiteUrls,
) -> Result<ProductRecord, ParseError> {
    let blob = extract_product_blob(html)?;
    normalize_product(blob, page_url, site)
}

/// Normalizes a decoded product object. The object is kept verbatim as
/// `raw_data`.
///
/// # Errors
///
/// Returns [`ParseError::MissingProductCode`] if none of `partNumber`,
/// `uniqueID`, or `mfPartNumber_ntk` holds a non-empty value.
pub fn normalize_product(
    blob: Value,
    page_url: &str,
    site: &SiteUrls,
) -> Result<ProductRecord, ParseError> {
    let product_code = PRODUCT_CODE_KEYS
        .iter()
        .find_map(|key| text_field(&blob, key))
        .ok_or(ParseError::MissingProductCode)?;

    let long_description = text_field(&blob, "longdescription");
    let short_description = text_field(&blob, "shortDescription");
    let description = match (&long_description, &short_description) {
        (Some(long), Some(short)) if long != short => {
            Some(format!("{long}\n\n{}", short.replace("---", "\n")))
        }
        (Some(long), _) => Some(long.clone()),
        (None, short) => short.clone(),
    };

    let prices = price_summary(&blob);
    let formatted_price = text_field(&blob, "formattedPrice").or_else(|| prices.formatted.clone());
    let currency = prices
        .currency
        .or_else(|| formatted_price.as_deref().and_then(currency_from_formatted))
        .unwrap_or(DEFAULT_CURRENCY)
        .to_owned();

    let main_image = text_field(&blob, "fullImage")
        .or_else(|| text_field(&blob, "thumbnail"))
        .map(|path| site.absolutize(&path));
    let additional_images = gallery_images(&blob, main_image.as_deref(), site);

    let mut categories = breadcrumb(&blob);
    if categories.is_empty() {
        categories.extend(category_from_url(page_url));
    }
    let category = categories.first().cloned();

    let other_variants = non_empty_array(&blob, "otherVariants")
        .or_else(|| non_empty_array(&blob, "colorVariants"))
        .unwrap_or_default();

    Ok(ProductRecord {
        product_code,
        title: text_field(&blob, "name"),
        description,
        short_description,
        price: prices.price(),
        sale_price: prices.sale_price(),
        currency,
        formatted_price,
        main_image,
        additional_images,
        category,
        categories,
        attributes: attribute_map(&blob),
        url: page_url.to_owned(),
        colors: blob.get("colors").filter(|v| !v.is_null()).cloned(),
        life_cycle: text_field(&blob, "lifeCycle"),
        on_sale: blob.get("onSale").and_then(flag_value),
        other_variants,
        size_codes: non_empty_array(&blob, "sizeCodes").unwrap_or_default(),
        skus: non_empty_array(&blob, "SKUs").unwrap_or_default(),
        raw_data: blob,
    })
}

/// Prices from the `price` array, or from scalar `price`/`salePrice` keys
/// when the array yields nothing.
fn price_summary(blob: &Value) -> PriceSummary {
    let summary = summarize_prices(blob.get("price"));
    if summary.price().is_some() {
        return summary;
    }
    PriceSummary {
        list: blob.get("price").and_then(decimal_value),
        offer: blob.get("salePrice").and_then(decimal_value),
        ..summary
    }
}

/// Absolute `attachments[].attachmentAssetPath` URLs in page order,
/// without duplicates or the main image.
fn gallery_images(blob: &Value, main_image: Option<&str>, site: &SiteUrls) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();
    let attachments = blob
        .get("attachments")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for attachment in attachments {
        let Some(path) = text_field(attachment, "attachmentAssetPath") else {
            continue;
        };
        let url = site.absolutize(&path);
        if Some(url.as_str()) != main_image && !images.contains(&url) {
            images.push(url);
        }
    }

    images
}

fn non_empty_array(blob: &Value, key: &str) -> Option<Vec<Value>> {
    blob.get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .cloned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
