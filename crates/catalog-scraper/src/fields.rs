//! Field readers for the embedded product object.
//!
//! The product object is loosely typed: identifiers and prices arrive as
//! strings or numbers depending on the page, and labels may be a plain list
//! or keyed by locale. Everything here is lenient and returns `None` rather
//! than failing.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Category slugs recognised in a product URL when the object carries no
/// breadcrumb.
const KNOWN_CATEGORY_SLUGS: [&str; 7] = [
    "bags",
    "shoes",
    "ready-to-wear",
    "accessories",
    "wallets",
    "fashion-jewellery",
    "gifts",
];

/// Currency markers checked against a rendered price, in order.
const CURRENCY_MARKERS: [(&str, &str); 6] = [
    ("€", "EUR"),
    ("£", "GBP"),
    ("CHF", "CHF"),
    ("¥", "JPY"),
    ("$", "USD"),
    ("USD", "USD"),
];

pub(crate) const DEFAULT_CURRENCY: &str = "USD";

/// Non-empty trimmed text of a string or number value.
pub(crate) fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// [`text_value`] of `obj[key]`.
pub(crate) fn text_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(text_value)
}

/// Decimal of a string or number value. Accepts plain and scientific
/// notation; anything else is `None`.
pub(crate) fn decimal_value(value: &Value) -> Option<Decimal> {
    let raw = text_value(value)?;
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

/// ISO code for the currency a rendered price like `"€ 2,300"` is shown in.
pub(crate) fn currency_from_formatted(formatted: &str) -> Option<&'static str> {
    let upper = formatted.to_uppercase();
    CURRENCY_MARKERS
        .iter()
        .find(|(marker, _)| upper.contains(marker))
        .map(|(_, code)| *code)
}

/// List and offer prices read from the object's `price` array.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct PriceSummary {
    pub list: Option<Decimal>,
    pub offer: Option<Decimal>,
    pub currency: Option<&'static str>,
    pub formatted: Option<String>,
}

impl PriceSummary {
    /// The regular price: the list price, else the offer price.
    pub fn price(&self) -> Option<Decimal> {
        self.list.or(self.offer)
    }

    /// The offer price, but only when it undercuts the list price.
    pub fn sale_price(&self) -> Option<Decimal> {
        match (self.list, self.offer) {
            (Some(list), Some(offer)) if offer < list => Some(offer),
            _ => None,
        }
    }
}

/// Reads `price` entries tagged `DISPLAY`/`L` (list) and `OFFER`/`O` (offer).
pub(crate) fn summarize_prices(entries: Option<&Value>) -> PriceSummary {
    let mut summary = PriceSummary::default();
    let Some(entries) = entries.and_then(Value::as_array) else {
        return summary;
    };

    for entry in entries.iter().filter(|e| e.is_object()) {
        let formatted = text_field(entry, "formattedPrice");
        if let Some(code) = formatted.as_deref().and_then(currency_from_formatted) {
            summary.currency = Some(code);
        }
        let amount = entry.get("value").and_then(decimal_value);
        let usage = text_field(entry, "usage").unwrap_or_default().to_uppercase();
        match usage.as_str() {
            "DISPLAY" | "L" => {
                summary.list = amount;
                if formatted.is_some() {
                    summary.formatted = formatted;
                }
            }
            "OFFER" | "O" => summary.offer = amount,
            _ => {}
        }
    }

    summary
}

/// Breadcrumb labels from `Hierarchy.Label` (or `hierarchy.Label`).
///
/// The label is either a list, or a map from locale to list; English
/// locales win, otherwise the first non-empty list is used.
pub(crate) fn breadcrumb(blob: &Value) -> Vec<String> {
    let labels = blob
        .get("Hierarchy")
        .or_else(|| blob.get("hierarchy"))
        .and_then(|h| h.get("Label"));

    match labels {
        Some(Value::Array(items)) => string_list(items),
        Some(Value::Object(by_locale)) => localized_breadcrumb(by_locale),
        _ => Vec::new(),
    }
}

fn localized_breadcrumb(by_locale: &Map<String, Value>) -> Vec<String> {
    let english = by_locale
        .iter()
        .filter(|(locale, _)| locale.to_lowercase().starts_with("en"));
    let others = by_locale
        .iter()
        .filter(|(locale, _)| !locale.to_lowercase().starts_with("en"));

    english
        .chain(others)
        .filter_map(|(_, labels)| labels.as_array())
        .map(|items| string_list(items))
        .find(|labels| !labels.is_empty())
        .unwrap_or_default()
}

fn string_list(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(text_value).collect()
}

/// First known category slug among the path segments of `page_url`.
pub(crate) fn category_from_url(page_url: &str) -> Option<String> {
    page_url
        .split(['/', '?', '#'])
        .find(|segment| KNOWN_CATEGORY_SLUGS.contains(segment))
        .map(str::to_owned)
}

/// Attribute name to value, or to a list of values when there is not
/// exactly one.
pub(crate) fn attribute_map(blob: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(attributes) = blob.get("attributes").and_then(Value::as_array) else {
        return out;
    };

    for attribute in attributes.iter().filter(|a| a.is_object()) {
        let Some(name) =
            text_field(attribute, "name").or_else(|| text_field(attribute, "identifier"))
        else {
            continue;
        };
        let values: Vec<&Value> = attribute
            .get("values")
            .and_then(Value::as_array)
            .map(|vals| vals.iter().filter(|v| v.is_object()).collect())
            .unwrap_or_default();
        let texts = values.iter().map(|v| {
            text_field(v, "value")
                .or_else(|| text_field(v, "identifier"))
                .map_or(Value::Null, Value::String)
        });

        let value = if values.len() == 1 {
            texts.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(texts.collect())
        };
        out.insert(name, value);
    }

    out
}

/// A flag stored either as a JSON bool or as `"true"`/`"false"`.
pub(crate) fn flag_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn text_value_accepts_strings_and_numbers() {
        assert_eq!(text_value(&json!(" X1 ")), Some("X1".to_owned()));
        assert_eq!(text_value(&json!(12345)), Some("12345".to_owned()));
        assert_eq!(text_value(&json!("")), None);
        assert_eq!(text_value(&json!(null)), None);
        assert_eq!(text_value(&json!(["a"])), None);
    }

    #[test]
    fn decimal_value_parses_strings_numbers_and_scientific() {
        assert_eq!(decimal_value(&json!("2300.00")), Some(dec("2300.00")));
        assert_eq!(decimal_value(&json!(1850)), Some(dec("1850")));
        assert_eq!(decimal_value(&json!(99.5)), Some(dec("99.5")));
        assert_eq!(decimal_value(&json!("2.3E3")), Some(dec("2300")));
        assert_eq!(decimal_value(&json!("n/a")), None);
    }

    #[test]
    fn currency_markers() {
        assert_eq!(currency_from_formatted("€ 2,300"), Some("EUR"));
        assert_eq!(currency_from_formatted("£1,950"), Some("GBP"));
        assert_eq!(currency_from_formatted("CHF 2'400"), Some("CHF"));
        assert_eq!(currency_from_formatted("¥ 350,000"), Some("JPY"));
        assert_eq!(currency_from_formatted("$2,650"), Some("USD"));
        assert_eq!(currency_from_formatted("2650 usd"), Some("USD"));
        assert_eq!(currency_from_formatted("2650"), None);
    }

    #[test]
    fn prices_with_offer_below_list() {
        let summary = summarize_prices(Some(&json!([
            {"usage": "DISPLAY", "value": "2300.00", "formattedPrice": "€ 2,300"},
            {"usage": "OFFER", "value": "1610.00", "formattedPrice": "€ 1,610"}
        ])));
        assert_eq!(summary.price(), Some(dec("2300.00")));
        assert_eq!(summary.sale_price(), Some(dec("1610.00")));
        assert_eq!(summary.currency, Some("EUR"));
        assert_eq!(summary.formatted.as_deref(), Some("€ 2,300"));
    }

    #[test]
    fn offer_equal_to_list_is_not_a_sale() {
        let summary = summarize_prices(Some(&json!([
            {"usage": "L", "value": 950},
            {"usage": "O", "value": 950}
        ])));
        assert_eq!(summary.price(), Some(dec("950")));
        assert_eq!(summary.sale_price(), None);
        assert_eq!(summary.currency, None);
    }

    #[test]
    fn offer_only_becomes_price() {
        let summary = summarize_prices(Some(&json!([{"usage": "offer", "value": "720"}])));
        assert_eq!(summary.price(), Some(dec("720")));
        assert_eq!(summary.sale_price(), None);
    }

    #[test]
    fn missing_or_malformed_price_array() {
        assert_eq!(summarize_prices(None), PriceSummary::default());
        assert_eq!(summarize_prices(Some(&json!("1200"))), PriceSummary::default());
        let summary = summarize_prices(Some(&json!([null, {"usage": "DISPLAY", "value": "x"}])));
        assert_eq!(summary.price(), None);
    }

    #[test]
    fn breadcrumb_from_list() {
        let blob = json!({"Hierarchy": {"Label": ["BAGS", "SHOULDER BAGS"]}});
        assert_eq!(breadcrumb(&blob), vec!["BAGS", "SHOULDER BAGS"]);
    }

    #[test]
    fn breadcrumb_prefers_english_locale() {
        let blob = json!({"hierarchy": {"Label": {
            "de_DE": ["TASCHEN"],
            "en_GB": ["BAG LINES", "UTILITAIRE"],
            "ww": ["BAGS"]
        }}});
        assert_eq!(breadcrumb(&blob), vec!["BAG LINES", "UTILITAIRE"]);
    }

    #[test]
    fn breadcrumb_falls_back_to_any_locale() {
        let blob = json!({"Hierarchy": {"Label": {"en_GB": [], "it_IT": ["BORSE"]}}});
        assert_eq!(breadcrumb(&blob), vec!["BORSE"]);
    }

    #[test]
    fn breadcrumb_absent() {
        assert!(breadcrumb(&json!({"Hierarchy": "BAGS"})).is_empty());
        assert!(breadcrumb(&json!({})).is_empty());
    }

    #[test]
    fn category_slug_from_url() {
        assert_eq!(
            category_from_url("https://www.miumiu.com/eu/en/shoes/p/ballerinas/5F833D"),
            Some("shoes".to_owned())
        );
        assert_eq!(category_from_url("https://www.miumiu.com/eu/en/p/x/1"), None);
    }

    #[test]
    fn attributes_single_and_multi_valued() {
        let blob = json!({"attributes": [
            {"name": "Color", "values": [{"value": "Black"}]},
            {"identifier": "SIZE", "values": [{"identifier": "36"}, {"value": "37"}]},
            {"name": "Material", "values": []},
            {"values": [{"value": "orphan"}]},
            "junk"
        ]});
        let attrs = attribute_map(&blob);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs["Color"], json!("Black"));
        assert_eq!(attrs["SIZE"], json!(["36", "37"]));
        assert_eq!(attrs["Material"], json!([]));
    }

    #[test]
    fn flags_from_bools_and_strings() {
        assert_eq!(flag_value(&json!(true)), Some(true));
        assert_eq!(flag_value(&json!("false")), Some(false));
        assert_eq!(flag_value(&json!("TRUE")), Some(true));
        assert_eq!(flag_value(&json!(1)), None);
    }
}
