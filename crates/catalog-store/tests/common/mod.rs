use std::str::FromStr;

use catalog_core::ProductRecord;
use rust_decimal::Decimal;
use serde_json::{json, Map};

pub fn record(code: &str) -> ProductRecord {
    ProductRecord {
        product_code: code.to_string(),
        title: Some(format!("Product {code}")),
        description: None,
        short_description: None,
        price: Some(Decimal::from_str("1200").unwrap()),
        sale_price: None,
        currency: "EUR".to_string(),
        formatted_price: Some("€ 1,200".to_string()),
        main_image: None,
        additional_images: vec![],
        category: Some("SHOES".to_string()),
        categories: vec!["SHOES".to_string()],
        attributes: Map::new(),
        url: format!("https://www.miumiu.com/eu/en/p/item/{code}"),
        colors: None,
        life_cycle: None,
        on_sale: None,
        other_variants: vec![],
        size_codes: vec![],
        skus: vec![],
        raw_data: json!({"partNumber": code}),
    }
}
