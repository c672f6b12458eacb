//! Mapping from [`ProductRecord`] fields to destination table columns.

use catalog_core::ProductRecord;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A field of [`ProductRecord`], named as it serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    ProductCode,
    Title,
    Description,
    ShortDescription,
    Price,
    SalePrice,
    Currency,
    FormattedPrice,
    MainImage,
    AdditionalImages,
    Category,
    Categories,
    Attributes,
    Url,
    Colors,
    LifeCycle,
    OnSale,
    OtherVariants,
    SizeCodes,
    Skus,
    RawData,
}

impl RecordField {
    pub const ALL: [RecordField; 21] = [
        RecordField::ProductCode,
        RecordField::Title,
        RecordField::Description,
        RecordField::ShortDescription,
        RecordField::Price,
        RecordField::SalePrice,
        RecordField::Currency,
        RecordField::FormattedPrice,
        RecordField::MainImage,
        RecordField::AdditionalImages,
        RecordField::Category,
        RecordField::Categories,
        RecordField::Attributes,
        RecordField::Url,
        RecordField::Colors,
        RecordField::LifeCycle,
        RecordField::OnSale,
        RecordField::OtherVariants,
        RecordField::SizeCodes,
        RecordField::Skus,
        RecordField::RawData,
    ];

    /// Key of this field in the record's JSON form.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ProductCode => "product_code",
            Self::Title => "title",
            Self::Description => "description",
            Self::ShortDescription => "short_description",
            Self::Price => "price",
            Self::SalePrice => "sale_price",
            Self::Currency => "currency",
            Self::FormattedPrice => "formatted_price",
            Self::MainImage => "main_image",
            Self::AdditionalImages => "additional_images",
            Self::Category => "category",
            Self::Categories => "categories",
            Self::Attributes => "attributes",
            Self::Url => "url",
            Self::Colors => "colors",
            Self::LifeCycle => "life_cycle",
            Self::OnSale => "on_sale",
            Self::OtherVariants => "other_variants",
            Self::SizeCodes => "size_codes",
            Self::Skus => "skus",
            Self::RawData => "raw_data",
        }
    }
}

/// Record field to destination column.
pub const PRODUCT_COLUMNS: &[(RecordField, &str)] = &[
    (RecordField::ProductCode, "product_code"),
    (RecordField::Title, "title"),
    (RecordField::Description, "description"),
    (RecordField::Price, "price"),
    (RecordField::SalePrice, "sale_price"),
    (RecordField::Currency, "currency"),
    (RecordField::MainImage, "main_image"),
    (RecordField::AdditionalImages, "additional_images"),
    (RecordField::Url, "url"),
    (RecordField::Category, "category"),
    (RecordField::Categories, "categories"),
    (RecordField::Attributes, "attributes"),
    (RecordField::RawData, "raw_data"),
];

/// Fields kept in the JSONL log only. Their values remain reachable in the
/// table through `raw_data`.
pub const UNMAPPED_FIELDS: &[RecordField] = &[
    RecordField::ShortDescription,
    RecordField::FormattedPrice,
    RecordField::Colors,
    RecordField::LifeCycle,
    RecordField::OnSale,
    RecordField::OtherVariants,
    RecordField::SizeCodes,
    RecordField::Skus,
];

/// Column the timestamp of the write is stored in.
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Builds the destination row for `record`, stamped with `updated_at`.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the record cannot be serialized.
pub fn build_row(
    record: &ProductRecord,
    updated_at: DateTime<Utc>,
) -> Result<Map<String, Value>, serde_json::Error> {
    let mut fields = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut row = Map::new();
    for (field, column) in PRODUCT_COLUMNS {
        let value = fields.remove(field.key()).unwrap_or(Value::Null);
        row.insert((*column).to_owned(), value);
    }
    row.insert(
        UPDATED_AT_COLUMN.to_owned(),
        Value::String(updated_at.to_rfc3339()),
    );
    Ok(row)
}
