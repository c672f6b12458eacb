pub mod client;
pub mod discovery;
pub mod embedded;
pub mod error;
mod fields;
pub mod normalize;
pub mod pagination;

pub use client::{FetchedPage, SiteClient, SiteUrls};
pub use discovery::{Discoverer, DiscoveryReport};
pub use embedded::extract_product_blob;
pub use error::{FetchError, ParseError};
pub use normalize::{normalize_product, parse_product_page};
