use thiserror::Error;

/// A page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A fetched product page did not yield a product record.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no embedded product JSON found in page")]
    MissingBlob,

    #[error("embedded product JSON is malformed: {reason}")]
    MalformedBlob { reason: String },

    #[error("embedded product JSON has no product code")]
    MissingProductCode,
}
