//! Persistence for scraped products: the local JSONL log and the remote
//! Supabase table.

pub mod columns;
pub mod jsonl;
pub mod supabase;

use std::path::PathBuf;

use thiserror::Error;

pub use columns::{build_row, RecordField, PRODUCT_COLUMNS, UNMAPPED_FIELDS};
pub use jsonl::{write_failed_urls, JsonlWriter};
pub use supabase::SupabaseClient;

/// A record could not be written to the destination table.
#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upsert rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid Supabase URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A local output file could not be written.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
