//! Upsert client for a Supabase (PostgREST) table.
//!
//! Each product is written with `POST /rest/v1/<table>?on_conflict=product_code`
//! and `Prefer: resolution=merge-duplicates`, so a row whose `product_code`
//! already exists is updated in place rather than duplicated.

use std::fmt;
use std::time::Duration;

use catalog_core::{AppConfig, ProductRecord};
use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::columns::build_row;
use crate::UpsertError;

/// Unique column the upsert resolves conflicts on.
pub const CONFLICT_COLUMN: &str = "product_code";

/// Longest response body kept in an [`UpsertError::Rejected`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for upserting product rows into one Supabase table.
pub struct SupabaseClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Creates a client for `{supabase_url}/rest/v1/{table}`.
    ///
    /// # Errors
    ///
    /// Returns [`UpsertError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`UpsertError::InvalidUrl`] if
    /// `supabase_url` is not a valid base URL.
    pub fn new(
        supabase_url: &str,
        api_key: &str,
        table: &str,
        timeout_secs: u64,
    ) -> Result<Self, UpsertError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", supabase_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("rest/v1/{table}")))
            .map_err(|e| UpsertError::InvalidUrl {
                url: supabase_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_owned(),
        })
    }

    /// Builds a client from configuration, or `None` when upserts are
    /// disabled (dry run or missing credentials).
    ///
    /// # Errors
    ///
    /// See [`SupabaseClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, UpsertError> {
        if !config.upserts_enabled() {
            return Ok(None);
        }
        let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_key) else {
            return Ok(None);
        };
        Self::new(
            url,
            key,
            &config.supabase_table,
            config.scraper_request_timeout_secs,
        )
        .map(Some)
    }

    /// Table endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Inserts `record`, or updates the existing row with the same
    /// `product_code`.
    ///
    /// # Errors
    ///
    /// - [`UpsertError::Http`] on network failure.
    /// - [`UpsertError::Rejected`] if the API answers with a non-2xx status.
    /// - [`UpsertError::Serialize`] if the row cannot be built.
    pub async fn upsert_product(&self, record: &ProductRecord) -> Result<(), UpsertError> {
        let row = Value::Object(build_row(record, Utc::now())?);

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("on_conflict", CONFLICT_COLUMN)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(product_code = %record.product_code, "upserted product");
            return Ok(());
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        Err(UpsertError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    /// Upserts each record in turn. Returns `(succeeded, failed)`; failures
    /// are logged and do not stop the batch.
    pub async fn upsert_products(&self, records: &[ProductRecord]) -> (usize, usize) {
        let mut succeeded = 0;
        let mut failed = 0;
        for record in records {
            match self.upsert_product(record).await {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    tracing::warn!(product_code = %record.product_code, error = %e, "upsert failed");
                    failed += 1;
                }
            }
        }
        (succeeded, failed)
    }
}
