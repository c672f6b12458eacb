//! HTTP client for the catalog site's HTML pages.

mod site;

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::error::FetchError;

pub use site::{canonical_url, SiteUrls};

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

/// HTTP client for category, product, and sitemap pages.
///
/// Sends a fixed browser-like header set and keeps at least
/// `request_delay` between consecutive requests. Non-2xx responses map to
/// typed errors. There is no retry: callers record the failure and move on.
pub struct SiteClient {
    client: Client,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl SiteClient {
    /// Creates a `SiteClient` with the given timeout, `User-Agent`, and
    /// minimum delay between requests (`0` disables pacing).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        request_delay_ms: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            request_delay: Duration::from_millis(request_delay_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Fetches `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NotFound`]: HTTP 404.
    /// - [`FetchError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`FetchError::Http`]: network, TLS, timeout, or redirect-loop failure.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.pace().await;

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }

    /// Sleeps until `request_delay` has passed since the previous request.
    async fn pace(&self) {
        if self.request_delay.is_zero() {
            return;
        }

        let wait = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|last| self.request_delay.saturating_sub(last.elapsed()));

        if let Some(wait) = wait.filter(|w| !w.is_zero()) {
            tokio::time::sleep(wait).await;
        }

        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
