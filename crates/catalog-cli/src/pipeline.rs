//! Run orchestration: discover product URLs, then fetch, parse, and persist
//! each one in turn.
//!
//! Every per-URL failure is recorded in the [`ProcessOutcome`] and the run
//! moves on. Only configuration errors, an empty discovery, and local output
//! I/O failures abort the run.

use std::fmt;
use std::path::PathBuf;

use catalog_core::AppConfig;
use catalog_scraper::{parse_product_page, Discoverer, SiteClient, SiteUrls};
use catalog_store::{write_failed_urls, JsonlWriter, OutputError, SupabaseClient};

pub(crate) const PRODUCTS_FILE: &str = "products.jsonl";
pub(crate) const FAILED_URLS_FILE: &str = "failed_urls.txt";

/// Failures listed individually in the end-of-run summary.
const MAX_FAILURES_SHOWN: usize = 10;

/// Step of the per-URL pipeline a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureStage {
    Fetch,
    Parse,
    Upsert,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Fetch => write!(f, "fetch"),
            FailureStage::Parse => write!(f, "parse"),
            FailureStage::Upsert => write!(f, "upsert"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FailedUrl {
    pub url: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// Counts and failures from the fetch/parse/persist phase.
#[derive(Debug, Default)]
pub(crate) struct ProcessOutcome {
    /// Records parsed and appended to the JSONL file.
    pub scraped: usize,
    /// Records accepted by the destination table.
    pub upserted: usize,
    pub failed: Vec<FailedUrl>,
}

impl ProcessOutcome {
    fn record_failure(&mut self, url: &str, stage: FailureStage, reason: impl fmt::Display) {
        tracing::warn!(url, %stage, error = %reason, "product failed");
        self.failed.push(FailedUrl {
            url: url.to_owned(),
            stage,
            reason: reason.to_string(),
        });
    }

    /// Failed URLs in the order they failed.
    pub fn failed_urls(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.url.clone()).collect()
    }

    fn count_stage(&self, stage: FailureStage) -> usize {
        self.failed.iter().filter(|f| f.stage == stage).count()
    }
}

/// Everything a finished run reports.
#[derive(Debug)]
pub(crate) struct RunSummary {
    pub discovered: usize,
    pub outcome: ProcessOutcome,
    pub products_path: PathBuf,
    /// Set when at least one URL failed and the report was written.
    pub failed_urls_path: Option<PathBuf>,
}

/// Runs discovery and processing for `config`.
///
/// # Errors
///
/// Returns an error if the site or destination configuration is invalid,
/// discovery finds no product URLs, or an output file cannot be written.
pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let site = SiteUrls::new(&config.base_url, &config.site_prefix())?;
    let client = SiteClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_request_delay_ms,
    )?;
    let upserter = SupabaseClient::from_config(config)?;

    tracing::info!(
        site = %site.home_url(),
        dry_run = config.dry_run,
        discovery = %config.scraper_discovery,
        "starting catalog scrape"
    );
    if !config.dry_run && !config.has_destination_credentials() {
        tracing::warn!(
            "SUPABASE_URL and/or SUPABASE_KEY not set; products will not be written to the database"
        );
    }

    let report = Discoverer::new(&client, &site, config.scraper_max_pages)
        .discover(config.scraper_discovery)
        .await;
    let mut urls = report.product_urls;
    let discovered = urls.len();
    if let Some(limit) = config.limit {
        if urls.len() > limit {
            tracing::info!(limit, discovered, "limiting product URLs");
            urls.truncate(limit);
        }
    }
    if urls.is_empty() {
        anyhow::bail!(
            "no product URLs found ({} listing pages failed); check category pages and SCRAPER_DISCOVERY",
            report.failed_pages.len()
        );
    }

    let products_path = config.output_dir.join(PRODUCTS_FILE);
    let mut writer = JsonlWriter::open(&products_path)?;
    let outcome = process_products(&client, &site, upserter.as_ref(), &mut writer, &urls).await?;

    let failed_path = config.output_dir.join(FAILED_URLS_FILE);
    let failed_urls_path =
        write_failed_urls(&failed_path, &outcome.failed_urls())?.then_some(failed_path);

    Ok(RunSummary {
        discovered,
        outcome,
        products_path,
        failed_urls_path,
    })
}

/// Fetches, parses, and persists each URL in order. A record is appended to
/// the JSONL file before it is upserted, so an upsert failure still leaves
/// the line in place.
///
/// # Errors
///
/// Returns [`OutputError`] if the JSONL file cannot be written; every other
/// failure is recorded in the outcome.
pub(crate) async fn process_products(
    client: &SiteClient,
    site: &SiteUrls,
    upserter: Option<&SupabaseClient>,
    writer: &mut JsonlWriter,
    urls: &[String],
) -> Result<ProcessOutcome, OutputError> {
    let mut outcome = ProcessOutcome::default();
    let total = urls.len();

    for (index, url) in urls.iter().enumerate() {
        tracing::info!(item = index + 1, total, url = %url, "processing product");

        let page = match client.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                outcome.record_failure(url, FailureStage::Fetch, e);
                continue;
            }
        };

        let record = match parse_product_page(&page.body, url, site) {
            Ok(record) => record,
            Err(e) => {
                outcome.record_failure(url, FailureStage::Parse, e);
                continue;
            }
        };

        writer.append(&record)?;
        outcome.scraped += 1;

        if let Some(upserter) = upserter {
            match upserter.upsert_product(&record).await {
                Ok(()) => outcome.upserted += 1,
                Err(e) => outcome.record_failure(url, FailureStage::Upsert, e),
            }
        }
    }

    Ok(outcome)
}

pub(crate) fn print_summary(config: &AppConfig, summary: &RunSummary) {
    let outcome = &summary.outcome;
    println!(
        "Done. discovered: {}, scraped: {}, upserted: {}, failed: {} (fetch {}, parse {}, upsert {})",
        summary.discovered,
        outcome.scraped,
        outcome.upserted,
        outcome.failed.len(),
        outcome.count_stage(FailureStage::Fetch),
        outcome.count_stage(FailureStage::Parse),
        outcome.count_stage(FailureStage::Upsert),
    );
    println!("JSONL: {}", summary.products_path.display());
    if let Some(path) = &summary.failed_urls_path {
        println!("Failed URLs: {}", path.display());
    }
    for failure in outcome.failed.iter().take(MAX_FAILURES_SHOWN) {
        eprintln!("  [{}] {}: {}", failure.stage, failure.url, failure.reason);
    }
    if outcome.failed.len() > MAX_FAILURES_SHOWN {
        eprintln!("  ... and {} more", outcome.failed.len() - MAX_FAILURES_SHOWN);
    }
    if config.dry_run {
        println!("Dry run: nothing was sent to Supabase.");
    } else if outcome.scraped > 0 && outcome.upserted == 0 {
        eprintln!(
            "warning: nothing was written to Supabase; set SUPABASE_URL and SUPABASE_KEY to enable upserts"
        );
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
