use std::path::PathBuf;

/// Where product URLs are discovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Category listing pages, following pagination and category codes.
    Categories,
    /// The site's XML sitemaps.
    Sitemap,
    /// Both sources, merged and deduplicated.
    All,
}

impl DiscoveryMode {
    #[must_use]
    pub fn uses_categories(self) -> bool {
        matches!(self, DiscoveryMode::Categories | DiscoveryMode::All)
    }

    #[must_use]
    pub fn uses_sitemap(self) -> bool {
        matches!(self, DiscoveryMode::Sitemap | DiscoveryMode::All)
    }
}

impl std::fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryMode::Categories => write!(f, "categories"),
            DiscoveryMode::Sitemap => write!(f, "sitemap"),
            DiscoveryMode::All => write!(f, "all"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Site root without a trailing slash, e.g. `https://www.miumiu.com`.
    pub base_url: String,
    pub market: String,
    pub country: String,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub supabase_table: String,
    pub dry_run: bool,
    /// Maximum number of product URLs to process; `None` means no limit.
    pub limit: Option<usize>,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_request_delay_ms: u64,
    pub scraper_max_pages: usize,
    pub scraper_discovery: DiscoveryMode,
}

impl AppConfig {
    /// Locale path prefix for every site URL, e.g. `/eu/en`.
    #[must_use]
    pub fn site_prefix(&self) -> String {
        format!("/{}/{}", self.country, self.market)
    }

    /// Returns `true` when both Supabase credentials are present.
    #[must_use]
    pub fn has_destination_credentials(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }

    /// Returns `true` when records should be upserted to the destination.
    #[must_use]
    pub fn upserts_enabled(&self) -> bool {
        !self.dry_run && self.has_destination_credentials()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("market", &self.market)
            .field("country", &self.country)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_key",
                &self.supabase_key.as_ref().map(|_| "[redacted]"),
            )
            .field("supabase_table", &self.supabase_table)
            .field("dry_run", &self.dry_run)
            .field("limit", &self.limit)
            .field("output_dir", &self.output_dir)
            .field("log_level", &self.log_level)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_request_delay_ms", &self.scraper_request_delay_ms)
            .field("scraper_max_pages", &self.scraper_max_pages)
            .field("scraper_discovery", &self.scraper_discovery)
            .finish()
    }
}
