//! Site root, locale prefix, and URL resolution helpers.

use reqwest::Url;

use crate::error::FetchError;

/// Category listing pages crawled on every run, relative to the locale prefix.
///
/// The `.html` listings are used rather than `/view-all/c/default`, which can
/// redirect-loop on some networks.
const DEFAULT_CATEGORY_PAGES: [&str; 8] = [
    "bags.html",
    "shoes.html",
    "ready-to-wear.html",
    "accessories.html",
    "wallets.html",
    "fashion-jewellery.html",
    "gifts.html",
    "new-arrivals.html",
];

/// The scraped site: its root URL and locale path prefix (e.g. `/eu/en`).
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    prefix: String,
}

impl SiteUrls {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str, site_prefix: &str) -> Result<Self, FetchError> {
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(FetchError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "expected an http(s) URL with a host".to_owned(),
            });
        }
        let prefix = format!("/{}", site_prefix.trim_matches('/'));
        Ok(Self { base, prefix })
    }

    /// Site root without a trailing slash, e.g. `https://www.miumiu.com`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Locale landing page, e.g. `https://www.miumiu.com/eu/en.html`.
    #[must_use]
    pub fn home_url(&self) -> String {
        format!("{}{}.html", self.base_url(), self.prefix)
    }

    /// Absolute URLs of the built-in category listing pages.
    #[must_use]
    pub fn default_category_urls(&self) -> Vec<String> {
        DEFAULT_CATEGORY_PAGES
            .iter()
            .map(|page| format!("{}{}/{page}", self.base_url(), self.prefix))
            .collect()
    }

    /// Resolves `href` against the site root. Returns `None` for
    /// unparseable or non-http(s) targets.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let url = self.base.join(href.trim()).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    }

    /// Resolves `href` and returns it as a string, or `href` unchanged when it
    /// cannot be resolved.
    #[must_use]
    pub fn absolutize(&self, href: &str) -> String {
        self.resolve(href)
            .map_or_else(|| href.to_owned(), |u| u.to_string())
    }

    /// Returns `true` if `url` belongs to this site: same host, or a
    /// subdomain of it, ignoring a leading `www.`.
    #[must_use]
    pub fn is_same_site(&self, url: &Url) -> bool {
        let (Some(ours), Some(theirs)) = (self.base.host_str(), url.host_str()) else {
            return false;
        };
        let ours = ours.strip_prefix("www.").unwrap_or(ours);
        let theirs = theirs.strip_prefix("www.").unwrap_or(theirs);
        theirs == ours || theirs.ends_with(&format!(".{ours}"))
    }
}

/// Drops the query string and fragment so the same page reached through
/// different tracking parameters compares equal.
#[must_use]
pub fn canonical_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}
