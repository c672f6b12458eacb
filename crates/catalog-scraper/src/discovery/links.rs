//! Anchor extraction for listing pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::client::{canonical_url, SiteUrls};
use crate::pagination::listing_root;

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)href\s*=\s*["']([^"']+)["']"#).expect("valid regex"));

static CATEGORY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/c/[A-Za-z0-9_-]+/?$").expect("valid regex"));

/// Product URLs in first-seen order, deduplicated by path.
///
/// Two URLs that differ only in query string or fragment are the same
/// product; the canonical (query-free) form of the first one is kept.
#[derive(Debug, Default)]
pub struct ProductUrlSet {
    seen_paths: HashSet<String>,
    urls: Vec<String>,
}

impl ProductUrlSet {
    /// Returns `true` if `url`'s path was not seen before.
    pub fn insert(&mut self, url: &Url) -> bool {
        if !self.seen_paths.insert(url.path().to_owned()) {
            return false;
        }
        self.urls.push(canonical_url(url));
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Resolved same-site `href` targets of `html`, in document order.
fn same_site_links<'a>(html: &'a str, site: &'a SiteUrls) -> impl Iterator<Item = Url> + 'a {
    HREF_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().trim()))
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('#')
                && !href.starts_with("mailto:")
                && !href.starts_with("javascript:")
        })
        .filter_map(move |href| site.resolve(href))
        .filter(move |url| site.is_same_site(url))
}

/// Product page links (`/p/` paths) in `html`, canonical and deduplicated
/// by path.
#[must_use]
pub fn extract_product_links(html: &str, site: &SiteUrls) -> Vec<Url> {
    let mut seen = HashSet::new();
    same_site_links(html, site)
        .filter(|url| url.path().contains("/p/"))
        .filter(|url| seen.insert(url.path().to_owned()))
        .collect()
}

/// Category listing links (`/view-all/` or `/c/<code>`) in `html`, reduced
/// to their listing roots and deduplicated.
#[must_use]
pub fn extract_category_links(html: &str, site: &SiteUrls) -> Vec<Url> {
    let mut seen = HashSet::new();
    same_site_links(html, site)
        .filter(|url| {
            let path = url.path();
            !path.contains("/p/")
                && (path.contains("/view-all/") || CATEGORY_CODE_RE.is_match(path))
        })
        .map(|url| listing_root(&url))
        .filter(|url| seen.insert(url.to_string()))
        .collect()
}
