//! Sitemap index parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::client::SiteUrls;

/// Upper bound on sitemap documents fetched in one run.
pub const MAX_SITEMAPS: usize = 50;

const SITEMAP_SEED_PATHS: [&str; 3] = ["/sitemap.xml", "/sitemap_index_0.xml", "/sitemap_index_1.xml"];

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc[^>]*>\s*(.*?)\s*</loc>").expect("valid regex"));

/// Sitemap index URLs probed first, in order.
#[must_use]
pub fn sitemap_seed_urls(site: &SiteUrls) -> Vec<String> {
    SITEMAP_SEED_PATHS
        .iter()
        .map(|path| format!("{}{path}", site.base_url()))
        .collect()
}

/// `<loc>` values of a sitemap or sitemap index, with XML entities decoded.
#[must_use]
pub fn parse_sitemap_locs(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|cap| cap.get(1).map(|m| unescape_xml(m.as_str().trim())))
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Returns `true` if `url` names another sitemap document.
#[must_use]
pub fn looks_like_sitemap_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or_default();
    path.contains("sitemap")
        && std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn unescape_xml(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
