//! Path-based pagination for category listings.
//!
//! Listing pages paginate as `<listing>/page/<n>`; page 1 is the bare listing
//! URL. A page has a successor when it links to it, either through a
//! `rel="next"` link or an anchor pointing at `/page/<n+1>`.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

static PAGE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/(\d+)/?$").expect("valid regex"));

static REL_NEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<(?:a|link)\b[^>]*\brel\s*=\s*["']?next\b"#).expect("valid regex")
});

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)href\s*=\s*["']([^"']+)["']"#).expect("valid regex"));

/// Page number encoded in `url`'s path; `1` when there is no `/page/<n>` suffix.
#[must_use]
pub fn page_number(url: &Url) -> u32 {
    PAGE_SUFFIX_RE
        .captures(url.path())
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// The listing URL with any `/page/<n>` suffix, query, and fragment removed.
#[must_use]
pub fn listing_root(url: &Url) -> Url {
    let mut root = url.clone();
    let path = PAGE_SUFFIX_RE.replace(url.path(), "").into_owned();
    root.set_path(&path);
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// URL of page `n` of the listing rooted at `root`.
#[must_use]
pub fn page_url(root: &Url, n: u32) -> String {
    let base = root.as_str().trim_end_matches('/');
    if n <= 1 {
        base.to_owned()
    } else {
        format!("{base}/page/{n}")
    }
}

/// Returns `true` if `html` advertises a page after `current`.
#[must_use]
pub fn has_next_page(html: &str, current: u32) -> bool {
    if REL_NEXT_RE.is_match(html) {
        return true;
    }
    let needle = format!("/page/{}", current.saturating_add(1));
    HREF_RE.captures_iter(html).any(|caps| {
        let href = caps[1].split(['?', '#']).next().unwrap_or_default();
        href.trim_end_matches('/').ends_with(&needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn page_number_defaults_to_one() {
        assert_eq!(page_number(&url("https://shop.test/eu/en/bags.html")), 1);
    }

    #[test]
    fn page_number_reads_suffix() {
        assert_eq!(page_number(&url("https://shop.test/eu/en/c/10001/page/3")), 3);
        assert_eq!(page_number(&url("https://shop.test/eu/en/c/10001/page/12/")), 12);
    }

    #[test]
    fn listing_root_strips_page_and_query() {
        let root = listing_root(&url("https://shop.test/eu/en/c/10001/page/4?sort=new#top"));
        assert_eq!(root.as_str(), "https://shop.test/eu/en/c/10001");
    }

    #[test]
    fn page_url_builds_suffix() {
        let root = url("https://shop.test/eu/en/c/10001");
        assert_eq!(page_url(&root, 1), "https://shop.test/eu/en/c/10001");
        assert_eq!(page_url(&root, 2), "https://shop.test/eu/en/c/10001/page/2");
    }

    #[test]
    fn rel_next_link_signals_next_page() {
        let html = r#"<head><link rel="next" href="/eu/en/c/1/page/2"></head>"#;
        assert!(has_next_page(html, 1));
    }

    #[test]
    fn anchor_to_following_page_signals_next_page() {
        let html = r#"<nav><a href="/eu/en/c/1/page/2">2</a><a href="/eu/en/c/1/page/3/">3</a></nav>"#;
        assert!(has_next_page(html, 1));
        assert!(has_next_page(html, 2));
        assert!(!has_next_page(html, 3));
    }

    #[test]
    fn page_twenty_does_not_match_page_two() {
        let html = r#"<a href="/eu/en/c/1/page/20">20</a>"#;
        assert!(!has_next_page(html, 1));
    }

    #[test]
    fn no_pagination_markup() {
        assert!(!has_next_page("<html><body>products</body></html>", 1));
    }
}
