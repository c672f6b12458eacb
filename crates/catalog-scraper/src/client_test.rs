use super::*;

fn site() -> SiteUrls {
    SiteUrls::new("https://www.miumiu.com/", "/eu/en").unwrap()
}

#[test]
fn base_url_strips_trailing_slash() {
    assert_eq!(site().base_url(), "https://www.miumiu.com");
    assert_eq!(site().prefix(), "/eu/en");
}

#[test]
fn prefix_is_normalised() {
    let site = SiteUrls::new("https://www.miumiu.com", "eu/en/").unwrap();
    assert_eq!(site.prefix(), "/eu/en");
}

#[test]
fn home_url_uses_locale_prefix() {
    assert_eq!(site().home_url(), "https://www.miumiu.com/eu/en.html");
}

#[test]
fn default_category_urls_are_absolute() {
    let urls = site().default_category_urls();
    assert_eq!(urls.len(), 8);
    assert_eq!(urls[0], "https://www.miumiu.com/eu/en/bags.html");
    assert!(urls.iter().all(|u| u.starts_with("https://www.miumiu.com/eu/en/")));
}

#[test]
fn new_rejects_non_http_base() {
    let result = SiteUrls::new("ftp://www.miumiu.com", "/eu/en");
    assert!(
        matches!(result, Err(FetchError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[test]
fn new_rejects_garbage_base() {
    assert!(SiteUrls::new("not a url", "/eu/en").is_err());
}

#[test]
fn resolve_relative_and_absolute_hrefs() {
    let site = site();
    assert_eq!(
        site.resolve("/eu/en/p/bag/5BA285").unwrap().as_str(),
        "https://www.miumiu.com/eu/en/p/bag/5BA285"
    );
    assert_eq!(
        site.resolve("https://cdn.example.com/a.jpg").unwrap().as_str(),
        "https://cdn.example.com/a.jpg"
    );
}

#[test]
fn resolve_rejects_non_http_schemes() {
    assert!(site().resolve("mailto:care@miumiu.com").is_none());
    assert!(site().resolve("javascript:void(0)").is_none());
}

#[test]
fn absolutize_keeps_unresolvable_input() {
    let site = site();
    assert_eq!(
        site.absolutize("/content/dam/img.jpg"),
        "https://www.miumiu.com/content/dam/img.jpg"
    );
    assert_eq!(site.absolutize("mailto:x@y.z"), "mailto:x@y.z");
}

#[test]
fn is_same_site_ignores_www_and_allows_subdomains() {
    let site = site();
    let bare = reqwest::Url::parse("https://miumiu.com/eu/en/p/x").unwrap();
    let sub = reqwest::Url::parse("https://shop.miumiu.com/eu/en/p/x").unwrap();
    let other = reqwest::Url::parse("https://www.prada.com/eu/en/p/x").unwrap();
    let lookalike = reqwest::Url::parse("https://notmiumiu.com/p/x").unwrap();
    assert!(site.is_same_site(&bare));
    assert!(site.is_same_site(&sub));
    assert!(!site.is_same_site(&other));
    assert!(!site.is_same_site(&lookalike));
}

#[test]
fn canonical_url_drops_query_and_fragment() {
    let url = reqwest::Url::parse("https://www.miumiu.com/eu/en/p/bag/X1?utm_source=ig#reviews")
        .unwrap();
    assert_eq!(canonical_url(&url), "https://www.miumiu.com/eu/en/p/bag/X1");
}

#[test]
fn site_client_builds() {
    assert!(SiteClient::new(30, "test-agent/1.0", 0).is_ok());
}
