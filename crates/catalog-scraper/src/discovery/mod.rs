//! Product URL discovery.
//!
//! Category discovery starts from the built-in listing pages plus any
//! category links on the locale home page, then walks every listing
//! breadth-first: product links are collected, category-code links are
//! queued as new listings, and `/page/<n>` pagination is followed while the
//! page advertises a successor. Sitemap discovery walks the sitemap index
//! instead. Either way the result is one ordered, path-deduplicated list.

mod links;
mod sitemap;

use std::collections::{HashSet, VecDeque};

use catalog_core::DiscoveryMode;
use reqwest::Url;

use crate::client::{canonical_url, SiteClient, SiteUrls};
use crate::pagination::{has_next_page, listing_root, page_number, page_url};

pub use links::{extract_category_links, extract_product_links, ProductUrlSet};
pub use sitemap::{looks_like_sitemap_url, parse_sitemap_locs, sitemap_seed_urls, MAX_SITEMAPS};

/// Outcome of a discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Canonical product URLs in first-seen order, unique by path.
    pub product_urls: Vec<String>,
    /// Listing and sitemap pages fetched successfully.
    pub pages_visited: usize,
    /// Listing or sitemap pages that could not be fetched.
    pub failed_pages: Vec<String>,
}

#[derive(Default)]
struct CrawlState {
    products: ProductUrlSet,
    pages_visited: usize,
    failed_pages: Vec<String>,
}

impl CrawlState {
    fn into_report(self) -> DiscoveryReport {
        DiscoveryReport {
            product_urls: self.products.into_vec(),
            pages_visited: self.pages_visited,
            failed_pages: self.failed_pages,
        }
    }
}

/// Walks the site's listings or sitemaps for product URLs.
pub struct Discoverer<'a> {
    client: &'a SiteClient,
    site: &'a SiteUrls,
    max_pages: usize,
}

impl<'a> Discoverer<'a> {
    /// `max_pages` caps how many pages of a single listing are followed.
    #[must_use]
    pub fn new(client: &'a SiteClient, site: &'a SiteUrls, max_pages: usize) -> Self {
        Self {
            client,
            site,
            max_pages: max_pages.max(1),
        }
    }

    /// Runs the discovery sources selected by `mode` and merges their
    /// results, category URLs first.
    pub async fn discover(&self, mode: DiscoveryMode) -> DiscoveryReport {
        let mut state = CrawlState::default();
        if mode.uses_categories() {
            let seeds = self.discover_category_urls().await;
            self.crawl_listings(&mut state, &seeds).await;
        }
        if mode.uses_sitemap() {
            self.crawl_sitemaps(&mut state).await;
        }
        tracing::info!(
            %mode,
            products = state.products.len(),
            pages = state.pages_visited,
            failed_pages = state.failed_pages.len(),
            "discovery complete"
        );
        state.into_report()
    }

    /// Built-in category listings followed by any new category links found
    /// on the locale home page. A home page failure is logged and ignored.
    pub async fn discover_category_urls(&self) -> Vec<String> {
        let mut urls = self.site.default_category_urls();
        let home = self.site.home_url();

        match self.client.fetch_page(&home).await {
            Ok(page) => {
                for link in extract_category_links(&page.body, self.site) {
                    let link = link.to_string();
                    if !urls.contains(&link) {
                        urls.push(link);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(url = %home, error = %e, "home page fetch failed; using built-in categories");
            }
        }

        urls
    }

    /// Crawls the given listing URLs and everything reachable from them.
    pub async fn discover_products(&self, seeds: &[String]) -> DiscoveryReport {
        let mut state = CrawlState::default();
        self.crawl_listings(&mut state, seeds).await;
        state.into_report()
    }

    /// Collects product URLs from the sitemap index and nested sitemaps.
    pub async fn discover_sitemap_products(&self) -> DiscoveryReport {
        let mut state = CrawlState::default();
        self.crawl_sitemaps(&mut state).await;
        state.into_report()
    }

    async fn crawl_listings(&self, state: &mut CrawlState, seeds: &[String]) {
        let mut queue: VecDeque<Url> = VecDeque::new();
        let mut seen_listings: HashSet<String> = HashSet::new();

        for seed in seeds {
            match self.site.resolve(seed) {
                Some(url) => {
                    if seen_listings.insert(canonical_url(&listing_root(&url))) {
                        queue.push_back(url);
                    }
                }
                None => tracing::warn!(url = %seed, "skipping unparseable category URL"),
            }
        }

        while let Some(listing) = queue.pop_front() {
            for category in self.crawl_listing(state, &listing).await {
                if seen_listings.insert(canonical_url(&category)) {
                    tracing::debug!(url = %category, "queued category listing");
                    queue.push_back(category);
                }
            }
        }
    }

    /// Follows one listing's pagination. Returns the category links seen on
    /// its pages.
    async fn crawl_listing(&self, state: &mut CrawlState, listing: &Url) -> Vec<Url> {
        let root = listing_root(listing);
        let mut page = page_number(listing);
        let mut current = listing.to_string();
        let mut fetched = 0usize;
        let mut categories = Vec::new();

        loop {
            let body = match self.client.fetch_page(&current).await {
                Ok(fetched_page) => fetched_page.body,
                Err(e) => {
                    tracing::warn!(url = %current, page, error = %e, "listing page fetch failed");
                    state.failed_pages.push(current);
                    break;
                }
            };
            fetched += 1;
            state.pages_visited += 1;

            let before = state.products.len();
            for url in extract_product_links(&body, self.site) {
                state.products.insert(&url);
            }
            tracing::debug!(
                url = %current,
                page,
                new_products = state.products.len() - before,
                "listing page scanned"
            );
            categories.extend(extract_category_links(&body, self.site));

            if !has_next_page(&body, page) {
                break;
            }
            if fetched >= self.max_pages {
                tracing::warn!(url = %root, max_pages = self.max_pages, "listing page cap reached");
                break;
            }
            page += 1;
            current = page_url(&root, page);
        }

        categories
    }

    async fn crawl_sitemaps(&self, state: &mut CrawlState) {
        let mut queue: VecDeque<String> = sitemap_seed_urls(self.site).into();
        let mut seen: HashSet<String> = queue.iter().cloned().collect();
        let mut fetched = 0usize;

        while let Some(sitemap_url) = queue.pop_front() {
            if fetched >= MAX_SITEMAPS {
                tracing::warn!(max = MAX_SITEMAPS, "sitemap cap reached");
                break;
            }
            let body = match self.client.fetch_page(&sitemap_url).await {
                Ok(page) => page.body,
                Err(e) => {
                    tracing::warn!(url = %sitemap_url, error = %e, "sitemap fetch failed");
                    state.failed_pages.push(sitemap_url);
                    continue;
                }
            };
            fetched += 1;
            state.pages_visited += 1;

            for loc in parse_sitemap_locs(&body) {
                let Some(url) = self.site.resolve(&loc) else {
                    continue;
                };
                if !self.site.is_same_site(&url) {
                    continue;
                }
                if url.path().contains("/p/") {
                    state.products.insert(&url);
                } else if looks_like_sitemap_url(&loc) && seen.insert(loc.clone()) {
                    queue.push_back(loc);
                }
            }
        }
    }
}
