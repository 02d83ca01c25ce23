//! Bounded breadth-first crawl
//!
//! This module contains the crawl loop that turns a base URL into an ordered
//! list of canonical page URLs:
//! - Seeding the frontier with the base URL
//! - Fetching one page at a time with a politeness delay
//! - Accepting only HTML pages answered with HTTP 200
//! - Extracting and enqueueing links up to the depth limit

use crate::config::CrawlerConfig;
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::crawler::links::LinkFilter;
use crate::crawler::{FetchResult, Fetcher};
use crate::robots::{load_robots, RobotsRules};
use crate::sitemap::{render_urlset, SitemapEntry};
use crate::url::{canonicalize, CanonicalUrl};
use chrono::Local;
use url::Url;

/// Crawler for one site
///
/// The robots rules are loaded once, at construction. Each call to
/// [`Crawler::crawl`] owns a fresh frontier.
pub struct Crawler {
    fetcher: Fetcher,
    filter: LinkFilter,
    config: CrawlerConfig,
}

impl Crawler {
    /// Creates a crawler with an already loaded robots rule set
    pub fn new(fetcher: Fetcher, base: Url, robots: RobotsRules, config: CrawlerConfig) -> Self {
        Self {
            fetcher,
            filter: LinkFilter::new(base, robots),
            config,
        }
    }

    /// Creates a crawler for `base`, fetching its robots.txt first
    pub async fn for_site(fetcher: Fetcher, base: Url, config: CrawlerConfig) -> Self {
        let robots = load_robots(&fetcher, &base).await;
        Self::new(fetcher, base, robots, config)
    }

    /// Returns the rules used to filter links
    pub fn filter(&self) -> &LinkFilter {
        &self.filter
    }

    /// Runs the crawl
    ///
    /// # Crawl Loop
    ///
    /// 1. Pop the oldest `(url, depth)` from the frontier
    /// 2. Drop it if `depth` exceeds the maximum depth
    /// 3. Fetch it; keep it only for HTTP 200 with a `text/html` content type
    /// 4. Record it in discovery order
    /// 5. Below the maximum depth, enqueue every new valid link at `depth + 1`
    ///
    /// The loop ends when the frontier is empty or `max_pages` pages have
    /// been recorded.
    ///
    /// # Returns
    ///
    /// Canonical URLs of the accepted pages, in discovery order
    pub async fn crawl(&self) -> Vec<CanonicalUrl> {
        let base = canonicalize(self.filter.base().as_str());
        tracing::info!("Starting crawl of {}", base);
        tracing::info!(
            "Max depth: {}, Max pages: {}",
            self.config.max_depth,
            self.config.max_pages
        );

        let mut frontier = Frontier::seeded(base);
        let mut discovered: Vec<CanonicalUrl> = Vec::new();
        let mut fetched_any = false;

        while discovered.len() < self.config.max_pages {
            let Some(QueuedUrl { url, depth }) = frontier.pop() else {
                tracing::debug!("Frontier is empty, crawl complete");
                break;
            };

            if depth > self.config.max_depth {
                tracing::trace!("Dropping {} at depth {}", url, depth);
                continue;
            }

            if fetched_any {
                tokio::time::sleep(self.config.delay()).await;
            }
            fetched_any = true;

            let result = self.fetcher.get(url.as_str()).await;
            let (final_url, body) = match &result {
                FetchResult::Success {
                    final_url, body, ..
                } if result.is_ok_with_content_type("text/html") => (final_url, body),
                FetchResult::Success { content_type, .. } => {
                    tracing::debug!("Skipping {}: not HTML ({})", url, content_type);
                    continue;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::debug!("Skipping {}: HTTP {}", url, status_code);
                    continue;
                }
                FetchResult::NetworkError { error } => {
                    tracing::debug!("Error crawling {}: {}", url, error);
                    continue;
                }
            };

            discovered.push(url.clone());

            if depth < self.config.max_depth {
                // Relative links resolve against the post-redirect location
                let page_url = Url::parse(final_url).ok().or_else(|| url.to_url());
                if let Some(page_url) = page_url {
                    let mut enqueued = 0;
                    for link in self.filter.extract_links(&page_url, body) {
                        if frontier.push_new(link, depth + 1) {
                            enqueued += 1;
                        }
                    }
                    tracing::trace!("{} new links enqueued from {}", enqueued, url);
                }
            }

            if discovered.len() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages discovered, {} in frontier",
                    discovered.len(),
                    frontier.len()
                );
            }
        }

        tracing::info!("Crawl complete. Discovered {} pages", discovered.len());
        discovered
    }

    /// Builds sitemap entries for crawled URLs
    ///
    /// Every entry is stamped with today's date as `lastmod`, `weekly` as
    /// `changefreq` and `0.5` as `priority`.
    pub fn generate_entries(urls: &[CanonicalUrl]) -> Vec<SitemapEntry> {
        let today = Local::now().format("%Y-%m-%d").to_string();
        urls.iter()
            .map(|url| SitemapEntry::generated(url.clone(), &today))
            .collect()
    }

    /// Renders a urlset document for crawled URLs
    pub fn generate_sitemap(urls: &[CanonicalUrl]) -> String {
        tracing::info!("Generating sitemap with {} URLs", urls.len());
        render_urlset(&Self::generate_entries(urls))
    }
}
