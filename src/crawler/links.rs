//! HTML link extraction and crawl validity rules
//!
//! Links come from `<a href>` and `<link href>` tags. Each href is resolved
//! against the page URL, stripped of query and fragment, canonicalized, and
//! kept only if the crawl may follow it.

use crate::robots::RobotsRules;
use crate::url::{canonicalize, same_authority, CanonicalUrl};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Path suffixes of binary, asset and data files that are never crawled
const SKIP_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", // images
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", // documents
    ".zip", ".rar", ".tar", ".gz", ".7z", // archives
    ".mp3", ".mp4", ".avi", ".mov", ".wmv", // media
    ".css", ".js", ".json", ".xml", ".rss", ".atom", // assets and feeds
];

/// Path segments of non-content areas, rejected wherever they appear
const SKIP_SEGMENTS: &[&str] = &["wp-admin", "admin", "login", "logout", ".well-known"];

/// Segments rejected only when something follows them (`/feed/...`)
const SKIP_DIRECTORY_SEGMENTS: &[&str] = &["feed"];

/// Segments rejected only as the last segment (`/api`, `/docs/api/`)
const SKIP_ENDPOINT_SEGMENTS: &[&str] = &["api"];

/// Checks a lowercased path against the non-content segment rules
fn is_content_path(path: &str) -> bool {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let last = path.trim_matches('/').rsplit('/').next().unwrap_or("");

    let blocked = segments.iter().enumerate().any(|(i, segment)| {
        SKIP_SEGMENTS.contains(segment)
            || (SKIP_DIRECTORY_SEGMENTS.contains(segment) && i + 1 < segments.len())
    });

    !blocked && !SKIP_ENDPOINT_SEGMENTS.contains(&last)
}

/// Decides which discovered URLs a crawl may follow
#[derive(Debug, Clone)]
pub struct LinkFilter {
    base: Url,
    robots: RobotsRules,
}

impl LinkFilter {
    pub fn new(base: Url, robots: RobotsRules) -> Self {
        Self { base, robots }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn robots(&self) -> &RobotsRules {
        &self.robots
    }

    /// Checks whether a URL should be crawled
    ///
    /// # Rules
    ///
    /// - Same authority as the base URL
    /// - HTTP or HTTPS scheme
    /// - Path does not end in a skipped extension
    /// - No path segment names a non-content area (`admin`, `login`, ...),
    ///   no `feed` directory, and the last segment is not `api`
    /// - Path is allowed by robots.txt
    pub fn is_valid(&self, url: &Url) -> bool {
        if !same_authority(&self.base, url) {
            return false;
        }

        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let path_lower = url.path().to_ascii_lowercase();

        if SKIP_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext)) {
            return false;
        }

        if !is_content_path(&path_lower) {
            return false;
        }

        self.robots.is_allowed(url)
    }

    /// Extracts the crawlable links from an HTML page
    ///
    /// # Arguments
    ///
    /// * `page_url` - The URL the page was fetched from, for relative hrefs
    /// * `html` - The page body
    ///
    /// # Returns
    ///
    /// Canonical URLs in first-seen document order, without duplicates
    pub fn extract_links(&self, page_url: &Url, html: &str) -> Vec<CanonicalUrl> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for href in hrefs(html, "a[href], link[href]") {
            let Some(canonical) = resolve_link(&href, page_url) else {
                continue;
            };

            let Some(parsed) = canonical.to_url() else {
                continue;
            };

            if self.is_valid(&parsed) && seen.insert(canonical.clone()) {
                links.push(canonical);
            }
        }

        links
    }
}

/// Resolves an href against a page URL and canonicalizes it
///
/// Returns None for empty hrefs and hrefs that cannot be resolved.
fn resolve_link(href: &str, page_url: &Url) -> Option<CanonicalUrl> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    absolute.set_query(None);
    absolute.set_fragment(None);

    Some(canonicalize(absolute.as_str()))
}

/// Collects raw `href` attribute values for a selector, in document order
fn hrefs(html: &str, selector: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Finds anchors that look like sitemap links
///
/// Returns absolute URLs for every `<a href>` whose href contains "sitemap"
/// (any case), in document order.
pub fn sitemap_anchors(html: &str, page_url: &Url) -> Vec<Url> {
    hrefs(html, "a[href]")
        .into_iter()
        .filter(|href| href.to_ascii_lowercase().contains("sitemap"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .collect()
}
