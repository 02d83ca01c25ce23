//! Sitemap location and download
//!
//! Locating tries three sources in order and stops at the first hit:
//! - A `Sitemap:` directive in robots.txt
//! - A fixed list of conventional paths
//! - Anchors on the homepage whose href mentions "sitemap"
//!
//! Every step degrades to "try the next one". Only the download of a sitemap
//! that was explicitly located can fail the caller.

use crate::crawler::{sitemap_anchors, FetchResult, Fetcher};
use crate::sitemap::document::render_urlset;
use crate::sitemap::index::{decode_body, flatten_index, is_sitemap_index};
use crate::sitemap::reader::dedup_entries;
use crate::{Result, ScoutError};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Conventional sitemap paths, probed in order
pub const COMMON_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemapindex.xml",
    "/sitemap/",
    "/sitemap.txt",
    "/sitemap.xml.gz",
    "/wp-sitemap.xml",
    "/page-sitemap.xml",
    "/post-sitemap.xml",
    "/news-sitemap.xml",
];

/// Outcome of one locate step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A sitemap URL was found
    Found(Url),
    /// The source answered but holds no sitemap
    NotFound,
    /// The source could not be checked
    Failed(String),
}

/// Finds and downloads the sitemap of one site
#[derive(Debug, Clone)]
pub struct SitemapLocator {
    fetcher: Fetcher,
    base: Url,
    staging_dir: PathBuf,
    index_concurrency: usize,
}

impl SitemapLocator {
    /// Creates a locator staging downloads in the system temp directory
    pub fn new(fetcher: Fetcher, base: Url) -> Self {
        Self {
            fetcher,
            base,
            staging_dir: std::env::temp_dir(),
            index_concurrency: 4,
        }
    }

    /// Sets the directory downloaded documents are staged in
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Sets how many index children may be fetched at once
    pub fn with_index_concurrency(mut self, concurrency: usize) -> Self {
        self.index_concurrency = concurrency.max(1);
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Searches for the site's sitemap
    ///
    /// # Returns
    ///
    /// The first sitemap URL found, or None when every step came up empty
    pub async fn locate(&self) -> Option<Url> {
        if let Some(url) = accept("robots.txt", self.from_robots().await) {
            return Some(url);
        }

        if let Some(url) = accept("common paths", self.from_common_paths().await) {
            return Some(url);
        }

        if let Some(url) = accept("homepage links", self.from_homepage().await) {
            return Some(url);
        }

        tracing::warn!("Could not find sitemap automatically for {}", self.base);
        None
    }

    /// Looks for a `Sitemap:` directive in robots.txt
    pub async fn from_robots(&self) -> Probe {
        let Ok(robots_url) = self.base.join("/robots.txt") else {
            return Probe::Failed("cannot build robots.txt URL".to_string());
        };

        let result = self.fetcher.get(robots_url.as_str()).await;
        let body = match (&result, result.ok_body()) {
            (_, Some(body)) => body,
            (FetchResult::NetworkError { error }, _) => return Probe::Failed(error.clone()),
            _ => return Probe::NotFound,
        };

        let directive = body.lines().find_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("sitemap")
                .then(|| value.trim().to_string())
        });

        match directive {
            Some(value) if !value.is_empty() => match self.base.join(&value) {
                Ok(url) => Probe::Found(url),
                Err(e) => Probe::Failed(format!("bad Sitemap directive {:?}: {}", value, e)),
            },
            _ => Probe::NotFound,
        }
    }

    /// Probes the conventional sitemap paths
    ///
    /// A candidate must answer HEAD with 200 and then look like XML: either
    /// its Content-Type mentions "xml" or its body starts with `<?xml`.
    pub async fn from_common_paths(&self) -> Probe {
        let mut last_failure = None;

        for path in COMMON_PATHS {
            let Ok(candidate) = self.base.join(path) else {
                continue;
            };

            match self.fetcher.head(candidate.as_str()).await {
                Some(200) => {}
                Some(status) => {
                    tracing::trace!("{} answered HEAD with {}", candidate, status);
                    continue;
                }
                None => {
                    last_failure = Some(format!("{} unreachable", candidate));
                    continue;
                }
            }

            let result = self.fetcher.get(candidate.as_str()).await;
            let looks_like_xml = result.is_ok_with_content_type("xml")
                || result
                    .ok_body()
                    .is_some_and(|body| body.trim_start().starts_with("<?xml"));

            if looks_like_xml {
                return Probe::Found(candidate);
            }
            tracing::debug!("{} exists but is not XML", candidate);
        }

        match last_failure {
            Some(reason) => Probe::Failed(reason),
            None => Probe::NotFound,
        }
    }

    /// Scans homepage anchors for a reachable sitemap link
    pub async fn from_homepage(&self) -> Probe {
        let result = self.fetcher.get(self.base.as_str()).await;
        let body = match (&result, result.ok_body()) {
            (_, Some(body)) => body,
            (FetchResult::NetworkError { error }, _) => return Probe::Failed(error.clone()),
            _ => return Probe::NotFound,
        };

        for candidate in sitemap_anchors(body, &self.base) {
            if self.fetcher.head(candidate.as_str()).await == Some(200) {
                return Probe::Found(candidate);
            }
        }

        Probe::NotFound
    }

    /// Downloads a sitemap and stages it as a local urlset document
    ///
    /// Gzip bodies are decompressed. A sitemap index is flattened into one
    /// combined urlset first.
    ///
    /// # Errors
    ///
    /// * `ScoutError::Http` - The request itself failed
    /// * `ScoutError::DownloadFailed` - The server answered with status 400 or above
    /// * `ScoutError::Io` - The body could not be decompressed or staged
    pub async fn download(&self, url: &Url) -> Result<PathBuf> {
        tracing::info!("Downloading sitemap from {}", url);

        let (status, bytes) =
            self.fetcher
                .get_bytes(url.as_str())
                .await
                .map_err(|source| ScoutError::Http {
                    url: url.to_string(),
                    source,
                })?;

        if status.as_u16() >= 400 {
            return Err(ScoutError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = decode_body(&bytes)?;

        let document = if is_sitemap_index(&text) {
            tracing::info!("Found sitemap index, processing child sitemaps");
            let entries = flatten_index(&self.fetcher, &text, self.index_concurrency).await;
            render_urlset(&dedup_entries(entries))
        } else {
            text
        };

        let path = stage(&self.staging_dir, &document)?;
        tracing::info!("Sitemap downloaded to {}", path.display());
        Ok(path)
    }
}

/// Logs a step outcome and returns the URL on success
fn accept(step: &str, probe: Probe) -> Option<Url> {
    match probe {
        Probe::Found(url) => {
            tracing::info!("Found sitemap via {}: {}", step, url);
            Some(url)
        }
        Probe::NotFound => {
            tracing::debug!("No sitemap via {}", step);
            None
        }
        Probe::Failed(reason) => {
            tracing::debug!("Sitemap lookup via {} failed: {}", step, reason);
            None
        }
    }
}

/// Writes a document to a new file in `dir` that outlives this process
fn stage(dir: &Path, document: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new()
        .prefix("sitemap-")
        .suffix(".xml")
        .tempfile_in(dir)?;
    file.write_all(document.as_bytes())?;
    let path = file.into_temp_path().keep().map_err(|e| e.error)?;
    Ok(path)
}
