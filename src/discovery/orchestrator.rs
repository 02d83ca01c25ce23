//! Discovery orchestration
//!
//! One run walks these branches:
//! - Sitemap found with URLs: use it as-is, or merge a crawl into it when
//!   augmentation is on
//! - No sitemap, or one without usable URLs: ask the decision provider to
//!   crawl, take a manual sitemap URL, or cancel
//!
//! Every successful branch leaves a urlset document at the configured
//! output path.

use crate::config::Config;
use crate::crawler::{Crawler, Fetcher};
use crate::discovery::decision::{DecisionProvider, FallbackChoice};
use crate::discovery::merge::merge_entries;
use crate::sitemap::{read_entries, write_document, SitemapEntry, SitemapLocator};
use crate::url::CanonicalUrl;
use crate::{Result, ScoutError, SitemapError};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the discovered URLs came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The site's own sitemap
    Found,
    /// A crawl, because no usable sitemap existed
    Generated,
    /// A sitemap URL supplied by the user
    Manual,
    /// The site's sitemap merged with a crawl
    Augmented,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Found => "found",
            Self::Generated => "generated",
            Self::Manual => "manual",
            Self::Augmented => "augmented",
        };
        f.write_str(name)
    }
}

/// Outcome of a discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    pub provenance: Provenance,
    /// Sitemap the entries were read from; None for a generated sitemap
    pub sitemap_url: Option<Url>,
    /// Entries in order, without duplicate canonical URLs
    pub entries: Vec<SitemapEntry>,
    /// Where the sitemap document was persisted
    pub sitemap_path: PathBuf,
}

impl DiscoveryResult {
    /// Canonical URLs in order
    pub fn urls(&self) -> Vec<CanonicalUrl> {
        self.entries.iter().map(|e| e.loc.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs sitemap discovery for a site
pub struct Orchestrator {
    config: Config,
    fetcher: Fetcher,
    staging_dir: PathBuf,
}

impl Orchestrator {
    /// Creates an orchestrator with its own HTTP client
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates an orchestrator sharing an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self {
            config,
            fetcher,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Sets the directory downloads are staged in before being persisted
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discovers the pages of the site at `base`
    ///
    /// `decider` is consulted only when no usable sitemap exists.
    ///
    /// # Errors
    ///
    /// * `ScoutError::DownloadFailed` / `ScoutError::Http` - A located or
    ///   manually supplied sitemap could not be downloaded
    /// * `ScoutError::Cancelled` - The decision provider chose to cancel
    /// * `ScoutError::NoPagesDiscovered` - A fallback crawl found nothing
    /// * `ScoutError::Sitemap` - The output document could not be written
    pub async fn discover(
        &self,
        base: &Url,
        decider: &dyn DecisionProvider,
    ) -> Result<DiscoveryResult> {
        tracing::info!("Discovering pages of {}", base);

        let locator = self.locator(base);
        let output = self.config.discovery.output.as_path();

        let located = match locator.locate().await {
            Some(url) => {
                let staged = locator.download(&url).await?;
                let entries = load_staged(&staged)?;
                Some((url, staged, entries))
            }
            None => None,
        };

        let mut result = match located {
            Some((url, staged, entries)) if !entries.is_empty() => {
                tracing::info!("Sitemap at {} lists {} URLs", url, entries.len());
                if self.config.discovery.augment {
                    discard_staged(&staged);
                    self.augment(base, url, entries, output).await?
                } else {
                    persist_staged(&staged, output)?;
                    DiscoveryResult {
                        provenance: Provenance::Found,
                        sitemap_url: Some(url),
                        entries,
                        sitemap_path: output.to_path_buf(),
                    }
                }
            }
            Some((url, staged, _)) => {
                tracing::warn!("Sitemap at {} has no usable URLs", url);
                discard_staged(&staged);
                self.fallback(base, decider, &locator, output).await?
            }
            None => {
                tracing::warn!("No sitemap found for {}", base);
                self.fallback(base, decider, &locator, output).await?
            }
        };

        if let Some(limit) = self.config.discovery.limit {
            if result.entries.len() > limit {
                tracing::info!("Limiting {} URLs to {}", result.entries.len(), limit);
                result.entries.truncate(limit);
            }
        }

        tracing::info!(
            "Discovery complete: {} URLs ({})",
            result.entries.len(),
            result.provenance
        );
        Ok(result)
    }

    fn locator(&self, base: &Url) -> SitemapLocator {
        SitemapLocator::new(self.fetcher.clone(), base.clone())
            .with_staging_dir(&self.staging_dir)
            .with_index_concurrency(self.config.discovery.index_concurrency)
    }

    async fn crawl(&self, base: &Url) -> Vec<CanonicalUrl> {
        let crawler =
            Crawler::for_site(self.fetcher.clone(), base.clone(), self.config.crawler.clone())
                .await;
        crawler.crawl().await
    }

    /// Merges a crawl into a found sitemap and persists the union
    async fn augment(
        &self,
        base: &Url,
        sitemap_url: Url,
        sitemap_entries: Vec<SitemapEntry>,
        output: &Path,
    ) -> Result<DiscoveryResult> {
        tracing::info!("Augmenting sitemap with a crawl of {}", base);
        let crawled = self.crawl(base).await;
        let sitemap_len = sitemap_entries.len();

        let entries = merge_entries(sitemap_entries, Crawler::generate_entries(&crawled));
        tracing::info!(
            "Crawl added {} URLs to the {} from the sitemap",
            entries.len() - sitemap_len,
            sitemap_len
        );

        write_document(output, &entries)?;
        Ok(DiscoveryResult {
            provenance: Provenance::Augmented,
            sitemap_url: Some(sitemap_url),
            entries,
            sitemap_path: output.to_path_buf(),
        })
    }

    /// Handles a site without a usable sitemap
    async fn fallback(
        &self,
        base: &Url,
        decider: &dyn DecisionProvider,
        locator: &SitemapLocator,
        output: &Path,
    ) -> Result<DiscoveryResult> {
        match decider.choose(base)? {
            FallbackChoice::Crawl => {
                let urls = self.crawl(base).await;
                if urls.is_empty() {
                    return Err(ScoutError::NoPagesDiscovered {
                        url: base.to_string(),
                    });
                }

                let entries = Crawler::generate_entries(&urls);
                write_document(output, &entries)?;
                Ok(DiscoveryResult {
                    provenance: Provenance::Generated,
                    sitemap_url: None,
                    entries,
                    sitemap_path: output.to_path_buf(),
                })
            }
            FallbackChoice::Manual(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(ScoutError::InvalidSitemapUrl(
                        "no sitemap URL provided".to_string(),
                    ));
                }
                let url = base
                    .join(raw)
                    .map_err(|e| ScoutError::InvalidSitemapUrl(format!("{}: {}", raw, e)))?;

                let staged = locator.download(&url).await?;
                let entries = load_staged(&staged)?;
                if entries.is_empty() {
                    tracing::warn!("Manual sitemap {} has no usable URLs", url);
                }
                persist_staged(&staged, output)?;

                Ok(DiscoveryResult {
                    provenance: Provenance::Manual,
                    sitemap_url: Some(url),
                    entries,
                    sitemap_path: output.to_path_buf(),
                })
            }
            FallbackChoice::Cancel => Err(ScoutError::Cancelled),
        }
    }
}

/// Reads a staged document, removing it when it cannot be read
fn load_staged(staged: &Path) -> Result<Vec<SitemapEntry>> {
    read_entries(staged).map_err(|e| {
        discard_staged(staged);
        e.into()
    })
}

/// Moves a staged document to the output path
fn persist_staged(staged: &Path, output: &Path) -> Result<()> {
    let to_write_error = |source| SitemapError::Write {
        path: output.to_path_buf(),
        source,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    std::fs::copy(staged, output).map_err(to_write_error)?;
    tracing::info!("Saved sitemap to {}", output.display());

    discard_staged(staged);
    Ok(())
}

fn discard_staged(staged: &Path) {
    if let Err(e) = std::fs::remove_file(staged) {
        tracing::debug!("Could not remove staged sitemap {}: {}", staged.display(), e);
    }
}
