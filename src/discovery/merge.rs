//! Reconciliation of sitemap and crawl results

use crate::sitemap::SitemapEntry;
use std::collections::HashSet;

/// Unions sitemap entries with crawl-generated entries
///
/// Sitemap entries come first in their own order, followed by every crawled
/// entry whose URL is not already present. Duplicates within either list are
/// dropped. A URL present in the sitemap keeps the sitemap's metadata.
pub fn merge_entries(sitemap: Vec<SitemapEntry>, crawled: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    let merged: Vec<SitemapEntry> = sitemap
        .into_iter()
        .chain(crawled)
        .filter(|entry| seen.insert(entry.loc.clone()))
        .collect();
    tracing::debug!("Merged sitemap and crawl into {} entries", merged.len());
    merged
}
