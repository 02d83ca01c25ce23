//! Sitemap index flattening
//!
//! A `sitemapindex` document lists child sitemaps. Each child is fetched,
//! decompressed when gzip-encoded, and read as a urlset; the children's
//! entries are concatenated in index order.

use crate::crawler::Fetcher;
use crate::sitemap::document::SitemapEntry;
use crate::sitemap::reader::{scan_records, scan_urlset};
use flate2::read::GzDecoder;
use futures::stream::{self, StreamExt};
use std::io::{self, Read};

/// Leading bytes of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true when the document is a sitemap index
///
/// This is a plain substring test on the raw text.
pub fn is_sitemap_index(xml: &str) -> bool {
    xml.contains("sitemapindex")
}

/// Returns true when the bytes start with the gzip magic number
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decodes a downloaded sitemap body to text
///
/// Gzip streams are decompressed. Anything else is taken as text, including
/// `.gz` URLs whose transfer encoding was already removed by the client.
/// Invalid UTF-8 is replaced.
pub fn decode_body(bytes: &[u8]) -> io::Result<String> {
    if !is_gzip(bytes) {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Lists the child sitemap URLs of an index, in document order
///
/// Every `loc` under every `sitemap` element is listed. A malformed index
/// lists nothing.
pub fn child_sitemaps(xml: &str) -> Vec<String> {
    match scan_records(xml, "sitemap") {
        Ok(records) => records
            .into_iter()
            .flat_map(|record| record.locs)
            .filter(|loc| !loc.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!("Error parsing sitemap index: {}", e);
            Vec::new()
        }
    }
}

/// Flattens a sitemap index into the entries of all its children
///
/// Children are fetched with at most `concurrency` requests in flight, and
/// their entries are concatenated in index order. A child that cannot be
/// fetched, decoded or parsed is logged and skipped. Entries are not
/// deduplicated here.
pub async fn flatten_index(fetcher: &Fetcher, xml: &str, concurrency: usize) -> Vec<SitemapEntry> {
    let children = child_sitemaps(xml);
    tracing::info!("Sitemap index lists {} child sitemaps", children.len());

    let per_child: Vec<Vec<SitemapEntry>> = stream::iter(children.iter())
        .map(|loc| fetch_child(fetcher, loc))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let entries: Vec<SitemapEntry> = per_child.into_iter().flatten().collect();
    tracing::info!("Combined {} entries from sitemap index", entries.len());
    entries
}

/// Fetches and reads one child sitemap
async fn fetch_child(fetcher: &Fetcher, loc: &str) -> Vec<SitemapEntry> {
    tracing::debug!("Fetching child sitemap {}", loc);

    let bytes = match fetcher.get_bytes(loc).await {
        Ok((status, bytes)) if status.is_success() => bytes,
        Ok((status, _)) => {
            tracing::warn!("Error fetching child sitemap {}: HTTP {}", loc, status.as_u16());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Error fetching child sitemap {}: {}", loc, e);
            return Vec::new();
        }
    };

    let xml = match decode_body(&bytes) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::warn!("Error decompressing child sitemap {}: {}", loc, e);
            return Vec::new();
        }
    };

    match scan_urlset(&xml) {
        Ok(entries) => {
            tracing::debug!("Child sitemap {} has {} entries", loc, entries.len());
            entries
        }
        Err(e) => {
            tracing::warn!("Error parsing child sitemap {}: {}", loc, e);
            Vec::new()
        }
    }
}
