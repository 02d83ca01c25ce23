//! Sitemap document reader
//!
//! Elements are matched by local name, so documents with or without the
//! sitemaps.org namespace (or with a prefix) read the same way. A document
//! that is not well formed reads as empty.

use crate::sitemap::document::SitemapEntry;
use crate::url::{canonicalize, CanonicalUrl};
use crate::{SitemapError, SitemapResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::path::Path;

/// Text children of one `url` or `sitemap` element
#[derive(Debug, Default)]
pub(crate) struct Record {
    pub locs: Vec<String>,
    pub lastmod: Option<String>,
    pub changefreq: Option<String>,
    pub priority: Option<String>,
}

impl Record {
    /// First non-empty `loc`, as an entry
    fn into_entry(self) -> Option<SitemapEntry> {
        let loc = self.locs.into_iter().find(|l| !l.is_empty())?;
        Some(SitemapEntry {
            loc: canonicalize(&loc),
            lastmod: self.lastmod,
            changefreq: self.changefreq,
            priority: self.priority,
        })
    }
}

/// Collects the direct text children of every `container` element
///
/// Fails only when the document is not well formed.
pub(crate) fn scan_records(xml: &str, container: &str) -> Result<Vec<Record>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<(usize, Record)> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        let record_depth = current.as_ref().map(|(d, _)| *d);

        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                match record_depth {
                    None if name == container => current = Some((depth, Record::default())),
                    Some(d) if depth == d + 1 => field = Some((name, String::new())),
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some((_, text)) = field.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                if record_depth == Some(depth) {
                    if let Some((_, record)) = current.take() {
                        records.push(record);
                    }
                } else if record_depth.map(|d| d + 1) == Some(depth) {
                    if let (Some((_, record)), Some((name, text))) = (current.as_mut(), field.take())
                    {
                        let text = text.trim().to_string();
                        match name.as_str() {
                            "loc" => record.locs.push(text),
                            "lastmod" => record.lastmod = Some(text),
                            "changefreq" => record.changefreq = Some(text),
                            "priority" => record.priority = Some(text),
                            _ => {}
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Reads every `url` entry of a urlset, without deduplication
pub(crate) fn scan_urlset(xml: &str) -> Result<Vec<SitemapEntry>, quick_xml::Error> {
    Ok(scan_records(xml, "url")?
        .into_iter()
        .filter_map(Record::into_entry)
        .collect())
}

/// Parses sitemap entries from XML text
///
/// For every `url` element the first `loc` child is canonicalized. Entries
/// are deduplicated by canonical URL; the first occurrence wins and keeps
/// its metadata.
///
/// # Returns
///
/// Entries in document order. Empty for empty or malformed documents.
pub fn parse_entries(xml: &str) -> Vec<SitemapEntry> {
    match scan_urlset(xml) {
        Ok(entries) => dedup_entries(entries),
        Err(e) => {
            tracing::warn!("Error parsing sitemap: {}", e);
            Vec::new()
        }
    }
}

/// Parses canonical page URLs from XML text
pub fn parse_str(xml: &str) -> Vec<CanonicalUrl> {
    parse_entries(xml).into_iter().map(|e| e.loc).collect()
}

/// Reads sitemap entries from a file
///
/// # Errors
///
/// Only a failure to read the file is an error. Invalid UTF-8 is replaced,
/// and a malformed document yields an empty list.
pub fn read_entries(path: &Path) -> SitemapResult<Vec<SitemapEntry>> {
    let bytes = std::fs::read(path).map_err(|source| SitemapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(&String::from_utf8_lossy(&bytes));
    tracing::debug!("Read {} sitemap entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Reads canonical page URLs from a sitemap file
pub fn parse(path: &Path) -> SitemapResult<Vec<CanonicalUrl>> {
    Ok(read_entries(path)?.into_iter().map(|e| e.loc).collect())
}

/// Keeps the first entry for each canonical URL
pub(crate) fn dedup_entries(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.loc.clone()))
        .collect()
}
