//! Sitemap entry model and urlset writer

use crate::url::CanonicalUrl;
use crate::{SitemapError, SitemapResult};
use quick_xml::escape::escape;
use std::path::Path;

/// Namespace written on every generated `urlset`
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Default `changefreq` stamped on crawl-generated entries
pub const DEFAULT_CHANGEFREQ: &str = "weekly";

/// Default `priority` stamped on crawl-generated entries
pub const DEFAULT_PRIORITY: &str = "0.5";

/// One page of a sitemap
///
/// `lastmod`, `changefreq` and `priority` are carried through as the raw
/// text found in the source document; they are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: CanonicalUrl,
    pub lastmod: Option<String>,
    pub changefreq: Option<String>,
    pub priority: Option<String>,
}

impl SitemapEntry {
    /// Creates an entry without metadata
    pub fn new(loc: CanonicalUrl) -> Self {
        Self {
            loc,
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    /// Creates an entry stamped with the crawl defaults
    pub fn generated(loc: CanonicalUrl, lastmod: &str) -> Self {
        Self {
            loc,
            lastmod: Some(lastmod.to_string()),
            changefreq: Some(DEFAULT_CHANGEFREQ.to_string()),
            priority: Some(DEFAULT_PRIORITY.to_string()),
        }
    }
}

/// Renders entries as a `urlset` document
///
/// Entry order is preserved. Empty metadata values are omitted.
pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(128 + entries.len() * 160);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NS));

    for entry in entries {
        xml.push_str("  <url>\n");
        push_element(&mut xml, "loc", entry.loc.as_str());
        for (tag, value) in [
            ("lastmod", &entry.lastmod),
            ("changefreq", &entry.changefreq),
            ("priority", &entry.priority),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                push_element(&mut xml, tag, value);
            }
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_element(xml: &mut String, tag: &str, text: &str) {
    xml.push_str(&format!("    <{tag}>{}</{tag}>\n", escape(text)));
}

/// Writes entries as a `urlset` document at `path`
///
/// Missing parent directories are created.
pub fn write_document(path: &Path, entries: &[SitemapEntry]) -> SitemapResult<()> {
    let to_write_error = |source| SitemapError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }

    std::fs::write(path, render_urlset(entries)).map_err(to_write_error)?;
    tracing::info!("Wrote sitemap with {} URLs to {}", entries.len(), path.display());
    Ok(())
}
