//! Sitemap documents
//!
//! This module contains everything that touches sitemap XML:
//! - The entry model and the urlset writer
//! - The namespace-tolerant reader
//! - Sitemap index flattening and gzip decoding
//! - Locating and downloading a site's sitemap

mod document;
mod index;
mod locator;
mod reader;

pub use document::{render_urlset, write_document, SitemapEntry, SITEMAP_NS};
pub use index::{child_sitemaps, decode_body, flatten_index, is_gzip, is_sitemap_index};
pub use locator::{Probe, SitemapLocator, COMMON_PATHS};
pub use reader::{parse, parse_entries, parse_str, read_entries};
