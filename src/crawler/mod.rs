//! Crawler module for breadth-first page discovery
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with classified results
//! - HTML link extraction and validity rules
//! - The FIFO frontier with its visited set
//! - The bounded crawl loop and sitemap synthesis

mod crawl;
mod fetcher;
mod frontier;
mod links;

pub use crawl::Crawler;
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use frontier::{Frontier, QueuedUrl};
pub use links::{sitemap_anchors, LinkFilter};
