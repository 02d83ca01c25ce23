//! Sitemap-Scout: sitemap discovery and crawl reconciliation
//!
//! This crate discovers the canonical page URLs of a website from two sources,
//! a published sitemap (plain, index, or gzip-compressed) and a bounded
//! breadth-first crawl, and reconciles them into one ordered URL list.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod robots;
pub mod sitemap;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitemap-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to download sitemap {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid sitemap URL: {0}")]
    InvalidSitemapUrl(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("No pages could be discovered by crawling {url}")]
    NoPagesDiscovered { url: String },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Sitemap document errors
///
/// Malformed or empty documents are not errors; they parse to an empty list.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to read sitemap {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write sitemap {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Sitemap-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap document operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{DiscoveryResult, Orchestrator, Provenance};
pub use sitemap::SitemapEntry;
pub use url::{canonicalize, CanonicalUrl};
