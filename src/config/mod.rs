//! Configuration module for Sitemap-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section and key is optional; command-line flags override file values.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DiscoveryConfig, HttpConfig, OnMissing};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_base_url};
