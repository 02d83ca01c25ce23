//! URL handling module for Sitemap-Scout
//!
//! This module provides the canonicalizer used as the single deduplication key
//! across the crate, plus small authority and naming helpers.

mod canonical;
mod site;

pub use canonical::{canonicalize, CanonicalUrl};
pub use site::{same_authority, site_slug};
