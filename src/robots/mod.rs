//! Robots.txt handling module
//!
//! This module fetches a site's robots.txt once per crawl and turns it into a
//! set of disallowed path prefixes.

mod rules;

pub use rules::RobotsRules;

use crate::crawler::{FetchResult, Fetcher};
use url::Url;

/// Fetches and parses robots.txt for the site of `base_url`
///
/// This is best-effort: a network failure, a non-200 response, or an
/// unusable body all yield an empty rule set. It never fails the caller.
///
/// # Arguments
///
/// * `fetcher` - The shared HTTP fetcher
/// * `base_url` - Any URL on the site
///
/// # Returns
///
/// The disallowed prefixes, possibly empty
pub async fn load_robots(fetcher: &Fetcher, base_url: &Url) -> RobotsRules {
    let robots_url = match base_url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", base_url, e);
            return RobotsRules::allow_all();
        }
    };

    let result = fetcher.get(robots_url.as_str()).await;
    match result.ok_body() {
        Some(body) => {
            let rules = RobotsRules::from_content(body);
            tracing::debug!(
                "Loaded robots.txt from {} ({} disallowed prefixes)",
                robots_url,
                rules.disallowed().len()
            );
            rules
        }
        None => {
            match &result {
                FetchResult::HttpError { status_code } => {
                    tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, status_code)
                }
                FetchResult::NetworkError { error } => {
                    tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, error)
                }
                FetchResult::Success { status_code, .. } => {
                    tracing::debug!("Ignoring robots.txt at {} (HTTP {})", robots_url, status_code)
                }
            }
            RobotsRules::allow_all()
        }
    }
}
