//! Discovery of a site's page URLs
//!
//! Ties the sitemap locator, the crawler and the fallback decision together
//! and reconciles their results into one ordered URL list.

mod decision;
mod merge;
mod orchestrator;

pub use decision::{DecisionProvider, FallbackChoice, FixedDecision, PromptDecision};
pub use merge::merge_entries;
pub use orchestrator::{DiscoveryResult, Orchestrator, Provenance};
