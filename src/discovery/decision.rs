//! Fallback decisions when a site has no usable sitemap

use crate::config::OnMissing;
use crate::{Result, ScoutError};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use url::Url;

/// What to do when no usable sitemap was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackChoice {
    /// Crawl the site and generate a sitemap
    Crawl,
    /// Download a sitemap from a user-supplied URL
    Manual(String),
    /// Abort discovery
    Cancel,
}

/// Source of the fallback decision
///
/// The orchestrator asks at most once per run.
pub trait DecisionProvider {
    fn choose(&self, base: &Url) -> Result<FallbackChoice>;
}

/// Always returns the same choice
#[derive(Debug, Clone)]
pub struct FixedDecision(pub FallbackChoice);

impl FixedDecision {
    /// Maps the non-interactive `on-missing` setting to a fixed choice
    ///
    /// Returns None for `prompt`, which needs a terminal.
    pub fn from_on_missing(on_missing: OnMissing) -> Option<Self> {
        match on_missing {
            OnMissing::Crawl => Some(Self(FallbackChoice::Crawl)),
            OnMissing::Cancel => Some(Self(FallbackChoice::Cancel)),
            OnMissing::Prompt => None,
        }
    }
}

impl DecisionProvider for FixedDecision {
    fn choose(&self, base: &Url) -> Result<FallbackChoice> {
        tracing::debug!("Using fixed fallback {:?} for {}", self.0, base);
        Ok(self.0.clone())
    }
}

/// Asks on the terminal
#[derive(Debug, Default)]
pub struct PromptDecision;

impl DecisionProvider for PromptDecision {
    fn choose(&self, base: &Url) -> Result<FallbackChoice> {
        let theme = ColorfulTheme::default();
        let items = [
            "Crawl the website to discover pages automatically",
            "Enter a sitemap URL manually",
            "Cancel",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt(format!("No sitemap found for {}. What would you like to do?", base))
            .items(&items)
            .default(0)
            .interact()
            .map_err(|e| ScoutError::Prompt(e.to_string()))?;

        match selection {
            0 => Ok(FallbackChoice::Crawl),
            1 => {
                let url: String = Input::with_theme(&theme)
                    .with_prompt("Sitemap URL")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| ScoutError::Prompt(e.to_string()))?;
                Ok(FallbackChoice::Manual(url))
            }
            _ => Ok(FallbackChoice::Cancel),
        }
    }
}
