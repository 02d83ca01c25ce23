//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during discovery:
//! - Building the shared HTTP client (user agent, timeout, redirects)
//! - GET requests for pages and robots.txt, classified into `FetchResult`
//! - Raw byte downloads for sitemap documents
//! - HEAD existence checks for sitemap probes

use crate::config::HttpConfig;
use reqwest::{redirect::Policy, Client, StatusCode};

/// Result of a page fetch
///
/// Transient failures are values, not errors: callers decide whether a
/// failed fetch means "skip" or "abort".
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a success status
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Response body
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body when the response was exactly HTTP 200
    pub fn ok_body(&self) -> Option<&str> {
        match self {
            Self::Success {
                status_code: 200,
                body,
                ..
            } => Some(body),
            _ => None,
        }
    }

    /// Returns true for an HTTP 200 response whose Content-Type contains `needle`
    pub fn is_ok_with_content_type(&self, needle: &str) -> bool {
        match self {
            Self::Success {
                status_code: 200,
                content_type,
                ..
            } => content_type.to_ascii_lowercase().contains(needle),
            _ => false,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared HTTP capability for locator, robots loader and crawler
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL as text, following redirects
    ///
    /// # Returns
    ///
    /// A FetchResult indicating success or the type of failure
    pub async fn get(&self, url: &str) -> FetchResult {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                let final_url = response.url().to_string();

                if !status.is_success() {
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                match response.text().await {
                    Ok(body) => FetchResult::Success {
                        final_url,
                        status_code: status.as_u16(),
                        content_type,
                        body,
                    },
                    Err(e) => FetchResult::NetworkError {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => FetchResult::NetworkError {
                error: classify_error(&e),
            },
        }
    }

    /// Fetches a URL as raw bytes
    ///
    /// Used for sitemap documents, which may be gzip files served without a
    /// `Content-Encoding` header.
    pub async fn get_bytes(&self, url: &str) -> Result<(StatusCode, Vec<u8>), reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        Ok((status, bytes.to_vec()))
    }

    /// Sends a HEAD request and returns the final status code
    ///
    /// * `Some(status)` - The server answered
    /// * `None` - The request failed before a status was received
    pub async fn head(&self, url: &str) -> Option<u16> {
        match self.client.head(url).send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", url, classify_error(&e));
                None
            }
        }
    }
}

/// Produces a short description for a transport error
fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
