use std::fmt;
use url::Url;

/// The deduplication key for a page
///
/// Two URLs that canonicalize to the same string are the same page. Values are
/// only produced by [`canonicalize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Returns the canonical form as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the canonical form back into a `Url`
    ///
    /// Returns `None` for the degenerate pass-through forms (non-HTTP schemes,
    /// unparseable input).
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    /// Consumes the key and returns the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a URL into its deduplication key
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; input that does not parse passes through unchanged
/// 2. Non-HTTP(S) schemes pass through unchanged
/// 3. Keep scheme and authority
/// 4. Empty path or `/` becomes `/`; otherwise trailing slashes are stripped
/// 5. Drop query and fragment
///
/// Parsing also normalizes what the `url` crate normalizes: scheme and host
/// are lowercased, a default port is dropped, `.` and `..` segments are
/// resolved, and characters outside the URL character set are
/// percent-encoded. `HTTPS://Example.COM:443/a/../b/` and
/// `https://example.com/b` are therefore the same page.
///
/// This function never fails. Every component routes URLs through it before
/// storing or comparing them.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::canonicalize;
///
/// assert_eq!(canonicalize("https://example.com").as_str(), "https://example.com/");
/// assert_eq!(canonicalize("https://example.com/docs/?a=1#top").as_str(), "https://example.com/docs");
/// ```
pub fn canonicalize(raw: &str) -> CanonicalUrl {
    let raw = raw.trim();

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return CanonicalUrl(raw.to_string()),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return CanonicalUrl(raw.to_string());
    }

    let path = canonical_path(url.path());
    CanonicalUrl(format!("{}://{}{}", url.scheme(), url.authority(), path))
}

/// Collapses the root path to `/` and strips trailing slashes elsewhere
fn canonical_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
