use url::Url;

/// Top-level labels dropped when deriving a site slug
const COMMON_TLDS: &[&str] = &[
    "com", "org", "net", "io", "dev", "app", "co", "edu", "gov", "mil",
];

/// Subdomain labels dropped when deriving a site slug
const COMMON_SUBDOMAINS: &[&str] = &["api", "docs", "www"];

/// Returns true if both URLs share the same authority (host and port)
///
/// Hosts are compared case-insensitively; the `url` crate already lowercases
/// them and drops default ports while parsing.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_scout::url::same_authority;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(same_authority(&base, &Url::parse("https://EXAMPLE.com:443/docs").unwrap()));
/// assert!(!same_authority(&base, &Url::parse("https://other.com/").unwrap()));
/// ```
pub fn same_authority(base: &Url, candidate: &Url) -> bool {
    match (base.host_str(), candidate.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b) && base.port() == candidate.port(),
        _ => false,
    }
}

/// Derives a short file-system friendly name for a site
///
/// Drops a `www.` prefix, common TLD labels and generic subdomains, and joins
/// what remains with `_`. Used as the default output name.
pub fn site_slug(raw: &str) -> String {
    let host = Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let kept: Vec<&str> = labels
        .iter()
        .copied()
        .filter(|l| !COMMON_TLDS.contains(l) && !COMMON_SUBDOMAINS.contains(l))
        .collect();

    if !kept.is_empty() {
        kept.join("_")
    } else if let Some(first) = labels.first() {
        (*first).to_string()
    } else {
        "website".to_string()
    }
}
