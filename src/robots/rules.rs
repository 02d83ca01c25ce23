//! Robots.txt rule set
//!
//! Only `Disallow` directives are honoured, as plain path prefixes. User-agent
//! groups, `Allow` overrides and wildcards are not interpreted.

use url::Url;

/// Disallowed path prefixes for one site
///
/// Built once per crawl and immutable afterwards. An empty rule set allows
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    /// Disallowed path prefixes, in file order, without duplicates
    disallowed: Vec<String>,
}

impl RobotsRules {
    /// Parses raw robots.txt content
    ///
    /// Every line whose trimmed form starts with `disallow:` (any case)
    /// contributes its trimmed, non-empty value.
    pub fn from_content(content: &str) -> Self {
        let mut disallowed: Vec<String> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some((key, value)) = trimmed.split_once(':') {
                if !key.eq_ignore_ascii_case("disallow") {
                    continue;
                }

                let value = value.trim();
                if !value.is_empty() && !disallowed.iter().any(|d| d == value) {
                    disallowed.push(value.to_string());
                }
            }
        }

        Self { disallowed }
    }

    /// Creates a permissive rule set that allows everything
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the disallowed prefixes
    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    /// Returns true if no prefixes are disallowed
    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty()
    }

    /// Checks if a URL is allowed
    ///
    /// The URL's path is compared against each disallowed prefix with a plain
    /// `starts_with`.
    pub fn is_allowed(&self, url: &Url) -> bool {
        self.is_path_allowed(url.path())
    }

    /// Checks if a bare path is allowed
    pub fn is_path_allowed(&self, path: &str) -> bool {
        !self
            .disallowed
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://example.com").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_allow_all() {
        let robots = RobotsRules::allow_all();
        assert!(robots.is_allowed(&url("/any/path")));
        assert!(robots.is_allowed(&url("/admin")));
        assert!(robots.is_empty());
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = RobotsRules::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed(&url("/")));
        assert!(robots.is_allowed(&url("/page")));
        assert!(!robots.is_allowed(&url("/admin")));
        assert!(!robots.is_allowed(&url("/admin/users")));
        assert!(!robots.is_allowed(&url("/administrator")));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = RobotsRules::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed(&url("/")));
        assert!(!robots.is_allowed(&url("/page")));
    }

    #[test]
    fn test_empty_disallow_ignored() {
        let robots = RobotsRules::from_content("User-agent: *\nDisallow:\nDisallow:   \n");
        assert!(robots.is_empty());
        assert!(robots.is_allowed(&url("/anything")));
    }

    #[test]
    fn test_case_insensitive_directive() {
        let robots = RobotsRules::from_content("DISALLOW: /private\n  disallow:/tmp  \n");
        assert_eq!(robots.disallowed(), &["/private".to_string(), "/tmp".to_string()]);
    }

    #[test]
    fn test_user_agent_groups_are_flattened() {
        let content = "User-agent: BadBot\nDisallow: /bad\n\nUser-agent: *\nDisallow: /private";
        let robots = RobotsRules::from_content(content);
        assert!(!robots.is_allowed(&url("/bad")));
        assert!(!robots.is_allowed(&url("/private/x")));
    }

    #[test]
    fn test_allow_lines_are_ignored() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = RobotsRules::from_content(content);
        assert!(!robots.is_allowed(&url("/private/public")));
    }

    #[test]
    fn test_no_wildcard_support() {
        let robots = RobotsRules::from_content("Disallow: /*.pdf");
        assert!(robots.is_allowed(&url("/files/report.pdf")));
        assert!(!robots.is_path_allowed("/*.pdf"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = RobotsRules::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed(&url("/any/path")));
    }

    #[test]
    fn test_duplicate_prefixes_collapsed() {
        let robots = RobotsRules::from_content("Disallow: /a\nDisallow: /a\n");
        assert_eq!(robots.disallowed().len(), 1);
    }
}
