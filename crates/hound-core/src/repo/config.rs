//! Repository descriptors as served by `api/v1/repos`.

use serde::{Deserialize, Serialize};

/// Template used when a repository does not configure one.
pub const DEFAULT_BASE_URL: &str = "{url}/blob/master/{path}{anchor}";
/// Line anchor used when a repository does not configure one.
pub const DEFAULT_ANCHOR: &str = "#L{line}";

/// Templates for linking into a repository browser.
///
/// `base_url` understands `{url}`, `{path}`, `{rev}`, `{anchor}`,
/// `{filename}`, `{hostname}`, `{port}`, `{project}` and `{repo}`;
/// `anchor` understands `{line}` and `{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UrlPattern {
    pub base_url: String,
    pub anchor: String,
}

impl Default for UrlPattern {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            anchor: DEFAULT_ANCHOR.to_string(),
        }
    }
}

/// One configured repository. Unknown server-side keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepoConfig {
    pub url: String,
    #[serde(default)]
    pub url_pattern: UrlPattern,
}

impl RepoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            url_pattern: UrlPattern::default(),
        }
    }

    /// Replace the link templates (builder-style; consumes `self`).
    #[must_use]
    pub fn with_url_pattern(mut self, base_url: impl Into<String>, anchor: impl Into<String>) -> Self {
        self.url_pattern = UrlPattern {
            base_url: base_url.into(),
            anchor: anchor.into(),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_pattern() {
        let json = r#"{"url":"https://github.com/o/r.git","ms-between-poll":30000,"vcs":"git"}"#;
        let repo: RepoConfig = serde_json::from_str(json).unwrap();

        assert_eq!(repo.url_pattern, UrlPattern::default());
    }

    #[test]
    fn test_partial_pattern_keeps_other_default() {
        let json = r#"{"url":"u","url-pattern":{"base-url":"{url}/src/{path}"}}"#;
        let repo: RepoConfig = serde_json::from_str(json).unwrap();

        assert_eq!(repo.url_pattern.base_url, "{url}/src/{path}");
        assert_eq!(repo.url_pattern.anchor, DEFAULT_ANCHOR);
    }
}
