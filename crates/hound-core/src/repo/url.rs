//! Build browser links for files and lines from a repository's url and its
//! link templates.
//!
//! Clone urls come in several shapes (`https://`, `git@host:org/repo`,
//! `ssh://user@host[:port]/org/repo`, GitHub `.wiki` repos). They are first
//! rewritten to something a browser can open, then split into the parts the
//! templates may reference.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::repo::config::RepoConfig;

/// `ssh://[user@]host:port/rest`
static SSH_WITH_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ssh://(?:[^@/]+@)?([^:/]+):(\d+)/(.*)$").expect("valid ssh-with-port regex")
});

/// `git@host:rest`, `hg@host/rest` and the same behind `ssh://`.
static SSH_USER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:git|hg)@(.*?)(?::|/)(.*)").expect("valid ssh-user regex"));

/// `[scheme:]//host[:port]/rest`
static WEB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:[A-Za-z][A-Za-z0-9+.-]*:)?//[^/:]+)(?::(\d+))?/(.*)$")
        .expect("valid web url regex")
});

/// Replace the first `{name}` of each listed variable. Placeholders without
/// a value are left as they are.
pub fn expand_vars(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        let placeholder = format!("{{{name}}}");
        if out.contains(&placeholder) {
            out = out.replacen(&placeholder, value, 1);
        }
    }
    out
}

/// Everything a link template can reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct UrlParts {
    /// Browsable repository url (`.git` stripped, ssh rewritten).
    pub url: String,
    pub path: String,
    pub rev: String,
    /// Expanded line anchor; empty without a line or for wikis.
    pub anchor: String,
    /// Last path component of `path`.
    pub filename: String,
    /// Scheme (or `//`) plus host, without port.
    pub hostname: String,
    pub port: String,
    /// First path segment of the repository url.
    pub project: String,
    /// Remaining path of the repository url.
    pub repo: String,
}

impl UrlParts {
    pub fn resolve(repo: &RepoConfig, path: &str, line: Option<i64>, rev: &str) -> Self {
        let pattern = &repo.url_pattern;
        let mut url = repo.url.strip_suffix(".git").unwrap_or(&repo.url).to_string();
        let mut path = path.to_string();
        let filename = path.rsplit('/').next().unwrap_or_default().to_string();

        // Line 0 is not a line.
        let mut anchor = match line.filter(|&line| line != 0) {
            Some(line) => {
                let line = line.to_string();
                expand_vars(
                    &pattern.anchor,
                    &[("line", line.as_str()), ("filename", filename.as_str())],
                )
            }
            None => String::new(),
        };

        // Wikis cannot link to a line.
        if url.ends_with(".wiki") {
            url.truncate(url.len() - ".wiki".len());
            url.push_str("/wiki");
            if path.ends_with(".md") {
                path.truncate(path.len() - ".md".len());
            }
            anchor.clear();
        }

        let rewritten = match SSH_WITH_PORT.captures(&url) {
            Some(caps) => Some(format!("//{}:{}/{}", &caps[1], &caps[2], &caps[3])),
            None => SSH_USER
                .captures(&url)
                .map(|caps| format!("//{}/{}", &caps[1], &caps[2])),
        };
        if let Some(rewritten) = rewritten {
            url = rewritten;
        }

        let mut parts = UrlParts {
            path,
            rev: rev.to_string(),
            anchor,
            filename,
            ..UrlParts::default()
        };

        if let Some(caps) = WEB_URL.captures(&url) {
            parts.hostname = caps[1].to_string();
            parts.port = caps.get(2).map_or("", |m| m.as_str()).to_string();
            let rest = &caps[3];
            match rest.split_once('/') {
                Some((project, name)) => {
                    parts.project = project.to_string();
                    parts.repo = name.to_string();
                }
                None => parts.repo = rest.to_string(),
            }
        }

        parts.url = url;
        parts
    }

    /// Template variables in substitution order.
    pub fn vars(&self) -> [(&'static str, &str); 9] {
        [
            ("url", self.url.as_str()),
            ("path", self.path.as_str()),
            ("rev", self.rev.as_str()),
            ("anchor", self.anchor.as_str()),
            ("filename", self.filename.as_str()),
            ("hostname", self.hostname.as_str()),
            ("port", self.port.as_str()),
            ("project", self.project.as_str()),
            ("repo", self.repo.as_str()),
        ]
    }
}

/// Link to `path` (and optionally `line`) at `rev` in the repository browser.
pub fn url_to_repo(repo: &RepoConfig, path: &str, line: Option<i64>, rev: &str) -> String {
    let parts = UrlParts::resolve(repo, path, line, rev);
    expand_vars(&repo.url_pattern.base_url, &parts.vars())
}
