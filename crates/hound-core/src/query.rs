//! Page query-string codec and the search request built from it.
//!
//! The page url carries `q` (query regex), `i` (`fosho`/`nope` ignore-case),
//! `files` (path filter regex) and `repos` (comma-joined names, `*` = all).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::repo::RepoStore;
use crate::results::escape_regexp;

/// Files per repository in the first page of results.
pub const DEFAULT_RANGE: &str = ":20";

/// Parameters as they appear in the page url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: String,
    pub i: String,
    pub files: String,
    pub repos: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            i: "nope".to_string(),
            files: String::new(),
            repos: "*".to_string(),
        }
    }
}

impl SearchParams {
    /// Parse a page query string over the page defaults.
    pub fn from_query_string(qs: &str) -> Self {
        params_from_query_string(qs, Self::default())
    }

    #[inline]
    pub fn ignore_case(&self) -> bool {
        param_value_to_bool(&self.i)
    }

    /// Set a known parameter. Returns false for keys this page ignores.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "q" => &mut self.q,
            "i" => &mut self.i,
            "files" => &mut self.files,
            "repos" => &mut self.repos,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Selected repository names; empty means no explicit selection.
    pub fn repo_list(&self) -> Vec<&str> {
        if self.repos.is_empty() {
            return Vec::new();
        }
        self.repos.split(',').collect()
    }

    /// Canonical form submitted by the search bar: trimmed text fields,
    /// unknown repositories dropped, and "every repository" written as an
    /// empty selection.
    pub fn normalized(&self, store: &RepoStore) -> Self {
        let selected = self.repo_list();
        let mut repos = store.valid_repos(selected.as_slice());
        if repos.len() == store.len() {
            repos.clear();
        }

        Self {
            q: self.q.trim().to_string(),
            i: if self.ignore_case() { "fosho" } else { "nope" }.to_string(),
            files: self.files.trim().to_string(),
            repos: repos.join(","),
        }
    }

    /// Query string for the page history entry, including the leading `?`.
    ///
    /// `repos` is written as-is so that separators stay readable.
    pub fn to_query_string(&self) -> String {
        format!(
            "?q={}&i={}&files={}&repos={}",
            urlencoding::encode(&self.q),
            urlencoding::encode(&self.i),
            urlencoding::encode(&self.files),
            self.repos
        )
    }

    /// Parameters for `api/v1/search`, with the request defaults applied.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            q: self.q.clone(),
            i: self.i.clone(),
            files: self.files.clone(),
            repos: if self.repos.is_empty() {
                "*".to_string()
            } else {
                self.repos.clone()
            },
            stats: "fosho".to_string(),
            rng: DEFAULT_RANGE.to_string(),
        }
    }
}

/// Parameters sent to `api/v1/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub q: String,
    pub i: String,
    pub files: String,
    pub repos: String,
    pub stats: String,
    /// `offset:limit` window over each repository's matching files.
    pub rng: String,
}

impl SearchRequest {
    /// Narrow the request to one repository and a different file window.
    #[must_use]
    pub fn for_repo(&self, repo: &str, rng: String) -> Self {
        Self {
            repos: repo.to_string(),
            rng,
            ..self.clone()
        }
    }

    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("q", self.q.as_str()),
            ("i", self.i.as_str()),
            ("files", self.files.as_str()),
            ("repos", self.repos.as_str()),
            ("stats", self.stats.as_str()),
            ("rng", self.rng.as_str()),
        ]
    }

    /// Form-encoded body/query for the request, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Parse `?k=v&...` into `params`, overriding only the keys present.
///
/// Pairs without exactly one `=` are skipped, `+` in values means a space,
/// and pairs that do not decode to UTF-8 are skipped.
pub fn params_from_query_string(qs: &str, mut params: SearchParams) -> SearchParams {
    let qs = qs.strip_prefix('?').unwrap_or(qs);
    if qs.is_empty() {
        return params;
    }

    for pair in qs.split('&') {
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };

        let value = value.replace('+', " ");
        let (Ok(key), Ok(value)) = (urlencoding::decode(key), urlencoding::decode(&value)) else {
            tracing::debug!(pair, "skipping undecodable query pair");
            continue;
        };

        if !params.set(&key, value.into_owned()) {
            tracing::trace!(key = %key, "ignoring unknown query parameter");
        }
    }

    params
}

/// The first non-empty `q=` parameter of a page url.
static QUERY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&])q=([^&$]+)").expect("valid query param regex"));

/// Page url searching literally for `text`, a selection inside a result line.
///
/// The selection is trimmed and rejected when empty or when it spans lines.
/// The escaped text replaces the first `q=` value of `page_url`; a url
/// without one is returned unchanged.
pub fn search_url_for_selection(page_url: &str, text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text.contains(|c: char| c == '\r' || c == '\n') {
        return None;
    }

    let query = urlencoding::encode(&escape_regexp(text)).into_owned();
    let url = QUERY_PARAM.replacen(page_url, 1, |caps: &Captures| {
        format!("{}q={}", &caps[1], query)
    });
    Some(url.into_owned())
}

/// Truthy flag values used by the page and the server: `fosho`, `true`, `1`.
pub fn param_value_to_bool(v: &str) -> bool {
    let v = v.to_lowercase();
    v == "fosho" || v == "true" || v == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::RepoConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_query() {
        assert_eq!(SearchParams::from_query_string(""), SearchParams::default());
        assert_eq!(SearchParams::from_query_string("?"), SearchParams::default());
    }

    #[test]
    fn test_parse_full_query() {
        let params =
            SearchParams::from_query_string("?q=func%20main&i=fosho&files=%5C.go%24&repos=a,b");

        assert_eq!(params.q, "func main");
        assert_eq!(params.i, "fosho");
        assert_eq!(params.files, r"\.go$");
        assert_eq!(params.repo_list(), vec!["a", "b"]);
        assert!(params.ignore_case());
    }

    #[test]
    fn test_plus_is_space_in_values() {
        let params = SearchParams::from_query_string("?q=hello+world+%2B1");
        assert_eq!(params.q, "hello world +1");
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let params = SearchParams::from_query_string("?q&files=a=b&repos=x&q=%FF&i=true");

        assert_eq!(params.q, "");
        assert_eq!(params.files, "");
        assert_eq!(params.repos, "x");
        assert_eq!(params.i, "true");
    }

    #[test]
    fn test_round_trip_through_history() {
        let params = SearchParams {
            q: "a&b = c?".to_string(),
            i: "nope".to_string(),
            files: "src/.*\\.rs".to_string(),
            repos: "one,two".to_string(),
        };

        let qs = params.to_query_string();

        assert!(qs.starts_with("?q=a%26b%20%3D%20c%3F&i=nope"));
        assert!(qs.ends_with("&repos=one,two"));
        assert_eq!(SearchParams::from_query_string(&qs), params);
    }

    #[test]
    fn test_param_value_to_bool() {
        for v in ["fosho", "FOSHO", "true", "True", "1"] {
            assert!(param_value_to_bool(v), "{v}");
        }
        for v in ["nope", "false", "0", "", "yes"] {
            assert!(!param_value_to_bool(v), "{v}");
        }
    }

    #[test]
    fn test_normalized_collapses_full_selection() {
        let store: RepoStore = [
            ("a".to_string(), RepoConfig::new("https://h/o/a")),
            ("b".to_string(), RepoConfig::new("https://h/o/b")),
        ]
        .into_iter()
        .collect();

        let all = SearchParams {
            q: "  x ".to_string(),
            repos: "b,a,zzz".to_string(),
            ..SearchParams::default()
        }
        .normalized(&store);
        assert_eq!(all.q, "x");
        assert_eq!(all.repos, "");

        let some = SearchParams {
            repos: "b,zzz,b".to_string(),
            i: "TRUE".to_string(),
            ..SearchParams::default()
        }
        .normalized(&store);
        assert_eq!(some.repos, "b");
        assert_eq!(some.i, "fosho");

        let star = SearchParams::default().normalized(&store);
        assert_eq!(star.repos, "");
    }

    #[test]
    fn test_search_url_for_selection() {
        let page = "https://hound.example.com/?q=old&i=nope&files=&repos=";

        assert_eq!(
            search_url_for_selection(page, "  a.b(c) ").as_deref(),
            Some("https://hound.example.com/?q=a%5C.b%5C%28c%5C%29&i=nope&files=&repos=")
        );
        assert_eq!(search_url_for_selection(page, "   "), None);
        assert_eq!(search_url_for_selection(page, "one\ntwo"), None);
        assert_eq!(search_url_for_selection(page, "x\r\ny"), None);
    }

    #[test]
    fn test_selection_without_query_param() {
        let page = "https://hound.example.com/?i=nope";
        assert_eq!(search_url_for_selection(page, "foo").as_deref(), Some(page));

        // Only the first non-empty q= is replaced.
        let page = "https://h/?q=&x=1&q=old";
        assert_eq!(
            search_url_for_selection(page, "new").as_deref(),
            Some("https://h/?q=&x=1&q=new")
        );
    }

    #[test]
    fn test_request_defaults() {
        let params = SearchParams {
            q: "x".to_string(),
            repos: String::new(),
            ..SearchParams::default()
        };

        let req = params.to_request();

        assert_eq!(req.repos, "*");
        assert_eq!(req.stats, "fosho");
        assert_eq!(req.rng, ":20");
        assert_eq!(
            req.to_query_string(),
            "q=x&i=nope&files=&repos=%2A&stats=fosho&rng=%3A20"
        );

        let more = req.for_repo("a", "20:".to_string());
        assert_eq!((more.repos.as_str(), more.rng.as_str()), ("a", "20:"));
        assert_eq!(more.q, "x");
    }
}
