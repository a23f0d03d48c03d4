//! Shapes of the search API responses and the pagination arithmetic for
//! "load more".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::results::FileMatch;

/// Most files fetched by a single "load more" request.
pub const MAX_LOAD_MORE: usize = 2000;

/// Body of `api/v1/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: HashMap<String, Option<RepoResults>>,
    #[serde(default)]
    pub stats: Option<Stats>,
    /// Set instead of results when the server rejects the search.
    #[serde(default)]
    pub error: Option<String>,
}

/// Matches for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoResults {
    #[serde(default)]
    pub revision: String,
    #[serde(default, deserialize_with = "nullable_files")]
    pub matches: Vec<FileMatch>,
    #[serde(default)]
    pub files_with_match: usize,
}

fn nullable_files<'de, D>(deserializer: D) -> std::result::Result<Vec<FileMatch>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<FileMatch>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Server-side timing, present when the request asked for stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stats {
    pub files_opened: i64,
    /// Milliseconds spent searching on the server.
    pub duration: i64,
}

impl SearchResponse {
    /// Parse a response body, turning a server-reported error into
    /// `Error::Api`.
    pub fn from_json(json: &str) -> Result<Self> {
        let res: Self = serde_json::from_str(json)?;
        match res.error {
            Some(message) => Err(Error::Api(message)),
            None => Ok(res),
        }
    }

    /// Flatten into per-repository results, most matching files first and
    /// ties broken by repository name. Repositories reported as `null` are
    /// dropped.
    pub fn into_results(self) -> Vec<RepoResult> {
        let mut results: Vec<RepoResult> = self
            .results
            .into_iter()
            .filter_map(|(repo, res)| res.map(|res| RepoResult::new(repo, res)))
            .collect();

        results.sort_by(|a, b| {
            b.matches
                .len()
                .cmp(&a.matches.len())
                .then_with(|| a.repo.cmp(&b.repo))
        });

        results
    }
}

/// Results for one repository as tracked by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoResult {
    pub repo: String,
    pub rev: String,
    pub matches: Vec<FileMatch>,
    pub files_with_match: usize,
}

impl RepoResult {
    pub fn new(repo: String, res: RepoResults) -> Self {
        Self {
            repo,
            rev: res.revision,
            matches: res.matches,
            files_with_match: res.files_with_match,
        }
    }

    /// Matching files not fetched yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.files_with_match.saturating_sub(self.matches.len())
    }

    #[inline]
    pub fn has_more(&self) -> bool {
        self.remaining() > 0
    }
}

/// File window for the next "load more" request of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreRange {
    pub repo: String,
    /// Files already loaded; the next request starts here.
    pub loaded: usize,
    /// Files still on the server.
    pub needed: usize,
    /// Files this request will fetch.
    pub to_load: usize,
}

impl LoadMoreRange {
    pub fn for_repo(res: &RepoResult) -> Self {
        let loaded = res.matches.len();
        let needed = res.remaining();
        Self {
            repo: res.repo.clone(),
            loaded,
            needed,
            to_load: needed.min(MAX_LOAD_MORE),
        }
    }

    /// The `rng` parameter: `offset:limit`, with an open end when this
    /// request fetches everything that is left.
    pub fn rng(&self) -> String {
        if self.to_load == self.needed {
            format!("{}:", self.loaded)
        } else {
            format!("{}:{}", self.loaded, self.to_load)
        }
    }
}

/// Parse an `offset:limit` range the way the server does: no `:` gives
/// `(0, 0)` and an unparsable half reads as 0.
pub fn parse_range(rng: &str) -> (usize, usize) {
    let Some((begin, end)) = rng.split_once(':') else {
        return (0, 0);
    };
    (begin.parse().unwrap_or(0), end.parse().unwrap_or(0))
}

/// A file the indexer skipped, from `api/v1/excludes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExcludedFile {
    pub filename: String,
    pub reason: String,
}

impl ExcludedFile {
    /// Parse the excludes payload; `null` means nothing was excluded.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let files: Option<Vec<Self>> = serde_json::from_str(json)?;
        Ok(files.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"{
        "Results": {
            "beta": {
                "Revision": "b1",
                "FilesWithMatch": 2,
                "Matches": [
                    {"Filename": "a.go", "Matches": [{"Line": "x", "LineNumber": 3, "Before": null, "After": null}]},
                    {"Filename": "b.go", "Matches": [{"Line": "x", "LineNumber": 9, "Before": ["w"], "After": []}]}
                ]
            },
            "alpha": {
                "Revision": "a1",
                "FilesWithMatch": 40,
                "Matches": [
                    {"Filename": "c.go", "Matches": [{"Line": "x", "LineNumber": 1}]},
                    {"Filename": "d.go", "Matches": [{"Line": "x", "LineNumber": 1}]}
                ]
            },
            "gamma": {"Revision": "g1", "FilesWithMatch": 5000, "Matches": [
                {"Filename": "e.go", "Matches": [{"Line": "x", "LineNumber": 1}]}
            ]},
            "empty": null
        },
        "Stats": {"FilesOpened": 12, "Duration": 34}
    }"#;

    #[test]
    fn test_results_sorted_by_count_then_name() {
        let res = SearchResponse::from_json(RESPONSE).unwrap();
        assert_eq!(res.stats, Some(Stats { files_opened: 12, duration: 34 }));

        let results = res.into_results();
        let repos: Vec<&str> = results.iter().map(|r| r.repo.as_str()).collect();

        assert_eq!(repos, vec!["alpha", "beta", "gamma"]);
        assert_eq!(results[1].rev, "b1");
        assert_eq!(results[1].matches[1].matches[0].before, vec!["w"]);
        assert!(!results[1].has_more());
    }

    #[test]
    fn test_server_error() {
        let err = SearchResponse::from_json(r#"{"Error":"error parsing regexp"}"#).unwrap_err();
        assert!(matches!(err, Error::Api(msg) if msg == "error parsing regexp"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            SearchResponse::from_json("<html>"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_load_more_range() {
        let results = SearchResponse::from_json(RESPONSE).unwrap().into_results();

        let alpha = LoadMoreRange::for_repo(&results[0]);
        assert_eq!((alpha.loaded, alpha.needed, alpha.to_load), (2, 38, 38));
        assert_eq!(alpha.rng(), "2:");

        let gamma = LoadMoreRange::for_repo(&results[2]);
        assert_eq!((gamma.loaded, gamma.needed, gamma.to_load), (1, 4999, 2000));
        assert_eq!(gamma.rng(), "1:2000");
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(":20"), (0, 20));
        assert_eq!(parse_range("20:"), (20, 0));
        assert_eq!(parse_range("5:x"), (5, 0));
        assert_eq!(parse_range("nope"), (0, 0));
    }

    #[test]
    fn test_excluded_files() {
        let files = ExcludedFile::list_from_json(
            r#"[{"Filename":"big.bin","Reason":"Binary file"}]"#,
        )
        .unwrap();
        assert_eq!(files[0].reason, "Binary file");
        assert!(ExcludedFile::list_from_json("null").unwrap().is_empty());
    }
}
