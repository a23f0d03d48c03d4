//! The set of repositories the server indexes, loaded once per page session.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::repo::config::RepoConfig;
use crate::repo::url::url_to_repo;

/// Repository descriptors keyed by repository name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RepoStore {
    repos: BTreeMap<String, RepoConfig>,
}

impl RepoStore {
    /// Parse the `api/v1/repos` payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(json)?;
        tracing::debug!(repos = store.len(), "loaded repositories");
        Ok(store)
    }

    pub fn insert(&mut self, name: impl Into<String>, repo: RepoConfig) {
        self.repos.insert(name.into(), repo);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&RepoConfig> {
        self.repos.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.repos.contains_key(name)
    }

    /// Number of known repositories.
    #[inline]
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Repository names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(String::as_str)
    }

    /// Keep only known repositories, dropping duplicates but preserving order.
    pub fn valid_repos<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| self.contains(name) && seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// True when `names` selects every known repository.
    pub fn selects_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.valid_repos(names).len() == self.len()
    }

    /// Human-friendly name derived from the repository url: `org / repo`
    /// when the url has two trailing path segments, the bare repo name when
    /// it has one, and the identifier itself otherwise.
    pub fn name_for_repo(&self, name: &str) -> String {
        let Some(repo) = self.get(name) else {
            return name.to_string();
        };

        let url = repo.url.as_str();
        let Some(ax) = url.rfind('/') else {
            return name.to_string();
        };

        let last = &url[ax + 1..];
        let last = last.strip_suffix(".git").unwrap_or(last);

        match url[..ax].rfind('/') {
            Some(bx) => format!("{} / {}", &url[bx + 1..ax], last),
            None => last.to_string(),
        }
    }

    /// Link into the browser of the named repository.
    pub fn url_to_repo(&self, name: &str, path: &str, line: Option<i64>, rev: &str) -> Result<String> {
        let repo = self
            .get(name)
            .ok_or_else(|| Error::UnknownRepo(name.to_string()))?;
        Ok(url_to_repo(repo, path, line, rev))
    }
}

impl FromIterator<(String, RepoConfig)> for RepoStore {
    fn from_iter<T: IntoIterator<Item = (String, RepoConfig)>>(iter: T) -> Self {
        Self {
            repos: iter.into_iter().collect(),
        }
    }
}
