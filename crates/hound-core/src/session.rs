//! Search session: the page controller's single owner of repositories,
//! current results and the signals views listen on.
//!
//! The session never performs IO. Each network round trip is split into a
//! `begin_*` call that returns the request to send and a `complete_*` call
//! that takes the response body once the page has fetched it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::api::{LoadMoreRange, RepoResult, SearchResponse};
use crate::error::{Error, Result};
use crate::query::{SearchParams, SearchRequest};
use crate::repo::RepoStore;
use crate::results::{render_file, FileMatch, Pattern, RenderedFile};
use crate::signal::Signal;

/// Message shown when a response cannot be used at all.
pub const SERVER_ERROR: &str = "The server broke down";

/// Timing shown under the search bar, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchStats {
    pub server: i64,
    pub total: i64,
    pub files: i64,
}

/// Payload of `did_search`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub results: Rc<Vec<RepoResult>>,
    pub stats: Option<SearchStats>,
}

/// Payload of `did_load_more`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreDone {
    pub repo: String,
    pub results: Rc<Vec<RepoResult>>,
}

/// Everything a view can listen to.
#[derive(Debug, Default)]
pub struct Signals {
    pub will_search: Signal<SearchParams>,
    pub did_search: Signal<SearchSnapshot>,
    pub will_load_more: Signal<LoadMoreRange>,
    pub did_load_more: Signal<LoadMoreDone>,
    pub did_error: Signal<str>,
    pub did_load_repos: Signal<RepoStore>,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    repos: RepoStore,
    request: Option<SearchRequest>,
    pattern: Option<Pattern>,
    results: Rc<Vec<RepoResult>>,
    by_repo: HashMap<String, usize>,
    stats: Option<SearchStats>,
    signals: Signals,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    #[inline]
    pub fn repos(&self) -> &RepoStore {
        &self.repos
    }

    /// Install the repository list from `api/v1/repos`.
    pub fn load_repos(&mut self, json: &str) -> Result<()> {
        match RepoStore::from_json(json) {
            Ok(store) => {
                self.set_repos(store);
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub fn set_repos(&mut self, repos: RepoStore) {
        self.repos = repos;
        self.signals.did_load_repos.raise(&self.repos);
    }

    /// Start a search. Returns the request to send, or `None` when the query
    /// is empty and the results were simply cleared.
    ///
    /// The query is trimmed once; the request and the highlight pattern both
    /// use the trimmed text. A query that does not compile leaves the
    /// previous search untouched.
    pub fn begin_search(&mut self, params: SearchParams) -> Result<Option<SearchRequest>> {
        let params = SearchParams {
            q: params.q.trim().to_string(),
            ..params
        };
        self.signals.will_search.raise(&params);

        if params.q.is_empty() {
            tracing::debug!("empty query; clearing results");
            self.request = None;
            self.pattern = None;
            self.install(Vec::new(), None);
            return Ok(None);
        }

        let pattern = match Pattern::from_params(&params) {
            Ok(pattern) => pattern,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };

        let request = params.to_request();
        tracing::debug!(q = %request.q, repos = %request.repos, "search started");
        self.request = Some(request.clone());
        self.pattern = Some(pattern);
        Ok(Some(request))
    }

    /// Take the search response body. `elapsed_ms` is the round trip time
    /// measured by the page.
    pub fn complete_search(&mut self, json: &str, elapsed_ms: i64) -> Result<()> {
        let res = match SearchResponse::from_json(json) {
            Ok(res) => res,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };

        let stats = res.stats.map(|s| SearchStats {
            server: s.duration,
            total: elapsed_ms,
            files: s.files_opened,
        });
        let results = res.into_results();

        tracing::debug!(repos = results.len(), elapsed_ms, "search completed");
        self.install(results, stats);
        Ok(())
    }

    /// Start fetching the rest of `repo`'s files. Returns the request to send.
    pub fn begin_load_more(&mut self, repo: &str) -> Result<SearchRequest> {
        let request = self.request.as_ref().ok_or(Error::NoSearch)?;
        let res = self
            .result(repo)
            .ok_or_else(|| Error::UnknownRepo(repo.to_string()))?;

        let range = LoadMoreRange::for_repo(res);
        let next = request.for_repo(repo, range.rng());

        tracing::debug!(repo, rng = %next.rng, "loading more");
        self.signals.will_load_more.raise(&range);
        Ok(next)
    }

    /// Append the files returned by a "load more" request.
    pub fn complete_load_more(&mut self, repo: &str, json: &str) -> Result<()> {
        let loaded = SearchResponse::from_json(json).and_then(|mut res| {
            let more = res.results.remove(repo).flatten();
            let idx = self.by_repo.get(repo).copied();
            more.zip(idx)
                .ok_or_else(|| Error::UnknownRepo(repo.to_string()))
        });

        let (more, idx) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };

        let results = Rc::make_mut(&mut self.results);
        results[idx].matches.extend(more.matches);

        self.signals.did_load_more.raise(&LoadMoreDone {
            repo: repo.to_string(),
            results: Rc::clone(&self.results),
        });
        Ok(())
    }

    /// Report a transport failure the page observed.
    pub fn fail(&self, message: &str) {
        tracing::debug!(message, "search failed");
        self.signals.did_error.raise(message);
    }

    pub fn results(&self) -> &[RepoResult] {
        &self.results
    }

    pub fn result(&self, repo: &str) -> Option<&RepoResult> {
        self.by_repo.get(repo).and_then(|&idx| self.results.get(idx))
    }

    pub fn stats(&self) -> Option<SearchStats> {
        self.stats
    }

    /// Pattern compiled from the current query, if a search is active.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn name_for_repo(&self, repo: &str) -> String {
        self.repos.name_for_repo(repo)
    }

    /// View-model for one file of `repo`'s results.
    pub fn render_file(&self, repo: &str, file: &FileMatch) -> Result<RenderedFile> {
        let pattern = self.pattern.as_ref().ok_or(Error::NoSearch)?;
        let config = self
            .repos
            .get(repo)
            .ok_or_else(|| Error::UnknownRepo(repo.to_string()))?;
        let rev = self.result(repo).map_or("", |res| res.rev.as_str());
        Ok(render_file(config, rev, file, pattern))
    }

    /// View-models for every loaded file of `repo`.
    pub fn render_repo(&self, repo: &str) -> Result<Vec<RenderedFile>> {
        let res = self
            .result(repo)
            .ok_or_else(|| Error::UnknownRepo(repo.to_string()))?;
        res.matches
            .iter()
            .map(|file| self.render_file(repo, file))
            .collect()
    }

    fn install(&mut self, results: Vec<RepoResult>, stats: Option<SearchStats>) {
        self.by_repo = results
            .iter()
            .enumerate()
            .map(|(idx, res)| (res.repo.clone(), idx))
            .collect();
        self.results = Rc::new(results);
        self.stats = stats;

        self.signals.did_search.raise(&SearchSnapshot {
            results: Rc::clone(&self.results),
            stats,
        });
    }

    fn report(&self, err: &Error) {
        match err {
            Error::Api(message) => self.fail(message),
            Error::Json(_) => self.fail(SERVER_ERROR),
            other => self.fail(&other.to_string()),
        }
    }
}
