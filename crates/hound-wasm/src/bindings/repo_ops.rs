/*!
 * Repository bindings for pages without a search session.
 *
 * `set_repos` must be called with the `api/v1/repos` payload before links
 * can be built.
 */

use crate::globals::{self, with_repos};
use crate::js_err;
use crate::utils::{js_line, to_js};
use hound_core::{excluded_rows as build_rows, ExcludedFile, RepoStore, UrlParts};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_repos(json: &str) -> Result<(), JsValue> {
    let store = RepoStore::from_json(json).map_err(|e| js_err!("Invalid repos: {}", e))?;
    globals::set_repos(store);
    Ok(())
}

/// Sorted repository names.
#[wasm_bindgen]
pub fn repo_names() -> Vec<String> {
    with_repos(|repos| repos.names().map(str::to_string).collect())
}

#[wasm_bindgen]
pub fn name_for_repo(repo: &str) -> String {
    with_repos(|repos| repos.name_for_repo(repo))
}

#[wasm_bindgen]
pub fn url_to_repo(repo: &str, path: &str, line: Option<f64>, rev: &str) -> Result<String, JsValue> {
    let line = js_line(line)?;
    with_repos(|repos| repos.url_to_repo(repo, path, line, rev))
        .map_err(|e| js_err!("{}", e))
}

/// The template variables a link for `path` expands with.
#[wasm_bindgen]
pub fn url_parts(repo: &str, path: &str, line: Option<f64>, rev: &str) -> Result<JsValue, JsValue> {
    let line = js_line(line)?;
    let parts = with_repos(|repos| {
        repos
            .get(repo)
            .map(|config| UrlParts::resolve(config, path, line, rev))
    })
    .ok_or_else(|| js_err!("unknown repository: {}", repo))?;
    to_js(&parts)
}

/// Rows for the excluded files table from the `api/v1/excludes` payload.
#[wasm_bindgen]
pub fn excluded_rows(repo: &str, rev: &str, json: &str) -> Result<JsValue, JsValue> {
    let files = ExcludedFile::list_from_json(json)
        .map_err(|e| js_err!("Invalid excludes for {}: {}", repo, e))?;
    let rows = with_repos(|repos| repos.get(repo).map(|config| build_rows(config, rev, &files)))
        .ok_or_else(|| js_err!("unknown repository: {}", repo))?;
    to_js(&rows)
}
