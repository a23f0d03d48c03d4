//! The search page controller, exposed to JS as `HoundSession`.
//!
//! Listeners are JS functions receiving their payload as a plain object.
//! Everything a listener needs is in the payload; calling back into the
//! session from inside a listener is rejected by the binding layer.

use crate::js_err;
use crate::utils::{from_js, log_error, to_js, JsObjectBuilder};
use hound_core::{format_number, SearchParams, SearchSession, Signal, TapId};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Signal names accepted by [`HoundSession::on`].
const EVENTS: [&str; 6] = [
    "willSearch",
    "didSearch",
    "willLoadMore",
    "didLoadMore",
    "didError",
    "didLoadRepos",
];

fn tap_js<T: Serialize + ?Sized + 'static>(signal: &Signal<T>, event: &'static str, callback: Function) -> TapId {
    signal.tap(move |payload: &T| {
        let value = match to_js(payload) {
            Ok(value) => value,
            Err(e) => return log_error(event, &e),
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &value) {
            log_error(event, &e);
        }
    })
}

#[wasm_bindgen]
pub struct HoundSession {
    inner: SearchSession,
    taps: Vec<Option<(&'static str, TapId)>>,
}

impl Default for HoundSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl HoundSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: SearchSession::new(),
            taps: Vec::new(),
        }
    }

    /// Listen to `event`. Returns a handle for [`HoundSession::off`].
    pub fn on(&mut self, event: &str, callback: Function) -> Result<u32, JsValue> {
        let signals = self.inner.signals();
        let (event, id) = match event {
            "willSearch" => ("willSearch", tap_js(&signals.will_search, "willSearch", callback)),
            "didSearch" => ("didSearch", tap_js(&signals.did_search, "didSearch", callback)),
            "willLoadMore" => (
                "willLoadMore",
                tap_js(&signals.will_load_more, "willLoadMore", callback),
            ),
            "didLoadMore" => (
                "didLoadMore",
                tap_js(&signals.did_load_more, "didLoadMore", callback),
            ),
            "didError" => ("didError", tap_js(&signals.did_error, "didError", callback)),
            "didLoadRepos" => (
                "didLoadRepos",
                tap_js(&signals.did_load_repos, "didLoadRepos", callback),
            ),
            other => {
                return Err(js_err!(
                    "Unknown event '{}', expected one of {}",
                    other,
                    EVENTS.join(", ")
                ))
            }
        };

        self.taps.push(Some((event, id)));
        Ok((self.taps.len() - 1) as u32)
    }

    /// Stop a listener. Returns false for unknown or already removed handles.
    pub fn off(&mut self, handle: u32) -> bool {
        let Some((event, id)) = self.taps.get_mut(handle as usize).and_then(Option::take) else {
            return false;
        };

        let signals = self.inner.signals();
        match event {
            "willSearch" => signals.will_search.untap(id),
            "didSearch" => signals.did_search.untap(id),
            "willLoadMore" => signals.will_load_more.untap(id),
            "didLoadMore" => signals.did_load_more.untap(id),
            "didError" => signals.did_error.untap(id),
            "didLoadRepos" => signals.did_load_repos.untap(id),
            _ => false,
        }
    }

    #[wasm_bindgen(js_name = loadRepos)]
    pub fn load_repos(&mut self, json: &str) -> Result<(), JsValue> {
        self.inner.load_repos(json).map_err(|e| js_err!("{}", e))
    }

    #[wasm_bindgen(js_name = repoNames)]
    pub fn repo_names(&self) -> Vec<String> {
        self.inner.repos().names().map(str::to_string).collect()
    }

    #[wasm_bindgen(js_name = nameForRepo)]
    pub fn name_for_repo(&self, repo: &str) -> String {
        self.inner.name_for_repo(repo)
    }

    /// Canonical params for the search bar's current state.
    pub fn normalize(&self, params: JsValue) -> Result<JsValue, JsValue> {
        let params: SearchParams = from_js(params, "search params")?;
        to_js(&params.normalized(self.inner.repos()))
    }

    /// Start a search. Resolves to the query string for `api/v1/search`, or
    /// `undefined` when the query is empty.
    #[wasm_bindgen(js_name = beginSearch)]
    pub fn begin_search(&mut self, params: JsValue) -> Result<Option<String>, JsValue> {
        let params: SearchParams = from_js(params, "search params")?;
        let request = self.inner.begin_search(params).map_err(|e| js_err!("{}", e))?;
        Ok(request.map(|req| req.to_query_string()))
    }

    #[wasm_bindgen(js_name = completeSearch)]
    pub fn complete_search(&mut self, json: &str, elapsed_ms: f64) -> Result<(), JsValue> {
        self.inner
            .complete_search(json, elapsed_ms.round() as i64)
            .map_err(|e| js_err!("{}", e))
    }

    /// Query string fetching the next files of `repo`.
    #[wasm_bindgen(js_name = beginLoadMore)]
    pub fn begin_load_more(&mut self, repo: &str) -> Result<String, JsValue> {
        self.inner
            .begin_load_more(repo)
            .map(|req| req.to_query_string())
            .map_err(|e| js_err!("{}", e))
    }

    #[wasm_bindgen(js_name = completeLoadMore)]
    pub fn complete_load_more(&mut self, repo: &str, json: &str) -> Result<(), JsValue> {
        self.inner
            .complete_load_more(repo, json)
            .map_err(|e| js_err!("{}", e))
    }

    /// Report a failed request.
    pub fn fail(&self, message: &str) {
        self.inner.fail(message);
    }

    pub fn results(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.results())
    }

    /// Stats line values, with display strings, or `null` before a search.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let Some(stats) = self.inner.stats() else {
            return Ok(JsValue::NULL);
        };

        JsObjectBuilder::new()
            .set("server", JsValue::from_f64(stats.server as f64))?
            .set("total", JsValue::from_f64(stats.total as f64))?
            .set("files", JsValue::from_f64(stats.files as f64))?
            .set("filesText", JsValue::from_str(&format_number(stats.files)))
            .map(JsObjectBuilder::build)
    }

    /// Rendered blocks for every loaded file of `repo`.
    #[wasm_bindgen(js_name = renderRepo)]
    pub fn render_repo(&self, repo: &str) -> Result<JsValue, JsValue> {
        let files = self.inner.render_repo(repo).map_err(|e| js_err!("{}", e))?;
        to_js(&files)
    }
}
