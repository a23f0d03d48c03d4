use crate::globals::cached_pattern;
use crate::js_err;
use crate::utils::{from_js, to_js};
use hound_core::{coalesce, content_for as highlight_line, LineRecord, MatchRecord};
use wasm_bindgen::prelude::*;

/// Coalesce one file's `Matches` array into blocks of lines.
#[wasm_bindgen]
pub fn coalesce_matches(matches: JsValue) -> Result<JsValue, JsValue> {
    let matches: Vec<MatchRecord> = from_js(matches, "matches")?;
    to_js(&coalesce(&matches))
}

/// Escaped HTML for one line with `<em>` around occurrences of `regexp`.
///
/// Rendering a whole repository at once is cheaper through
/// `HoundSession.renderRepo`.
#[wasm_bindgen]
pub fn content_for(line: JsValue, regexp: &str, ignore_case: bool) -> Result<String, JsValue> {
    let line: LineRecord = from_js(line, "line")?;
    let pattern = cached_pattern(regexp, ignore_case).map_err(|e| js_err!("{}", e))?;
    Ok(highlight_line(&line, &pattern))
}
