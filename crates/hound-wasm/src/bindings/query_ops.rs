use crate::js_err;
use crate::utils::{from_js, to_js};
use hound_core::{format_number as format_i64, search_url_for_selection as selection_url, SearchParams};
use wasm_bindgen::prelude::*;

/// Page parameters from `location.search`, over the page defaults.
#[wasm_bindgen]
pub fn params_from_query_string(query_string: &str) -> Result<JsValue, JsValue> {
    to_js(&SearchParams::from_query_string(query_string))
}

/// History entry for `params`, including the leading `?`.
#[wasm_bindgen]
pub fn params_to_query_string(params: JsValue) -> Result<String, JsValue> {
    let params: SearchParams = from_js(params, "search params")?;
    Ok(params.to_query_string())
}

/// Page url searching for the selected text, or `undefined` when the
/// selection is empty or spans lines.
#[wasm_bindgen]
pub fn search_url_for_selection(page_url: &str, text: &str) -> Option<String> {
    selection_url(page_url, text)
}

#[wasm_bindgen]
pub fn format_number(n: f64) -> Result<String, JsValue> {
    if !n.is_finite() {
        return Err(js_err!("Cannot format {}", n));
    }
    Ok(format_i64(n.trunc() as i64))
}
