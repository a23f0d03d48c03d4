//! Utility functions for WASM bindings to reduce boilerplate.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[macro_export]
macro_rules! js_err {
    ($msg:expr) => {
        JsValue::from_str($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        JsValue::from_str(&format!($fmt, $($arg)*))
    };
}

/// Convert to a plain JS value: maps become objects, not `Map`s.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_err!("Failed to convert to JS: {}", e))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_err!("Invalid {}: {}", what, e))
}

/// Line numbers arrive as JS numbers.
pub fn js_line(line: Option<f64>) -> Result<Option<i64>, JsValue> {
    match line {
        Some(n) if !n.is_finite() || n.fract() != 0.0 => {
            Err(js_err!("Invalid line number: {}", n))
        }
        Some(n) => Ok(Some(n as i64)),
        None => Ok(None),
    }
}

/// Report a failure that has no caller to return it to.
pub fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_2(&JsValue::from_str(context), err);
}

/// Helper for building JavaScript objects.
pub struct JsObjectBuilder {
    obj: js_sys::Object,
}

impl JsObjectBuilder {
    pub fn new() -> Self {
        Self {
            obj: js_sys::Object::new(),
        }
    }

    pub fn set(self, key: &str, value: JsValue) -> Result<Self, JsValue> {
        js_sys::Reflect::set(&self.obj, &JsValue::from_str(key), &value)
            .map_err(|e| js_err!("Failed to set property '{}': {:?}", key, e))?;
        Ok(self)
    }

    pub fn build(self) -> JsValue {
        self.obj.into()
    }
}
