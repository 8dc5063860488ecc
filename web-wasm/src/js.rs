//! JsValue → 表示用文字列

use wasm_bindgen::JsValue;

pub fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
