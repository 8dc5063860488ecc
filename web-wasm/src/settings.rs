//! APIキーの保存（localStorage）
//!
//! ビルド時に GEMINI_API_KEY があれば初期値に使う

use gloo::storage::{LocalStorage, Storage};

const API_KEY_STORAGE: &str = "tree-id.gemini-api-key";

pub fn initial_api_key() -> String {
    LocalStorage::get::<String>(API_KEY_STORAGE)
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| option_env!("GEMINI_API_KEY").map(String::from))
        .unwrap_or_default()
}

pub fn remember_api_key(api_key: &str) {
    if api_key.is_empty() {
        LocalStorage::delete(API_KEY_STORAGE);
    } else if let Err(e) = LocalStorage::set(API_KEY_STORAGE, api_key) {
        web_sys::console::warn_1(&format!("APIキー保存失敗: {}", e).into());
    }
}
