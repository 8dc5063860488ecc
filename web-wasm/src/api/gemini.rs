//! Gemini API連携（fetch）
//!
//! リクエスト/レスポンス型は tree_id_common::gemini を使用

use crate::js::js_message;
use tree_id_common::gemini::{
    build_request, endpoint_url, error_message, parse_response_body, DEFAULT_MODEL,
    GEMINI_API_BASE,
};
use tree_id_common::{AnalysisReport, EncodedImage, Error, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub const MISSING_KEY_MESSAGE: &str = "Please enter your Gemini API key first.";

fn analysis_error(value: JsValue) -> Error {
    Error::Analysis(js_message(&value))
}

/// 画像とプロンプトを送り、レポート本文を返す
pub async fn analyze(api_key: &str, image: &EncodedImage, prompt: &str) -> Result<AnalysisReport> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(Error::Analysis(MISSING_KEY_MESSAGE.into()));
    }

    let url = endpoint_url(GEMINI_API_BASE, DEFAULT_MODEL, api_key);
    let body = serde_json::to_string(&build_request(image, prompt))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&url, &opts).map_err(analysis_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(analysis_error)?;

    let window = web_sys::window().ok_or_else(|| Error::Analysis("window not available".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(analysis_error)?;
    let resp: Response = resp_value.dyn_into().map_err(analysis_error)?;

    let text = JsFuture::from(resp.text().map_err(analysis_error)?)
        .await
        .map_err(analysis_error)?
        .as_string()
        .unwrap_or_default();

    if !resp.ok() {
        return Err(Error::Analysis(error_message(resp.status(), &text)));
    }

    parse_response_body(&text).map_err(|e| match e {
        Error::Json(e) => Error::Analysis(format!("Invalid response: {}", e)),
        other => other,
    })
}
