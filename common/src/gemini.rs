//! Gemini API のリクエスト/レスポンス型（CLI/WASM共通）
//!
//! 通信そのものは各プラットフォーム側で行う:
//! - CLI: reqwest
//! - Web: fetch (web-sys)

use crate::error::{Error, Result};
use crate::types::{AnalysisReport, EncodedImage};
use serde::{Deserialize, Serialize};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// エラー時のレスポンスボディ `{"error": {"code": 400, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// generateContent のURL（キーはクエリで渡す）
pub fn endpoint_url(base: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/{}:generateContent?key={}",
        base.trim_end_matches('/'),
        model,
        api_key
    )
}

/// 画像1枚 + プロンプトのリクエストを作成
pub fn build_request(image: &EncodedImage, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt.to_string() },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.4,
            response_mime_type: "text/plain".to_string(),
        },
    }
}

/// 成功レスポンスからレポート本文を取り出す
///
/// 最初の候補のテキストパートを連結する。空ならエラー。
pub fn parse_response(response: &GeminiResponse) -> Result<AnalysisReport> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    let report = AnalysisReport::new(text);
    if report.is_blank() {
        return Err(Error::Analysis("Empty response".into()));
    }
    Ok(report)
}

/// レスポンスボディ文字列からレポートを取り出す
pub fn parse_response_body(body: &str) -> Result<AnalysisReport> {
    let response: GeminiResponse = serde_json::from_str(body)?;
    parse_response(&response)
}

/// 失敗レスポンスの表示用メッセージ
///
/// サービスのエラーメッセージがあればそれを使う
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API error: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://example.com/v1beta/models/", "gemini-2.0-flash", "KEY"),
            "https://example.com/v1beta/models/gemini-2.0-flash:generateContent?key=KEY"
        );
    }

    #[test]
    fn test_build_request_serialize() {
        let image = EncodedImage::from_bytes("image/png", b"png");
        let request = build_request(&image, "テストプロンプト");

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"contents\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"text/plain\""));
        assert!(json.contains(r#"{"text":"テストプロンプト"}"#));
        assert!(json.contains(r#""inline_data":{"mime_type":"image/png","data":"cG5n"}"#));
    }

    #[test]
    fn test_prompt_precedes_image() {
        let image = EncodedImage::from_bytes("image/jpeg", b"x");
        let request = build_request(&image, "prompt");
        let parts = &request.contents[0].parts;
        assert!(matches!(parts[0], Part::Text { .. }));
        assert!(matches!(parts[1], Part::InlineData { .. }));
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "1. Species Identification:\n"},
                        {"text": "- Common name: Red oak"}
                    ]
                }
            }]
        }"#;
        let report = parse_response_body(body).expect("パース失敗");
        assert_eq!(report.as_str(), "1. Species Identification:\n- Common name: Red oak");
    }

    #[test]
    fn test_parse_response_empty() {
        for body in [
            r#"{"candidates": []}"#,
            r#"{}"#,
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
        ] {
            let err = parse_response_body(body).unwrap_err();
            assert!(matches!(err, Error::Analysis(ref m) if m == "Empty response"), "{}", body);
        }
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = parse_response_body("<html>").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_message_from_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(400, body), "API key not valid.");
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(503, "Service Unavailable"), "API error: 503");
        assert_eq!(error_message(500, r#"{"error": {"code": 500}}"#), "API error: 500");
    }
}
