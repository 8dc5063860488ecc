//! Gemini API連携（reqwest）
//!
//! リクエスト/レスポンス型は tree_id_common::gemini を使用

use super::AnalysisClient;
use crate::config::Config;
use crate::error::Result as CliResult;
use std::time::Duration;
use tracing::{debug, warn};
use tree_id_common::gemini::{build_request, endpoint_url, error_message, parse_response_body};
use tree_id_common::{AnalysisReport, EncodedImage, Error, Result};

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> CliResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, endpoint, model, api_key))
    }

    /// 構築済みのreqwestクライアントを使う
    pub fn with_http_client(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// 設定から作成（APIキー未設定ならエラー）
    pub fn from_config(config: &Config) -> CliResult<Self> {
        let api_key = config.get_api_key()?;
        Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AnalysisClient for GeminiClient {
    async fn analyze(&self, image: &EncodedImage, prompt: &str) -> Result<AnalysisReport> {
        let url = endpoint_url(&self.endpoint, &self.model, &self.api_key);
        let request = build_request(image, prompt);

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            image_bytes = image.decoded_len(),
            "sending analysis request"
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Analysis(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Analysis(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "analysis service returned an error");
            return Err(Error::Analysis(error_message(status.as_u16(), &body)));
        }

        debug!(response_chars = body.len(), "analysis response received");
        parse_response_body(&body).map_err(|e| match e {
            Error::Json(e) => Error::Analysis(format!("Invalid response: {}", e)),
            other => other,
        })
    }
}
