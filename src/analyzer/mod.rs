//! 画像解析クライアント
//!
//! 画像と固定プロンプトを外部サービスへ送り、テキストを受け取る。
//! リトライはしない（失敗したらユーザーが再識別する）。

mod gemini;

pub use gemini::GeminiClient;

use tree_id_common::{AnalysisReport, EncodedImage, Error, Result};

/// 解析サービスとの境界
///
/// 失敗は `Error::Analysis`（表示用メッセージ付き）で返す
#[allow(async_fn_in_trait)]
pub trait AnalysisClient {
    async fn analyze(&self, image: &EncodedImage, prompt: &str) -> Result<AnalysisReport>;
}

/// APIキーなしで使うクライアント（解析要求は常に失敗する）
pub struct Offline;

impl AnalysisClient for Offline {
    async fn analyze(&self, _image: &EncodedImage, _prompt: &str) -> Result<AnalysisReport> {
        Err(Error::Analysis(
            "Analysis is unavailable: no API key configured".to_string(),
        ))
    }
}
