//! ページ状態のドライバ（CLI版）
//!
//! 共通の `reduce` に入力を渡し、返ってきたEffect（デフォルト画像読込・解析）を
//! その場でawaitして結果を再投入する。1フローずつ順番に処理する。

use crate::analyzer::AnalysisClient;
use crate::loader;
use std::path::{Path, PathBuf};
use tracing::debug;
use tree_id_common::{
    build_identification_prompt, format_report, reduce, DisplayBlock, Effect, Error, Event,
    UiState,
};

pub struct Session<C> {
    state: UiState,
    client: C,
    prompt: String,
    default_image: PathBuf,
}

impl<C: AnalysisClient> Session<C> {
    pub fn new(client: C, default_image: impl Into<PathBuf>) -> Self {
        Self {
            state: UiState::new(),
            client,
            prompt: build_identification_prompt(),
            default_image: default_image.into(),
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 直前の操作がエラーなく終わったか
    ///
    /// 検証エラーではフェーズが変わらないため、エラー表示の有無で判定する
    pub fn succeeded(&self) -> bool {
        self.state.error().is_none()
    }

    /// 現在のレポートを整形したブロック列
    pub fn blocks(&self) -> Vec<DisplayBlock> {
        self.state.report().map(format_report).unwrap_or_default()
    }

    /// 起動時: デフォルト画像と組み込みレポートを表示
    pub async fn mount(&mut self) {
        self.dispatch(Event::Mount).await;
    }

    /// ファイル選択: 検証 → 読込 → 解析
    pub async fn select_file(&mut self, path: &Path, declared_mime: Option<&str>) {
        let event = match loader::load_file(path, declared_mime).await {
            Ok(image) => Event::FileAccepted(image),
            Err(Error::Validation(err)) => Event::FileRejected(err),
            Err(err) => Event::ReadFailed(err.to_string()),
        };
        self.dispatch(event).await;
    }

    /// 現在の画像で再識別（ファイルは読み直さない）
    pub async fn reidentify(&mut self) {
        self.dispatch(Event::Reidentify).await;
    }

    async fn dispatch(&mut self, event: Event) {
        let mut effect = reduce(&mut self.state, event);
        loop {
            let next = match effect {
                Effect::None => break,
                Effect::LoadDefault => match loader::load_default(&self.default_image).await {
                    Ok(image) => Event::DefaultLoaded(image),
                    Err(err) => Event::DefaultFailed(err.to_string()),
                },
                Effect::Analyze { ticket, image } => {
                    match self.client.analyze(&image, &self.prompt).await {
                        Ok(report) => Event::AnalysisSucceeded { ticket, report },
                        Err(err) => Event::AnalysisFailed {
                            ticket,
                            message: Some(err.to_string()),
                        },
                    }
                }
            };
            debug!(phase = self.state.phase().as_str(), "effect completed");
            effect = reduce(&mut self.state, next);
        }
    }
}
