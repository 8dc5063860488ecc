//! ページ状態と遷移（CLI/WASM共通）
//!
//! 状態は `UiState` 1つにまとめ、`reduce` だけが書き換える。
//! 非同期処理は `Effect` として返し、呼び出し側（CLIのSession、WebのApp）が実行して
//! 結果を再び `Event` として渡す。
//!
//! 解析要求ごとに単調増加のチケットを振り、最新以外の応答は捨てる。

use crate::error::ValidationError;
use crate::prompts::DEFAULT_REPORT;
use crate::types::{AnalysisReport, EncodedImage};
use tracing::{debug, info, warn};

/// 解析エラーにメッセージがない場合の表示
pub const GENERIC_ANALYSIS_ERROR: &str = "Failed to analyze image. Please try again.";

/// 解析要求の識別子
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// ページのフェーズ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        }
    }
}

/// 画面状態
#[derive(Debug, Clone, Default)]
pub struct UiState {
    image: Option<EncodedImage>,
    report: Option<AnalysisReport>,
    phase: Phase,
    error: Option<String>,
    latest: Ticket,
}

/// 入力イベント
#[derive(Debug, Clone)]
pub enum Event {
    /// ページ表示
    Mount,
    DefaultLoaded(EncodedImage),
    DefaultFailed(String),
    /// ファイル選択時の検証失敗
    FileRejected(ValidationError),
    /// 検証・読込済みの新しい画像
    FileAccepted(EncodedImage),
    /// 検証は通ったが読込に失敗
    ReadFailed(String),
    /// 現在の画像で再識別
    Reidentify,
    AnalysisSucceeded { ticket: Ticket, report: AnalysisReport },
    AnalysisFailed { ticket: Ticket, message: Option<String> },
}

/// 呼び出し側に依頼する処理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    LoadDefault,
    Analyze { ticket: Ticket, image: EncodedImage },
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// 最後に発行したチケット
    pub fn latest_ticket(&self) -> Ticket {
        self.latest
    }

    /// 再識別ボタンを押せるか
    pub fn can_reidentify(&self) -> bool {
        self.image.is_some() && !self.is_loading()
    }

    fn start_loading(&mut self) {
        self.phase = Phase::Loading;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        warn!("page failed: {}", message);
        self.phase = Phase::Failed;
        self.error = Some(message);
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.latest = Ticket(self.latest.0 + 1);
        self.latest
    }

    fn begin_analysis(&mut self) -> Effect {
        let Some(image) = self.image.clone() else {
            return Effect::None;
        };
        self.start_loading();
        let ticket = self.issue_ticket();
        info!(ticket = ticket.0, mime = %image.mime_type, "analysis requested");
        Effect::Analyze { ticket, image }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        if ticket != self.latest {
            debug!(ticket = ticket.0, latest = self.latest.0, "stale analysis response dropped");
            return true;
        }
        false
    }
}

/// 状態遷移
pub fn reduce(state: &mut UiState, event: Event) -> Effect {
    match event {
        Event::Mount => {
            state.start_loading();
            Effect::LoadDefault
        }

        Event::DefaultLoaded(image) => {
            // 起動中に新しい画像が選ばれていたら上書きしない
            if state.image.is_some() {
                return Effect::None;
            }
            state.image = Some(image);
            state.report = Some(AnalysisReport::new(DEFAULT_REPORT));
            // 起動中の拒否エラーは残す
            if state.is_loading() {
                state.phase = Phase::Ready;
                state.error = None;
            }
            Effect::None
        }

        Event::DefaultFailed(message) => {
            if state.image.is_some() {
                return Effect::None;
            }
            state.fail(message);
            Effect::None
        }

        Event::FileRejected(err) => {
            // 画像とレポートはそのまま。実行中の解析はこの操作で置き換わる
            if state.is_loading() {
                state.issue_ticket();
                state.phase = Phase::Failed;
            }
            warn!("file rejected: {}", err);
            state.error = Some(err.to_string());
            Effect::None
        }

        Event::FileAccepted(image) => {
            state.image = Some(image);
            state.report = None;
            state.begin_analysis()
        }

        Event::ReadFailed(message) => {
            if state.is_loading() {
                state.issue_ticket();
            }
            state.fail(message);
            Effect::None
        }

        Event::Reidentify => state.begin_analysis(),

        Event::AnalysisSucceeded { ticket, report } => {
            if state.is_stale(ticket) {
                return Effect::None;
            }
            info!(ticket = ticket.0, chars = report.as_str().len(), "analysis finished");
            state.report = Some(report);
            state.phase = Phase::Ready;
            state.error = None;
            Effect::None
        }

        Event::AnalysisFailed { ticket, message } => {
            if state.is_stale(ticket) {
                return Effect::None;
            }
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ANALYSIS_ERROR.to_string());
            state.fail(message);
            Effect::None
        }
    }
}
