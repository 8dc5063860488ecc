//! セッション（ページ状態ドライバ）テスト
//!
//! 解析サービスは台本どおりに応答するクライアントで置き換える

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tree_id::analyzer::{AnalysisClient, Offline};
use tree_id::session::Session;
use tree_id_common::{
    AnalysisReport, DisplayBlock, EncodedImage, Error, Phase, Result, DEFAULT_REPORT,
    GENERIC_ANALYSIS_ERROR, MAX_UPLOAD_BYTES,
};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// 台本どおりに応答するクライアント
#[derive(Default)]
struct Scripted {
    responses: RefCell<VecDeque<Result<AnalysisReport>>>,
    calls: RefCell<Vec<(EncodedImage, String)>>,
}

impl Scripted {
    fn with(responses: Vec<Result<AnalysisReport>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl AnalysisClient for Scripted {
    async fn analyze(&self, image: &EncodedImage, prompt: &str) -> Result<AnalysisReport> {
        self.calls.borrow_mut().push((image.clone(), prompt.to_string()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Analysis("no scripted response".into())))
    }
}

fn fixture_dir() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let default_image = dir.path().join("default-tree.png");
    std::fs::write(&default_image, PNG_BYTES).unwrap();
    (dir, default_image)
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn ok(text: &str) -> Result<AnalysisReport> {
    Ok(AnalysisReport::new(text))
}

/// 起動時はデフォルト画像と組み込みレポートを表示
#[tokio::test]
async fn test_mount_shows_default() {
    let (_dir, default_image) = fixture_dir();
    let mut session = Session::new(Scripted::default(), &default_image);

    session.mount().await;

    let state = session.state();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.image().unwrap().mime_type, "image/png");
    assert_eq!(state.report().unwrap().as_str(), DEFAULT_REPORT);
    assert_eq!(session.client().call_count(), 0);

    let headings = session
        .blocks()
        .iter()
        .filter(|b| matches!(b, DisplayBlock::Heading { .. }))
        .count();
    assert_eq!(headings, 5);
}

/// デフォルト画像がない場合
#[tokio::test]
async fn test_mount_without_default_fails() {
    let dir = tempdir().unwrap();
    let mut session = Session::new(Scripted::default(), dir.path().join("missing.png"));

    session.mount().await;

    assert_eq!(session.state().phase(), Phase::Failed);
    assert!(session.state().error().unwrap().contains("Failed to load default image"));
    assert!(session.blocks().is_empty());
}

/// 画像以外のファイルは送信せず、表示中の画像もそのまま
#[tokio::test]
async fn test_non_image_rejected_without_touching_state() {
    let (dir, default_image) = fixture_dir();
    let mut session = Session::new(Scripted::default(), &default_image);
    session.mount().await;
    let before = session.state().image().cloned();

    let notes = write_file(dir.path(), "notes.txt", b"not a tree");
    session.select_file(&notes, None).await;

    let state = session.state();
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.image().cloned(), before);
    assert_eq!(state.report().unwrap().as_str(), DEFAULT_REPORT);
    assert!(state.error().unwrap().contains("Please upload an image file"));
    assert_eq!(session.client().call_count(), 0);
}

/// 20MiB + 1バイトはサイズ超過
#[tokio::test]
async fn test_oversize_rejected() {
    let (dir, default_image) = fixture_dir();
    let mut session = Session::new(Scripted::default(), &default_image);
    session.mount().await;

    let big = dir.path().join("huge.jpg");
    File::create(&big).unwrap().set_len(MAX_UPLOAD_BYTES + 1).unwrap();
    session.select_file(&big, None).await;

    let error = session.state().error().unwrap();
    assert!(error.contains("too large"), "{}", error);
    assert_eq!(session.client().call_count(), 0);
}

/// 画像を選ぶと解析され、結果が整形される
#[tokio::test]
async fn test_upload_and_identify() {
    let (dir, default_image) = fixture_dir();
    let client = Scripted::with(vec![ok(
        "**1. Species Identification:**\n- Common name: Sugar maple\n- Scientific name: Acer saccharum\n\n- Sap is used for syrup\n",
    )]);
    let mut session = Session::new(client, &default_image);
    session.mount().await;

    let photo = write_file(dir.path(), "maple.png", PNG_BYTES);
    session.select_file(&photo, None).await;

    assert_eq!(session.state().phase(), Phase::Ready);
    assert!(session.state().error().is_none());
    assert_eq!(
        session.blocks(),
        vec![
            DisplayBlock::Heading { text: "Species Identification:".into() },
            DisplayBlock::LabeledField { label: "Common name".into(), value: "Sugar maple".into() },
            DisplayBlock::LabeledField {
                label: "Scientific name".into(),
                value: "Acer saccharum".into()
            },
            DisplayBlock::BulletItem { text: "Sap is used for syrup".into() },
        ]
    );

    let calls = session.client().calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, EncodedImage::from_bytes("image/png", PNG_BYTES));
    assert!(calls[0].1.contains("Species Identification"));
    assert!(calls[0].1.contains("educational purposes only"));
}

/// 解析失敗後も画像は残り、再識別で同じ画像を再送する
#[tokio::test]
async fn test_failure_then_reidentify() {
    let (dir, default_image) = fixture_dir();
    let client = Scripted::with(vec![
        Err(Error::Analysis("The model is overloaded.".into())),
        ok("1. Species Identification:\n- Common name: White birch"),
    ]);
    let mut session = Session::new(client, &default_image);

    let photo = write_file(dir.path(), "birch.png", PNG_BYTES);
    session.select_file(&photo, Some("image/png")).await;

    assert_eq!(session.state().phase(), Phase::Failed);
    assert_eq!(session.state().error(), Some("The model is overloaded."));
    assert!(session.state().image().is_some());

    // 再識別ではファイルを読み直さない
    std::fs::remove_file(&photo).unwrap();
    session.reidentify().await;

    assert_eq!(session.state().phase(), Phase::Ready);
    assert!(session.state().error().is_none());
    let calls = session.client().calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, calls[1].0);
}

/// メッセージのない解析エラーは汎用メッセージ
#[tokio::test]
async fn test_empty_error_message_falls_back() {
    let (dir, default_image) = fixture_dir();
    let client = Scripted::with(vec![Err(Error::Analysis(String::new()))]);
    let mut session = Session::new(client, &default_image);

    let photo = write_file(dir.path(), "oak.png", PNG_BYTES);
    session.select_file(&photo, None).await;

    assert_eq!(session.state().error(), Some(GENERIC_ANALYSIS_ERROR));
}

/// 存在しないファイルは読込エラー
#[tokio::test]
async fn test_missing_file_is_read_failure() {
    let (dir, default_image) = fixture_dir();
    let mut session = Session::new(Scripted::default(), &default_image);
    session.mount().await;

    session.select_file(&dir.path().join("gone.jpg"), None).await;

    assert_eq!(session.state().phase(), Phase::Failed);
    assert!(session.state().error().unwrap().contains("Failed to read image"));
    assert_eq!(session.client().call_count(), 0);
}

/// APIキーなしで再識別すると失敗表示になる
#[tokio::test]
async fn test_offline_reidentify() {
    let (_dir, default_image) = fixture_dir();
    let mut session = Session::new(Offline, &default_image);
    session.mount().await;
    assert_eq!(session.state().phase(), Phase::Ready);

    session.reidentify().await;
    assert_eq!(session.state().phase(), Phase::Failed);
    assert!(session.state().error().unwrap().contains("no API key"));
    assert!(session.state().image().is_some());
}

/// identifyはマウントせずに直接ファイルを選ぶ。拒否されたら失敗扱い
#[tokio::test]
async fn test_rejected_file_without_mount_is_failure() {
    let (dir, default_image) = fixture_dir();
    let mut session = Session::new(Offline, &default_image);

    let notes = write_file(dir.path(), "notes.txt", b"not a tree");
    session.select_file(&notes, None).await;

    assert_eq!(session.state().phase(), Phase::Idle);
    assert!(session.state().image().is_none());
    assert!(session.state().error().unwrap().contains("Please upload an image file"));
    assert!(!session.succeeded());
}

#[tokio::test]
async fn test_identified_without_mount_is_success() {
    let (dir, default_image) = fixture_dir();
    let mut session = Session::new(Scripted::with(vec![ok("1. Species Identification:")]), &default_image);

    let photo = write_file(dir.path(), "oak.png", PNG_BYTES);
    session.select_file(&photo, None).await;

    assert_eq!(session.state().phase(), Phase::Ready);
    assert!(session.succeeded());
}
