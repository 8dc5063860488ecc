//! 画像読み込み
//!
//! - デフォルト画像: 設定のパスから読む（失敗はLoadエラー）
//! - ユーザー画像: 宣言MIMEタイプとサイズを検証してから読み込み、Base64化

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use tree_id_common::image::{mime_from_extension, mime_from_path};
use tree_id_common::{validate_upload, EncodedImage, Error, Result};

/// 判定できない場合の宣言タイプ（検証で弾かれる）
const UNKNOWN_MIME: &str = "application/octet-stream";

/// 同梱のデフォルト画像を読み込む
pub async fn load_default(path: &Path) -> Result<EncodedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;

    let mime_type = mime_from_path(&path.to_string_lossy())
        .or_else(|| sniff_bytes(&bytes))
        .ok_or_else(|| Error::Load(format!("{}: 画像形式を判定できません", path.display())))?;

    debug!(path = %path.display(), bytes = bytes.len(), "default image loaded");
    Ok(EncodedImage::from_bytes(mime_type, &bytes))
}

/// ユーザーが選んだファイルを読み込む
///
/// `declared_mime` を省略すると拡張子、次にファイル先頭のバイト列で判定する。
/// 検証に通らないファイルは読み込まない。
pub async fn load_file(path: &Path, declared_mime: Option<&str>) -> Result<EncodedImage> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::Read(format!("{}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(Error::Read(format!("{}: ファイルではありません", path.display())));
    }

    let mime_type = match declared_mime {
        Some(mime) => mime.to_string(),
        None => detect_mime(path).unwrap_or(UNKNOWN_MIME).to_string(),
    };

    validate_upload(&mime_type, metadata.len())?;

    let owned = path.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || std::fs::read(&owned))
        .await
        .map_err(|e| Error::Read(e.to_string()))?
        .map_err(|e| Error::Read(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), mime = %mime_type, bytes = bytes.len(), "image encoded");
    Ok(EncodedImage::from_bytes(mime_type, &bytes))
}

/// 拡張子 → 先頭バイト列の順でMIMEタイプを推定
pub fn detect_mime(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| mime_from_extension(&ext.to_string_lossy()))
        .or_else(|| sniff_file(path))
}

fn sniff_file(path: &Path) -> Option<&'static str> {
    let mut head = Vec::with_capacity(32);
    File::open(path).ok()?.take(32).read_to_end(&mut head).ok()?;
    sniff_bytes(&head)
}

fn sniff_bytes(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}
