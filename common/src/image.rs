//! アップロード画像の検証（CLI/WASM共通）
//!
//! 読み込み前に宣言MIMEタイプとサイズだけで判定する

use crate::error::ValidationError;

/// アップロード上限: 20 MiB
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// ファイル選択ダイアログで受け付ける形式
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// 同梱のデフォルト画像（Webでは静的パス、CLIでは設定の既定値）
pub const DEFAULT_IMAGE_PATH: &str = "assets/default-tree.png";

/// `<input accept=...>` 用の文字列
pub fn accept_attribute() -> String {
    ACCEPTED_MIME_TYPES.join(",")
}

/// 宣言MIMEタイプとサイズを検証
///
/// 種別違いとサイズ超過は別メッセージになる。種別を先に判定する。
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), ValidationError> {
    if !mime_type.starts_with("image/") {
        let received = if mime_type.is_empty() { "unknown" } else { mime_type };
        return Err(ValidationError::UnsupportedType(received.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

/// 拡張子からMIMEタイプを推定
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// パス文字列（URL可）の末尾拡張子からMIMEタイプを推定
pub fn mime_from_path(path: &str) -> Option<&'static str> {
    let name = path.rsplit(|c: char| c == '/' || c == '\\').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    mime_from_extension(ext)
}
