//! エラー型定義
//!
//! 画面に出すメッセージはそのまま `Display` で使う

use thiserror::Error;

/// アップロード検証エラー（ローカルで完結し、サービスには届かない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload an image file (JPEG or PNG). Received: {0}")]
    UnsupportedType(String),

    #[error("Image is too large ({size} bytes). Maximum size is 20 MB.")]
    TooLarge { size: u64 },
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load default image: {0}")]
    Load(String),

    #[error("Failed to read image: {0}")]
    Read(String),

    #[error("{0}")]
    Analysis(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
