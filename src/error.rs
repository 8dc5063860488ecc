use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeIdError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`tree-id config --set-api-key YOUR_KEY` または環境変数 GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tree_id_common::Error),
}

pub type Result<T> = std::result::Result<T, TreeIdError>;
