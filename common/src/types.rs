//! 共有データ型
//!
//! CLIとWeb(WASM)で共有される型:
//! - EncodedImage: MIMEタイプ + Base64データ
//! - AnalysisReport: 解析サービスが返したテキスト
//! - DisplayBlock: 整形済みの表示単位

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// エンコード済み画像
///
/// 差し替えは常に丸ごと。部分的な書き換えはしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub mime_type: String,
    /// Base64（パディング付き標準アルファベット）
    pub data: String,
}

impl EncodedImage {
    /// 生バイト列からエンコード
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// "data:image/jpeg;base64,..." 形式のData URLから生成
    ///
    /// Base64以外のData URLは扱わない
    pub fn from_data_url(data_url: &str) -> Option<Self> {
        let rest = data_url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// プレビュー表示用のData URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// デコード後のおおよそのバイト数
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|&b| b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// 解析サービスの応答テキスト
///
/// 構造は仮定しない。整形時に行単位で構造を再導出する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport(String);

impl AnalysisReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for AnalysisReport {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for AnalysisReport {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// 整形済みの表示単位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayBlock {
    /// 番号付きセクション見出し
    Heading { text: String },
    /// "- ラベル: 値" 行
    LabeledField { label: String, value: String },
    /// コロンなしの箇条書き
    BulletItem { text: String },
    Paragraph { text: String },
}

impl DisplayBlock {
    pub fn kind(&self) -> &'static str {
        match self {
            DisplayBlock::Heading { .. } => "heading",
            DisplayBlock::LabeledField { .. } => "labeledField",
            DisplayBlock::BulletItem { .. } => "bulletItem",
            DisplayBlock::Paragraph { .. } => "paragraph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_encodes_base64() {
        let image = EncodedImage::from_bytes("image/png", b"hello");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.decoded_len(), 5);
    }

    #[test]
    fn test_data_url_jpeg() {
        let image = EncodedImage::from_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "/9j/4AAQSkZJRg==");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/4AAQSkZJRg==");
    }

    #[test]
    fn test_data_url_invalid() {
        assert!(EncodedImage::from_data_url("not a data url").is_none());
        assert!(EncodedImage::from_data_url("").is_none());
        assert!(EncodedImage::from_data_url("data:text/plain,hello").is_none());
        assert!(EncodedImage::from_data_url("data:image/png;base64,").is_none());
    }

    #[test]
    fn test_report_blank() {
        assert!(AnalysisReport::new("  \n\t").is_blank());
        assert!(!AnalysisReport::from("1. Species").is_blank());
    }

    #[test]
    fn test_display_block_serialize_tagged() {
        let block = DisplayBlock::LabeledField {
            label: "Scientific name".to_string(),
            value: "Quercus rubra".to_string(),
        };
        let json = serde_json::to_string(&block).expect("シリアライズ失敗");
        assert_eq!(
            json,
            r#"{"kind":"labeledField","label":"Scientific name","value":"Quercus rubra"}"#
        );
        assert_eq!(block.kind(), "labeledField");
    }
}
