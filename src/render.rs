//! ターミナル出力

use crate::cli::OutputFormat;
use crate::error::Result;
use serde::Serialize;
use tree_id_common::{blocks_to_text, DisplayBlock, UiState};

/// JSON出力の形
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageOutput<'a> {
    phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    blocks: &'a [DisplayBlock],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSummary<'a> {
    mime_type: &'a str,
    bytes: usize,
}

/// ページ状態を文字列化
pub fn render_page(state: &UiState, blocks: &[DisplayBlock], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let output = PageOutput {
                phase: state.phase().as_str(),
                image: state.image().map(|image| ImageSummary {
                    mime_type: &image.mime_type,
                    bytes: image.decoded_len(),
                }),
                error: state.error(),
                blocks,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            if let Some(error) = state.error() {
                out.push_str(&format!("✖ {}\n", error));
            }
            if !blocks.is_empty() {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&blocks_to_text(blocks));
            }
            Ok(out)
        }
    }
}

/// ブロック列だけを文字列化（formatコマンド用）
pub fn render_blocks(blocks: &[DisplayBlock], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(blocks)?),
        OutputFormat::Text => Ok(blocks_to_text(blocks)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_id_common::{reduce, EncodedImage, Event};

    fn ready_state() -> UiState {
        let mut state = UiState::new();
        reduce(&mut state, Event::Mount);
        reduce(&mut state, Event::DefaultLoaded(EncodedImage::from_bytes("image/png", b"abc")));
        state
    }

    #[test]
    fn test_render_json() {
        let state = ready_state();
        let blocks = vec![DisplayBlock::Heading { text: "Species".into() }];
        let json = render_page(&state, &blocks, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "ready");
        assert_eq!(value["image"]["mimeType"], "image/png");
        assert_eq!(value["image"]["bytes"], 3);
        assert!(value.get("error").is_none());
        assert_eq!(value["blocks"][0]["kind"], "heading");
        assert_eq!(value["blocks"][0]["text"], "Species");
    }

    #[test]
    fn test_render_text_with_error() {
        let mut state = ready_state();
        reduce(&mut state, Event::ReadFailed("Failed to read image: gone".into()));
        let text = render_page(&state, &[], OutputFormat::Text).unwrap();
        assert_eq!(text, "✖ Failed to read image: gone\n");
    }

    #[test]
    fn test_render_blocks_json_array() {
        let blocks = vec![DisplayBlock::BulletItem { text: "Acorns".into() }];
        let json = render_blocks(&blocks, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('['));
        assert!(json.contains("\"bulletItem\""));
    }
}
