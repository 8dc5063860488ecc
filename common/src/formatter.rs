//! 解析レポートの整形
//!
//! レポートを行単位で分類し、DisplayBlock列に変換する。
//! 分類は上から順に評価するルール表で決まり、最初に一致したものを使う。

use crate::types::{AnalysisReport, DisplayBlock};
use regex::Regex;

/// 除去するマークダウン記号
pub const MARKDOWN_CHARS: &[char] = &['*', 'ـ', '#', '`', '_'];

/// 分類ルール
pub struct LineRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub build: fn(&str) -> DisplayBlock,
}

lazy_static::lazy_static! {
    // "1." "12." など行頭の番号（ASCII数字のみ）
    static ref HEADING_RE: Regex = Regex::new(r"^[0-9]+\.").unwrap();
    static ref HEADING_PREFIX_RE: Regex = Regex::new(r"^[0-9]+\.\s*").unwrap();
}

/// 評価順のルール表（最後のparagraphは常に一致）
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        name: "heading",
        matches: is_heading,
        build: build_heading,
    },
    LineRule {
        name: "labeled_field",
        matches: is_labeled_field,
        build: build_labeled_field,
    },
    LineRule {
        name: "bullet_item",
        matches: is_bullet,
        build: build_bullet,
    },
    LineRule {
        name: "paragraph",
        matches: always,
        build: build_paragraph,
    },
];

/// レポート全体を整形
///
/// 空行はブロックを生成しない。入力の行順を保つ。
pub fn format_report(report: &AnalysisReport) -> Vec<DisplayBlock> {
    report.as_str().lines().filter_map(format_line).collect()
}

/// 1行を整形（空行ならNone）
pub fn format_line(line: &str) -> Option<DisplayBlock> {
    let cleaned = strip_markdown(line);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    LINE_RULES
        .iter()
        .find(|rule| (rule.matches)(cleaned))
        .map(|rule| (rule.build)(cleaned))
}

/// マークダウン記号を除去
pub fn strip_markdown(line: &str) -> String {
    line.chars().filter(|c| !MARKDOWN_CHARS.contains(c)).collect()
}

/// ブロック列をプレーンテキストに戻す（CLI表示用）
pub fn blocks_to_text(blocks: &[DisplayBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        match block {
            DisplayBlock::Heading { text } => {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(text);
                out.push('\n');
                out.push_str(&"=".repeat(text.chars().count()));
                out.push('\n');
            }
            DisplayBlock::LabeledField { label, value } => {
                out.push_str(&format!("  {}: {}\n", label, value));
            }
            DisplayBlock::BulletItem { text } => {
                out.push_str(&format!("  • {}\n", text));
            }
            DisplayBlock::Paragraph { text } => {
                out.push_str(text);
                out.push('\n');
            }
        }
    }
    out
}

fn is_heading(line: &str) -> bool {
    HEADING_RE.is_match(line)
}

fn build_heading(line: &str) -> DisplayBlock {
    DisplayBlock::Heading {
        text: HEADING_PREFIX_RE.replace(line, "").trim().to_string(),
    }
}

fn is_labeled_field(line: &str) -> bool {
    line.starts_with('-') && line.contains(':')
}

fn build_labeled_field(line: &str) -> DisplayBlock {
    let body = &line[1..];
    let (label, value) = body.split_once(':').unwrap_or((body, ""));
    DisplayBlock::LabeledField {
        label: label.trim().to_string(),
        value: value.trim().to_string(),
    }
}

fn is_bullet(line: &str) -> bool {
    line.starts_with('-')
}

fn build_bullet(line: &str) -> DisplayBlock {
    DisplayBlock::BulletItem {
        text: line[1..].trim().to_string(),
    }
}

fn always(_: &str) -> bool {
    true
}

fn build_paragraph(line: &str) -> DisplayBlock {
    DisplayBlock::Paragraph {
        text: line.trim().to_string(),
    }
}
