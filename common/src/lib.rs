//! Tree ID Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック

pub mod types;
pub mod error;
pub mod image;
pub mod prompts;
pub mod gemini;
pub mod formatter;
pub mod controller;

pub use types::{AnalysisReport, DisplayBlock, EncodedImage};
pub use error::{Error, Result, ValidationError};
pub use image::{validate_upload, ACCEPTED_MIME_TYPES, DEFAULT_IMAGE_PATH, MAX_UPLOAD_BYTES};
pub use prompts::{build_identification_prompt, DEFAULT_REPORT};
pub use formatter::{blocks_to_text, format_report};
pub use controller::{reduce, Effect, Event, Phase, Ticket, UiState, GENERIC_ANALYSIS_ERROR};
