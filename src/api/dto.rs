use serde::Deserialize;

use crate::domain::color::Rgba;
use crate::domain::document::{Position, Range};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenParams {
    pub uri: String,
    pub language_id: String,
    #[serde(default)]
    pub version: i32,
    pub text: String,
    /// SWC-compatible syntax tree; parsed with the configured command when absent.
    pub ast: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeParams {
    pub uri: String,
    #[serde(default)]
    pub version: i32,
    pub text: String,
    pub ast: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    pub uri: String,
}

/// Parameters of `HOVER` and `COMPLETE`.
#[derive(Debug, Deserialize)]
pub struct PositionParams {
    pub uri: String,
    pub position: Position,
}

#[derive(Debug, Deserialize)]
pub struct ColorPresentationParams {
    pub uri: String,
    pub range: Range,
    pub color: Rgba,
}
