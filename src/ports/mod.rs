// Seams to the collaborators StyleLens does not implement itself.

use serde::{Deserialize, Serialize};

use crate::domain::ast::Node;
use crate::domain::document::{Position, Range};
use crate::domain::virtual_document::VirtualDocument;

/// Produces a syntax tree for a source file.
pub trait AstParser: Send + Sync {
    fn parse(&self, source: &str, language_id: &str) -> anyhow::Result<Node>;
}

/// A scalar style value before CSS normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssScalar<'a> {
    Str(&'a str),
    Number(f64),
}

/// Normalizes a style value the way the style compiler would emit it.
/// `property` is the camelCase key as written in source.
pub trait ValueNormalizer: Send + Sync {
    fn normalize(&self, property: &str, value: CssScalar<'_>) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_edit: Option<TextEdit>,
}

/// CSS completions for a position inside a virtual stylesheet.
pub trait CssCompletionService: Send + Sync {
    fn complete(&self, document: &VirtualDocument, position: Position) -> Vec<CompletionItem>;
}
