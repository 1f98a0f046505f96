//! Open text documents and editor positions.

use serde::{Deserialize, Serialize};

use crate::domain::ast::Span;
use crate::domain::offsets::{Granularity, OffsetTranslator};

/// Zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Line starts in UTF-16 code units.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut offset = 0;
        for ch in text.chars() {
            offset += ch.len_utf16();
            if ch == '\n' {
                line_starts.push(offset);
            }
        }
        Self { line_starts, len: offset }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        Position::new(line as u32, (offset - start) as u32)
    }

    /// Offset of a position; characters past the line end clamp to it.
    pub fn offset_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&start) = self.line_starts.get(line) else {
            return self.len;
        };
        let next = self.line_starts.get(line + 1).copied().unwrap_or(self.len);
        (start + position.character as usize).min(next)
    }
}

/// Byte length of leading whitespace, comments and a shebang line. The
/// parser's module span starts after these.
pub fn leading_trivia_len(text: &str) -> usize {
    let mut consumed = 0;
    if text.starts_with("#!") {
        consumed = text.find('\n').unwrap_or(text.len());
    }
    loop {
        let rest = &text[consumed..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        consumed += rest.len() - trimmed.len();

        if let Some(comment) = trimmed.strip_prefix("//") {
            consumed += 2 + comment.find('\n').unwrap_or(comment.len());
        } else if let Some(comment) = trimmed.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => consumed += 2 + end + 2,
                None => return text.len(),
            }
        } else {
            return consumed;
        }
    }
}

/// An open document with its offset tables.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: String,
    pub language_id: String,
    pub version: i32,
    translator: OffsetTranslator,
    lines: LineIndex,
    trivia: usize,
}

impl Document {
    pub fn new(uri: impl Into<String>, language_id: impl Into<String>, version: i32, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineIndex::new(&text);
        let trivia = leading_trivia_len(&text);
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            translator: OffsetTranslator::new(text, Granularity::CodeUnit),
            lines,
            trivia,
        }
    }

    pub fn text(&self) -> &str {
        self.translator.text()
    }

    /// Parser offset of this document's first byte, given the module span
    /// start. Parsers that share one source map across files hand out
    /// growing offsets; subtracting this base makes spans local.
    pub fn span_base(&self, module_start: u32) -> u32 {
        module_start.saturating_sub(self.trivia as u32)
    }

    /// Local byte offset of a parser offset.
    pub fn local_byte(&self, pos: u32, base: u32) -> usize {
        pos.saturating_sub(base) as usize
    }

    /// Parser offset of a local byte offset.
    pub fn global_byte(&self, byte: usize, base: u32) -> u32 {
        base.saturating_add(byte as u32)
    }

    pub fn position_of_byte(&self, byte: usize) -> Position {
        self.lines.position_at(self.translator.byte_offset_to_char_index(byte))
    }

    pub fn byte_of_position(&self, position: Position) -> usize {
        self.translator.char_index_to_byte_offset(self.lines.offset_at(position))
    }

    pub fn range_of(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_of_byte(start), self.position_of_byte(end))
    }

    /// Editor range of a parser span.
    pub fn range_of_span(&self, span: Span, base: u32) -> Range {
        self.range_of(self.local_byte(span.start, base), self.local_byte(span.end, base))
    }

    /// Text of a parser span, if it falls on char boundaries.
    pub fn text_of_span(&self, span: Span, base: u32) -> Option<&str> {
        self.translator
            .slice(self.local_byte(span.start, base), self.local_byte(span.end, base))
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_round_trip() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position_at(4), Position::new(1, 1));
        assert_eq!(index.offset_at(Position::new(1, 1)), 4);
        assert_eq!(index.position_at(6), Position::new(2, 0));
        assert_eq!(index.offset_at(Position::new(0, 50)), 3);
        assert_eq!(index.offset_at(Position::new(9, 0)), 9);
    }

    #[test]
    fn test_leading_trivia() {
        assert_eq!(leading_trivia_len("const a = 1;"), 0);
        assert_eq!(leading_trivia_len("  // note\n/* block */ x"), 22);
        assert_eq!(leading_trivia_len("#!/usr/bin/env node\nx"), 20);
        assert_eq!(leading_trivia_len("/* open"), 7);
    }

    #[test]
    fn test_positions_through_multibyte_text() {
        let doc = Document::new("file:///a.ts", "typescript", 1, "// 😀\nconst a = 'é';");
        assert_eq!(doc.position_of_byte(8), Position::new(1, 0));
        assert_eq!(doc.byte_of_position(Position::new(1, 11)), 19);
        assert_eq!(doc.position_of_byte(21), Position::new(1, 12));
        assert_eq!(doc.position_of_byte(5), Position::new(0, 5));
    }

    #[test]
    fn test_span_base_strips_parser_offset() {
        let doc = Document::new("file:///a.ts", "typescript", 1, "\n\nx;");
        // A parser that starts counting at 1 puts the module at 3.
        let base = doc.span_base(3);
        assert_eq!(base, 1);
        assert_eq!(doc.local_byte(3, base), 2);
        assert_eq!(doc.text_of_span(Span::new(3, 5), base), Some("x;"));
    }
}
