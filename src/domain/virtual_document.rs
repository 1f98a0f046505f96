//! A one-declaration stylesheet handed to the CSS completion service.

use crate::domain::document::{LineIndex, Position};

pub const ROOT_WRAPPER: &str = ":root{\n";

/// `:root{\n<property>: <value>;\n}`.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    text: String,
    property: String,
    lines: LineIndex,
}

impl VirtualDocument {
    pub const URI: &'static str = "untitled://embedded.css";
    pub const LANGUAGE_ID: &'static str = "css";

    pub fn new(property: &str, value: &str) -> Self {
        let text = format!("{}{}: {};\n}}", ROOT_WRAPPER, property, value);
        let lines = LineIndex::new(&text);
        Self { text, property: property.to_string(), lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// The declaration value as written into the document.
    pub fn value(&self) -> &str {
        let start = self.value_start();
        let end = self.text.rfind(";\n}").unwrap_or(self.text.len()).max(start);
        &self.text[start..end]
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.lines.position_at(offset)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        self.lines.offset_at(position)
    }

    /// Maps an offset inside the source string literal (counting its opening
    /// quote as 0) to the same character in the virtual document.
    pub fn map_offset(&self, offset: usize) -> usize {
        offset + self.separator() + 1
    }

    fn separator(&self) -> usize {
        self.text[ROOT_WRAPPER.len()..]
            .find(": ")
            .map(|i| i + ROOT_WRAPPER.len())
            .unwrap_or(ROOT_WRAPPER.len())
    }

    fn value_start(&self) -> usize {
        self.separator() + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let doc = VirtualDocument::new("display", "fl");
        assert_eq!(doc.text(), ":root{\ndisplay: fl;\n}");
        assert_eq!(doc.value(), "fl");
        assert_eq!(doc.property(), "display");
    }

    #[test]
    fn test_offset_mapping() {
        let doc = VirtualDocument::new("display", "fl");
        // Cursor after "fl" in the literal `'fl'` sits at offset 3.
        let virtual_offset = doc.map_offset(3);
        assert_eq!(&doc.text()[..virtual_offset], ":root{\ndisplay: fl");
        assert_eq!(doc.position_at(virtual_offset), Position::new(1, 11));
        assert_eq!(doc.offset_at(Position::new(1, 11)), virtual_offset);
    }
}
