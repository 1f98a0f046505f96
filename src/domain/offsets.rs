//! Byte offset ⇄ character index translation.
//!
//! Parser spans are UTF-8 byte offsets; editor positions count UTF-16 code
//! units (or user-perceived characters). The translator keeps a checkpoint
//! every [`CHUNK_SIZE`] characters so each lookup scans at most one chunk.

use unicode_segmentation::UnicodeSegmentation;

pub const CHUNK_SIZE: usize = 1000;

/// What one "character" means for the index side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// UTF-16 code units, as editors count columns.
    #[default]
    CodeUnit,
    /// Extended grapheme clusters.
    Grapheme,
}

#[derive(Debug, Clone)]
pub struct OffsetTranslator {
    text: String,
    granularity: Granularity,
    byte_starts: Vec<usize>,
    unit_starts: Vec<usize>,
}

impl OffsetTranslator {
    pub fn new(text: impl Into<String>, granularity: Granularity) -> Self {
        let text = text.into();
        let mut byte_starts = vec![0];
        let mut unit_starts = vec![0];
        let mut units = 0;

        for (index, (start, _, width)) in segments(&text, granularity).enumerate() {
            if index > 0 && index % CHUNK_SIZE == 0 {
                byte_starts.push(start);
                unit_starts.push(units);
            }
            units += width;
        }

        Self { text, granularity, byte_starts, unit_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Character index of a byte offset. Offsets past the end clamp; offsets
    /// inside a character round up to the next boundary.
    pub fn byte_offset_to_char_index(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        let chunk = self.byte_starts.partition_point(|&b| b <= offset).saturating_sub(1);
        let (mut byte, mut unit) = self.checkpoint(chunk);

        for (_, len, width) in segments(&self.text[byte..], self.granularity) {
            if byte >= offset {
                break;
            }
            byte += len;
            unit += width;
        }
        unit
    }

    /// Byte offset of a character index. Indices past the end clamp to the
    /// text length; an index inside a surrogate pair rounds up.
    pub fn char_index_to_byte_offset(&self, index: usize) -> usize {
        let chunk = self.unit_starts.partition_point(|&u| u <= index).saturating_sub(1);
        let (mut byte, mut unit) = self.checkpoint(chunk);

        for (_, len, width) in segments(&self.text[byte..], self.granularity) {
            if unit >= index {
                break;
            }
            byte += len;
            unit += width;
        }
        byte
    }

    /// Text between two byte offsets; `None` when either is not on a char
    /// boundary.
    pub fn slice(&self, from: usize, to: usize) -> Option<&str> {
        self.text.get(from..to)
    }

    /// Total length in characters.
    pub fn len(&self) -> usize {
        self.byte_offset_to_char_index(self.text.len())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn checkpoint(&self, chunk: usize) -> (usize, usize) {
        match (self.byte_starts.get(chunk), self.unit_starts.get(chunk)) {
            (Some(&byte), Some(&unit)) => (byte, unit),
            _ => (0, 0),
        }
    }
}

/// `(byte start, byte length, width in index units)` for each character.
fn segments(text: &str, granularity: Granularity) -> Box<dyn Iterator<Item = (usize, usize, usize)> + '_> {
    match granularity {
        Granularity::CodeUnit => {
            Box::new(text.char_indices().map(|(i, c)| (i, c.len_utf8(), c.len_utf16())))
        }
        Granularity::Grapheme => Box::new(text.grapheme_indices(true).map(|(i, g)| (i, g.len(), 1))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_identity() {
        let translator = OffsetTranslator::new("const a = 1;", Granularity::CodeUnit);
        for offset in 0..=12 {
            assert_eq!(translator.byte_offset_to_char_index(offset), offset);
            assert_eq!(translator.char_index_to_byte_offset(offset), offset);
        }
    }

    #[test]
    fn test_variation_selectors() {
        let translator = OffsetTranslator::new("❤️ Hello, ❤️ world!", Granularity::CodeUnit);
        assert_eq!(translator.byte_offset_to_char_index(4), 2);
        assert_eq!(translator.byte_offset_to_char_index(8), 4);
    }

    #[test]
    fn test_surrogate_pairs() {
        let translator = OffsetTranslator::new(" 😀😀 ", Granularity::CodeUnit);
        assert_eq!(translator.byte_offset_to_char_index(0), 0);
        assert_eq!(translator.byte_offset_to_char_index(1), 1);
        assert_eq!(translator.byte_offset_to_char_index(5), 3);
        assert_eq!(translator.byte_offset_to_char_index(9), 5);
        assert_eq!(translator.char_index_to_byte_offset(3), 5);
        assert_eq!(translator.char_index_to_byte_offset(2), 5);
    }

    #[test]
    fn test_zwj_sequences() {
        let text = " 🚵🏻\u{200d}♀\u{fe0f}🚵🏻\u{200d}♀\u{fe0f} ";
        let units = OffsetTranslator::new(text, Granularity::CodeUnit);
        assert_eq!(units.byte_offset_to_char_index(18), 8);
        assert_eq!(units.byte_offset_to_char_index(35), 15);

        let graphemes = OffsetTranslator::new(text, Granularity::Grapheme);
        assert_eq!(graphemes.byte_offset_to_char_index(18), 2);
        assert_eq!(graphemes.byte_offset_to_char_index(35), 3);
        assert_eq!(graphemes.slice(1, 18), Some("🚵🏻\u{200d}♀\u{fe0f}"));
        assert_eq!(graphemes.slice(1, 3), None);
    }

    #[test]
    fn test_clamps_past_end() {
        let translator = OffsetTranslator::new("ab", Granularity::CodeUnit);
        assert_eq!(translator.byte_offset_to_char_index(99), 2);
        assert_eq!(translator.char_index_to_byte_offset(99), 2);
    }

    #[test]
    fn test_monotonic_across_chunks() {
        let text = "é😀a".repeat(CHUNK_SIZE);
        let translator = OffsetTranslator::new(text.clone(), Granularity::CodeUnit);
        let mut previous = 0;
        for offset in (0..=text.len()).step_by(7) {
            let index = translator.byte_offset_to_char_index(offset);
            assert!(index >= previous);
            previous = index;
        }
        assert_eq!(translator.len(), text.encode_utf16().count());

        // Round trip at a boundary beyond the first checkpoint.
        let byte = "é😀a".len() * 500;
        let index = translator.byte_offset_to_char_index(byte);
        assert_eq!(translator.char_index_to_byte_offset(index), byte);
    }

    #[test]
    fn test_ascii_round_trip_across_checkpoints() {
        let text = "color: red;\n".repeat(CHUNK_SIZE / 4);
        assert!(text.len() > 2 * CHUNK_SIZE);
        for granularity in [Granularity::CodeUnit, Granularity::Grapheme] {
            let translator = OffsetTranslator::new(text.as_str(), granularity);
            for byte in 0..=text.len() {
                let index = translator.byte_offset_to_char_index(byte);
                assert_eq!(index, byte);
                assert_eq!(translator.char_index_to_byte_offset(index), byte);
            }
        }
    }
}
