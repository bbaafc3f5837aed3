//! Text cleanup shared by the workbook loader and the output comparison

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Trim and collapse every internal whitespace run to a single space.
///
/// Used for column names and identifiers so that inconsistent sheet
/// authoring ("TC  ID", " Input ") still resolves to the same key.
pub fn clean_key(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize text for comparison: unify line endings, trim, compose (NFC).
pub fn normalize(s: &str) -> String {
    let unified = s.replace("\r\n", "\n").replace('\r', "\n");
    // NFC can't introduce or remove surrounding whitespace, so trimming first keeps this idempotent
    unified.trim().nfc().collect()
}

/// An inclusive Unicode code point range identifying the output script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBlock {
    pub start: char,
    pub end: char,
}

impl ScriptBlock {
    pub const SINHALA: ScriptBlock = ScriptBlock {
        start: '\u{0D80}',
        end: '\u{0DFF}',
    };

    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&c)
    }

    /// True when at least one char of `s` falls inside the block
    pub fn matches(&self, s: &str) -> bool {
        s.chars().any(|c| self.contains(c))
    }
}

impl Default for ScriptBlock {
    fn default() -> Self {
        Self::SINHALA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("TC ID", "TC ID" ; "already clean")]
    #[test_case("  TC   ID ", "TC ID" ; "padded and doubled")]
    #[test_case("Expected\toutput", "Expected output" ; "tab")]
    #[test_case("Input\nlength  type", "Input length type" ; "newline in header")]
    #[test_case("   ", "" ; "blank")]
    fn test_clean_key(raw: &str, expected: &str) {
        assert_eq!(clean_key(raw), expected);
    }

    #[test]
    fn test_normalize_line_endings_and_trim() {
        assert_eq!(normalize("  මම\r\nගෙදර  \n"), "මම\nගෙදර");
        assert_eq!(normalize("a\rb"), "a\nb");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_composes() {
        // e + combining acute accent composes to a single code point
        assert_eq!(normalize("e\u{0301}"), "\u{00E9}");
        // Sinhala kombuva + al-lakuna composes under NFC
        assert_eq!(normalize("\u{0DD9}\u{0DCA}"), "\u{0DDA}");
    }

    #[test]
    fn test_script_block() {
        let block = ScriptBlock::SINHALA;
        assert!(block.matches("mama මම"));
        assert!(!block.matches("mama"));
        assert!(!block.matches(""));
        assert!(block.contains('\u{0D80}'));
        assert!(block.contains('\u{0DFF}'));
        assert!(!block.contains('\u{0E00}'));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_with_line_endings(s in "[ \\r\\na-z\u{0D80}-\u{0DFF}\u{0301}]{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert!(!once.contains('\r'));
        }
    }
}
