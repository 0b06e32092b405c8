//! Text cleanup for ingested documents.
//!
//! Source documents carry formatting artifacts (line breaks, parenthesized
//! asides) and embedded metadata fields (`source:`, `focus_area:`). Cleaning
//! normalizes the text for embedding and pulls the metadata out.

use regex::Regex;

/// Metadata fields embedded in a document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Attribution line (`source: ...`), empty when absent.
    pub source: String,
    /// Topic tag (`focus_area: ...`), empty when absent.
    pub focus_area: String,
}

/// Cleans and normalizes raw document text.
pub struct TextCleaner {
    parenthetical: Regex,
    source_field: Regex,
    focus_area_field: Regex,
}

impl TextCleaner {
    pub fn new() -> Self {
        Self {
            parenthetical: Regex::new(r"\(.*?\)").expect("Invalid regex"),
            source_field: Regex::new(r"source:\s*(.*)").expect("Invalid regex"),
            focus_area_field: Regex::new(r"focus_area:\s*(.*)").expect("Invalid regex"),
        }
    }

    /// Clean a page of raw text.
    ///
    /// Collapses whitespace, removes parenthesized asides, extracts and strips
    /// the metadata fields, then strips punctuation and lowercases. Returns
    /// the cleaned text and whatever metadata was found.
    pub fn clean(&self, raw: &str) -> (String, PageMetadata) {
        // Collapse all whitespace runs into single spaces
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        // Drop parenthesized asides
        let text = self.parenthetical.replace_all(&text, "").into_owned();

        // Metadata fields run to the end of the collapsed text, so pull the
        // trailing field out first
        let mut metadata = PageMetadata::default();
        let text = match self.focus_area_field.captures(&text) {
            Some(caps) => {
                metadata.focus_area = caps[1].trim().to_string();
                self.focus_area_field.replace(&text, "").into_owned()
            }
            None => text,
        };
        let text = match self.source_field.captures(&text) {
            Some(caps) => {
                metadata.source = caps[1].trim().to_string();
                self.source_field.replace(&text, "").into_owned()
            }
            None => text,
        };

        // Strip punctuation and lowercase
        let text: String = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_lowercase();

        // Removals can leave double spaces behind
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        (text, metadata)
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        let cleaner = TextCleaner::new();
        let (text, _) = cleaner.clean("  The Mitochondria\n\n  is   the Powerhouse  ");
        assert_eq!(text, "the mitochondria is the powerhouse");
    }

    #[test]
    fn test_removes_parentheticals_and_punctuation() {
        let cleaner = TextCleaner::new();
        let (text, _) = cleaner.clean("Water (H2O) boils, at 100 degrees!");
        assert_eq!(text, "water boils at 100 degrees");
    }

    #[test]
    fn test_extracts_metadata_fields() {
        let cleaner = TextCleaner::new();
        let (text, meta) =
            cleaner.clean("Gravity pulls objects down.\nsource: physics primer\nfocus_area: mechanics");
        assert_eq!(meta.source, "physics primer");
        assert_eq!(meta.focus_area, "mechanics");
        assert_eq!(text, "gravity pulls objects down");
    }

    #[test]
    fn test_missing_metadata_is_empty() {
        let cleaner = TextCleaner::new();
        let (_, meta) = cleaner.clean("No fields here.");
        assert_eq!(meta, PageMetadata::default());
    }

    #[test]
    fn test_empty_input() {
        let cleaner = TextCleaner::new();
        let (text, meta) = cleaner.clean("");
        assert!(text.is_empty());
        assert!(meta.source.is_empty());
    }
}
