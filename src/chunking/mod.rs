//! Text chunking for retrieval.
//!
//! Splits cleaned document text into overlapping fixed-size chunks sized for
//! embedding. Boundaries back off to whitespace so words stay intact.

use serde::{Deserialize, Serialize};

/// A chunk of text from a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Character offset of the chunk within its document.
    pub start_offset: usize,
    /// Order of this chunk in the document.
    pub order: i32,
}

/// Fixed-size overlapping character chunker.
#[derive(Debug, Clone)]
pub struct CharacterChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterChunker {
    /// Create a chunker with the given size and overlap (in characters).
    ///
    /// The overlap is clamped below the chunk size so every step makes
    /// forward progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split text into overlapping chunks.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();

        if chars.is_empty() {
            return chunks;
        }

        let mut start = 0usize;
        let mut order = 0i32;

        while start < chars.len() {
            let hard_end = (start + self.chunk_size).min(chars.len());

            // Back off to the nearest whitespace so words are not split,
            // but never give up more than half the window
            let end = if hard_end < chars.len() {
                self.backoff_to_whitespace(&chars, start, hard_end)
            } else {
                hard_end
            };

            let content: String = chars[start..end].iter().collect();
            let content = content.trim().to_string();
            if !content.is_empty() {
                chunks.push(TextChunk {
                    content,
                    start_offset: start,
                    order,
                });
                order += 1;
            }

            if end >= chars.len() {
                break;
            }

            // Step forward, re-covering the overlap region
            start = (end.saturating_sub(self.chunk_overlap)).max(start + 1);
        }

        chunks
    }

    /// Find a whitespace boundary at or before `hard_end`.
    fn backoff_to_whitespace(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let floor = start + self.chunk_size / 2;
        let mut end = hard_end;
        while end > floor && !chars[end - 1].is_whitespace() {
            end -= 1;
        }
        if end > floor {
            end
        } else {
            hard_end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = CharacterChunker::new(1000, 200);
        let chunks = chunker.chunk("a short lesson about gravity");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "a short lesson about gravity");
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn test_chunks_overlap() {
        let chunker = CharacterChunker::new(100, 20);
        let word = "lorem ";
        let text = word.repeat(100); // 600 chars

        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);

        // Consecutive chunks share their overlap region
        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset < pair[0].start_offset + 100);
            assert!(pair[1].start_offset > pair[0].start_offset);
        }

        // Orders are sequential
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order, i as i32);
        }
    }

    #[test]
    fn test_words_are_not_split() {
        let words = ["photosynthesis", "respiration", "mitochondria", "chloroplast", "ribosome"];
        let text = words.join(" ").repeat(3).replace("ribosomephotosynthesis", "ribosome photosynthesis");

        let chunker = CharacterChunker::new(50, 10);
        for chunk in chunker.chunk(&text) {
            let last_word = chunk.content.split_whitespace().last().unwrap();
            assert!(words.contains(&last_word), "split word: {last_word}");
        }
    }

    #[test]
    fn test_empty_text() {
        let chunker = CharacterChunker::new(1000, 200);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   ").is_empty());
    }

    #[test]
    fn test_degenerate_overlap_makes_progress() {
        // Overlap larger than size must not loop forever
        let chunker = CharacterChunker::new(10, 50);
        let text = "abcdefghij".repeat(10);
        let chunks = chunker.chunk(&text);
        assert!(!chunks.is_empty());
    }
}
