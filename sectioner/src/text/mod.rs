//! Text segmentation: break patterns, word counting, and section numbering.

pub mod patterns;
pub mod segmenter;

use serde::{Deserialize, Serialize};

pub use patterns::BreakPatterns;
pub use segmenter::{SegmentLimits, segment, segment_with};

/// Count whitespace-delimited words. Blank text has zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A numbered section of a book, ready to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position within the book
    pub section_number: usize,
    /// The trimmed section text
    pub content: String,
    /// Number of words in `content`
    pub word_count: usize,
}

impl Section {
    /// Create a new section, counting its words.
    pub fn new(section_number: usize, content: String) -> Self {
        let word_count = word_count(&content);
        Self {
            section_number,
            content,
            word_count,
        }
    }
}

/// Assign 1-based section numbers to segmenter output, keeping its order.
pub fn number_sections(chunks: Vec<String>) -> Vec<Section> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, content)| Section::new(index + 1, content))
        .collect()
}
