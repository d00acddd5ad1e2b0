// Manuscript upload: decoding and sectioning

use crate::error::{Result, SectionerError};
use crate::text::{BreakPatterns, SegmentLimits, Section, number_sections, segment_with};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Descriptive fields supplied alongside an uploaded manuscript
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub info: Option<String>,
}

/// A segmented book, shaped the way an upload handler would store it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookUpload {
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Free-form description (if provided)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra notes (if provided)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Break patterns the sections were cut with
    pub break_patterns: Vec<String>,
    /// Sections in reading order
    pub sections: Vec<Section>,
}

impl BookUpload {
    /// Segment already-decoded text into a book.
    pub fn from_text(
        meta: BookMeta,
        text: &str,
        patterns: &BreakPatterns,
        limits: &SegmentLimits,
    ) -> Result<Self> {
        limits.validate()?;

        let sections = number_sections(segment_with(text, patterns, limits));

        Ok(Self {
            title: non_blank(meta.title).unwrap_or_else(|| "Untitled".to_string()),
            author: non_blank(meta.author).unwrap_or_else(|| "Unknown".to_string()),
            description: non_blank(meta.description),
            info: non_blank(meta.info),
            break_patterns: patterns.patterns().to_vec(),
            sections,
        })
    }

    /// Read, decode and segment a manuscript file.
    ///
    /// Falls back to the file stem when no title is given.
    pub fn from_file(
        path: &Path,
        mut meta: BookMeta,
        patterns: &BreakPatterns,
        limits: &SegmentLimits,
    ) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(SectionerError::io(path))?;
        let text = decode_document(&bytes)?;

        if non_blank(meta.title.clone()).is_none() {
            meta.title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }

        let book = Self::from_text(meta, &text, patterns, limits)?;
        info!(
            "Segmented {} into {} sections (~{} words)",
            path.display(),
            book.sections.len(),
            book.total_words()
        );
        Ok(book)
    }

    /// Total word count across all sections
    pub fn total_words(&self) -> usize {
        self.sections.iter().map(|s| s.word_count).sum()
    }
}

/// Decode uploaded bytes into a document.
///
/// Requires UTF-8, drops a leading byte-order mark, and turns CRLF and
/// lone CR line endings into `\n`.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| SectionerError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
