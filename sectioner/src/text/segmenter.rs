//! Word-bounded segmentation of a manuscript into book sections.

use super::patterns::BreakPatterns;
use super::word_count;
use crate::error::{Result, SectionerError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Default upper bound on words per section.
pub const DEFAULT_MAX_WORDS: usize = 800;

/// Default word count above which a running section is flushed as-is.
pub const DEFAULT_FLUSH_FLOOR: usize = 700;

/// Default word count a trailing remainder needs to stand alone.
pub const DEFAULT_MIN_TAIL_WORDS: usize = 300;

/// Word-count envelope for sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentLimits {
    /// Blocks up to this many words are kept whole
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// When a line would overflow, a running section above this size is
    /// flushed without it; otherwise the line is absorbed before flushing
    #[serde(default = "default_flush_floor")]
    pub flush_floor: usize,

    /// A trailing remainder at or below this size is merged into the
    /// previous section
    #[serde(default = "default_min_tail_words")]
    pub min_tail_words: usize,
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

fn default_flush_floor() -> usize {
    DEFAULT_FLUSH_FLOOR
}

fn default_min_tail_words() -> usize {
    DEFAULT_MIN_TAIL_WORDS
}

impl Default for SegmentLimits {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            flush_floor: default_flush_floor(),
            min_tail_words: default_min_tail_words(),
        }
    }
}

impl SegmentLimits {
    /// Check that the limits describe a usable envelope.
    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(SectionerError::InvalidLimits(
                "max_words must be greater than zero".to_string(),
            ));
        }
        if self.flush_floor > self.max_words {
            return Err(SectionerError::InvalidLimits(format!(
                "flush_floor ({}) must not exceed max_words ({})",
                self.flush_floor, self.max_words
            )));
        }
        if self.min_tail_words > self.max_words {
            return Err(SectionerError::InvalidLimits(format!(
                "min_tail_words ({}) must not exceed max_words ({})",
                self.min_tail_words, self.max_words
            )));
        }
        Ok(())
    }
}

/// Split `text` into sections using the default limits.
///
/// # Arguments
/// * `text` - The full document
/// * `break_patterns` - Regex fragments for the coarse split; blank entries are ignored
///
/// # Returns
/// Trimmed, non-empty sections in document order. An empty or blank
/// document yields no sections. Fails only if a pattern is not valid regex.
pub fn segment<S: AsRef<str>>(text: &str, break_patterns: &[S]) -> Result<Vec<String>> {
    let patterns = BreakPatterns::new(break_patterns)?;
    Ok(segment_with(text, &patterns, &SegmentLimits::default()))
}

/// Split `text` into sections with pre-compiled patterns and explicit limits.
pub fn segment_with(text: &str, patterns: &BreakPatterns, limits: &SegmentLimits) -> Vec<String> {
    let mut sections = Vec::new();

    for block in patterns.split(text) {
        let words = word_count(block);

        if words == 0 {
            continue;
        }

        if words <= limits.max_words {
            sections.push(block.trim().to_string());
        } else {
            let parts = split_block(block, limits);
            debug!("Split {}-word block into {} sections", words, parts.len());
            sections.extend(parts);
        }
    }

    debug!(
        "Segmented {} words into {} sections",
        word_count(text),
        sections.len()
    );

    sections
}

/// Split an oversized block at line boundaries.
fn split_block(block: &str, limits: &SegmentLimits) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut current_words = 0;

    for line in block.lines() {
        let line_words = word_count(line);

        if current_words + line_words <= limits.max_words {
            current.push_str(line);
            current.push('\n');
            current_words += line_words;
        } else if current_words > limits.flush_floor {
            sections.push(current.trim().to_string());
            current = format!("{}\n", line);
            current_words = line_words;
        } else {
            // Absorb the line; this section may exceed max_words by one line.
            current.push_str(line);
            sections.push(current.trim().to_string());
            current.clear();
            current_words = 0;
        }
    }

    let tail = current.trim();
    if tail.is_empty() {
        return sections;
    }

    if current_words > limits.min_tail_words {
        sections.push(tail.to_string());
    } else if let Some(last) = sections.last_mut() {
        last.push('\n');
        last.push_str(tail);
    } else {
        warn!(
            "No section to absorb a {}-word remainder, keeping it standalone",
            current_words
        );
        sections.push(tail.to_string());
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn one_word_lines(n: usize) -> String {
        words(n, "w").join("\n")
    }

    const NO_BREAKS: &[&str] = &[];

    #[test]
    fn test_segment_short_text() {
        let text = "  Hello world.\nHow are you?  ";
        let sections = segment(text, NO_BREAKS).unwrap();
        assert_eq!(sections, vec!["Hello world.\nHow are you?"]);
    }

    #[test]
    fn test_segment_empty_text() {
        assert!(segment("", NO_BREAKS).unwrap().is_empty());
    }

    #[test]
    fn test_segment_whitespace_only() {
        assert!(segment("   \n\n   ", NO_BREAKS).unwrap().is_empty());
    }

    #[test]
    fn test_segment_exactly_max_words_is_one_section() {
        let text = words(800, "w").join(" ");
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0], text);
    }

    #[test]
    fn test_segment_break_patterns_keep_markers() {
        let sections = segment("intro CHAPTER one CHAPTER two", &["CHAPTER"]).unwrap();
        assert_eq!(sections, vec!["intro", "CHAPTER", "one", "CHAPTER", "two"]);
    }

    #[test]
    fn test_segment_leading_marker_leaves_no_empty_section() {
        let sections = segment("CHAPTER one", &["CHAPTER"]).unwrap();
        assert_eq!(sections, vec!["CHAPTER", "one"]);
    }

    #[test]
    fn test_segment_empty_pattern_is_ignored() {
        let sections = segment("one two three", &["", "  "]).unwrap();
        assert_eq!(sections, vec!["one two three"]);
    }

    #[test]
    fn test_segment_invalid_pattern() {
        let result = segment("text", &["[oops"]);
        assert!(matches!(result, Err(SectionerError::InvalidPattern { .. })));
    }

    #[test]
    fn test_801_one_word_lines() {
        // The walk flushes at 800 words; the one-word remainder is too
        // small to stand alone and joins that section.
        let sections = segment(&one_word_lines(801), NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(word_count(&sections[0]), 801);
        assert!(sections[0].ends_with("w799\nw800"));
    }

    #[test]
    fn test_oversized_block_splits_into_two() {
        let sections = segment(&one_word_lines(1101), NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(word_count(&sections[0]), 800);
        assert_eq!(word_count(&sections[1]), 301);
    }

    #[test]
    fn test_tail_of_250_is_merged() {
        let sections = segment(&one_word_lines(1050), NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(word_count(&sections[0]), 1050);
        assert!(sections[0].starts_with("w0\n"));
        assert!(sections[0].ends_with("\nw1049"));
    }

    #[test]
    fn test_tail_of_350_stands_alone() {
        let sections = segment(&one_word_lines(1150), NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(word_count(&sections[0]), 800);
        assert_eq!(word_count(&sections[1]), 350);
        assert!(sections[1].starts_with("w800\n"));
    }

    #[test]
    fn test_overflowing_line_absorbed_below_flush_floor() {
        // 600 words, then a 300-word line: 600 is not above 700, so the line
        // joins and the section flushes at 900 words.
        let text = format!(
            "{}\n{}\n{}",
            words(600, "a").join(" "),
            words(300, "b").join(" "),
            words(400, "c").join(" ")
        );
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(word_count(&sections[0]), 900);
        assert_eq!(word_count(&sections[1]), 400);
    }

    #[test]
    fn test_overflowing_line_starts_new_section_above_flush_floor() {
        let text = format!(
            "{}\n{}\n{}",
            words(750, "a").join(" "),
            words(100, "b").join(" "),
            words(300, "c").join(" ")
        );
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(word_count(&sections[0]), 750);
        // 100 + 300 = 400 words remain, enough to stand alone.
        assert_eq!(word_count(&sections[1]), 400);
        assert!(sections[1].starts_with("b0"));
    }

    #[test]
    fn test_single_long_line_terminates() {
        let text = words(2000, "w").join(" ");
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections, vec![text]);
    }

    #[test]
    fn test_blank_lines_carry_no_words() {
        let text = format!("{}\n\n\n{}", one_word_lines(800), one_word_lines(400));
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(word_count(&sections[0]), 800);
        assert_eq!(word_count(&sections[1]), 400);
    }

    #[test]
    fn test_crlf_lines() {
        let text = one_word_lines(1150).replace('\n', "\r\n");
        let sections = segment(&text, NO_BREAKS).unwrap();
        assert_eq!(sections.len(), 2);
        assert!(!sections[0].contains('\r'));
    }

    #[test]
    fn test_each_block_is_split_independently() {
        let text = format!("{}\nPART\n{}", one_word_lines(1050), one_word_lines(200));
        let sections = segment(&text, &["PART"]).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(word_count(&sections[0]), 1050);
        assert_eq!(sections[1], "PART");
        assert_eq!(word_count(&sections[2]), 200);
    }

    #[test]
    fn test_split_block_orphan_tail_stands_alone() {
        let limits = SegmentLimits {
            max_words: 5,
            flush_floor: 3,
            min_tail_words: 5,
        };
        // Nothing was flushed before the tail, so it cannot be merged.
        let sections = split_block("a b\nc", &limits);
        assert_eq!(sections, vec!["a b\nc"]);
    }

    #[test]
    fn test_custom_limits() {
        let limits = SegmentLimits {
            max_words: 4,
            flush_floor: 3,
            min_tail_words: 1,
        };
        let text = "a b\nc d\ne f\ng h\ni j";
        let sections = segment_with(text, &BreakPatterns::none(), &limits);
        assert_eq!(sections, vec!["a b\nc d", "e f\ng h", "i j"]);
    }

    #[test]
    fn test_limits_validate() {
        assert!(SegmentLimits::default().validate().is_ok());

        let zero = SegmentLimits {
            max_words: 0,
            ..SegmentLimits::default()
        };
        assert!(zero.validate().is_err());

        let floor = SegmentLimits {
            flush_floor: 900,
            ..SegmentLimits::default()
        };
        assert!(floor.validate().is_err());

        let tail = SegmentLimits {
            min_tail_words: 801,
            ..SegmentLimits::default()
        };
        assert!(tail.validate().is_err());
    }
}
