//! Caller-supplied break markers compiled into one splitting regex.

use crate::error::{Result, SectionerError};
use regex::Regex;

/// An ordered set of break patterns.
///
/// Entries are trimmed and blank entries are dropped before anything is
/// compiled, so an empty marker can never produce a pattern that matches
/// every position.
#[derive(Debug, Clone, Default)]
pub struct BreakPatterns {
    patterns: Vec<String>,
    regex: Option<Regex>,
}

impl BreakPatterns {
    /// No break patterns: the whole document is one block.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from regex fragments.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = sanitize(patterns);

        // Compile each fragment alone first so errors name the culprit.
        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| SectionerError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        if patterns.is_empty() {
            return Ok(Self::none());
        }

        let alternation = patterns
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&alternation).map_err(|source| SectionerError::InvalidPattern {
            pattern: alternation.clone(),
            source,
        })?;

        Ok(Self {
            patterns,
            regex: Some(regex),
        })
    }

    /// Build from plain markers, matched verbatim.
    pub fn literal<S: AsRef<str>>(markers: &[S]) -> Result<Self> {
        let escaped: Vec<String> = sanitize(markers)
            .iter()
            .map(|m| regex::escape(m))
            .collect();
        Self::new(&escaped)
    }

    /// Build from a comma-separated list such as `"CHAPTER,PART"`.
    pub fn from_comma_list(list: &str, literal: bool) -> Result<Self> {
        let parts: Vec<&str> = list.split(',').collect();
        if literal {
            Self::literal(&parts)
        } else {
            Self::new(&parts)
        }
    }

    /// The sanitized patterns, in the order given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Split `text` into coarse blocks.
    ///
    /// Matched markers are kept as blocks of their own, between the text
    /// before and after them. Zero-length matches never split.
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let Some(regex) = &self.regex else {
            return vec![text];
        };

        let mut blocks = Vec::new();
        let mut last = 0;

        for m in regex.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            blocks.push(&text[last..m.start()]);
            blocks.push(m.as_str());
            last = m.end();
        }
        blocks.push(&text[last..]);

        blocks
    }
}

fn sanitize<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
