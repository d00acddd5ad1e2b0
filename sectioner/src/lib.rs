//! sectioner - split uploaded manuscripts into word-bounded book sections
//!
//! The core is [`text::segment`], which cuts a document at optional break
//! markers and then at line boundaries so each section lands near a
//! 700-800 word band. The rest wraps it for an upload handler: decoding,
//! section numbering, and configuration.

pub mod config;
pub mod error;
pub mod text;
pub mod upload;

pub use config::{OutputFormat, SectionerConfig};
pub use error::{Result, SectionerError};
pub use text::{
    BreakPatterns, SegmentLimits, Section, number_sections, segment, segment_with, word_count,
};
pub use upload::{BookMeta, BookUpload, decode_document};
