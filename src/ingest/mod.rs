// Input adapters: turn free text or columnar corpora into untagged token
// sequences with document-global char offsets.

use std::path::Path;

pub mod abbreviations;
pub mod columns;
pub mod text;

pub use abbreviations::AbbreviationChecker;
pub use columns::{parse_columns, read_columns};
pub use text::{read_text, segment_text};

/// A token before tagging. `supplied_tag` carries a tag already present in
/// the input (second column of a columnar corpus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub start: i64,
    pub end: i64,
    pub supplied_tag: Option<String>,
}

impl RawToken {
    pub fn new(text: impl Into<String>, start: i64) -> Self {
        let text = text.into();
        let end = start + text.chars().count() as i64 - 1;
        Self {
            text,
            start,
            end,
            supplied_tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.supplied_tag = Some(tag.into());
        self
    }
}

pub type RawSentence = Vec<RawToken>;

/// Supported corpus layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Free text, sentence-split and tokenized here
    Text,
    /// One token per line, blank line between sentences
    Columns,
}

impl InputFormat {
    /// `.conll`, `.conllx`, `.pos`, `.tsv` are columnar, everything else is text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if matches!(ext.as_str(), "conll" | "conllx" | "pos" | "tsv") => InputFormat::Columns,
            _ => InputFormat::Text,
        }
    }
}
