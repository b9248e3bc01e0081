// POS tagging seam. The core only needs one tag per token in order; the
// taggers here are deterministic lookups, not statistical models.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::ingest::{RawSentence, RawToken};
use crate::token::{TaggedSentence, Token};

/// Tag used when nothing better is known
pub const DEFAULT_TAG: &str = "NN";

/// Black-box tagger: returns exactly one tag per token, in token order
pub trait PosTagger {
    fn tag(&self, sentence: &[RawToken]) -> Vec<String>;
}

/// Uses the tag supplied by the corpus (second column), else a fallback
#[derive(Debug, Clone)]
pub struct ColumnTagger {
    default_tag: String,
}

impl ColumnTagger {
    pub fn new(default_tag: impl Into<String>) -> Self {
        Self {
            default_tag: default_tag.into(),
        }
    }
}

impl Default for ColumnTagger {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl PosTagger for ColumnTagger {
    fn tag(&self, sentence: &[RawToken]) -> Vec<String> {
        sentence
            .iter()
            .map(|token| token.supplied_tag.clone().unwrap_or_else(|| self.default_tag.clone()))
            .collect()
    }
}

/// Word -> tag dictionary with a few closed-class fallbacks
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    entries: HashMap<String, String>,
    default_tag: String,
}

impl LexiconTagger {
    pub fn new(default_tag: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            default_tag: default_tag.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `word<TAB>tag` lines; `#` lines and blank lines are skipped.
    /// The first entry for a word wins.
    pub fn parse(content: &str, default_tag: impl Into<String>) -> Self {
        let mut tagger = Self::new(default_tag);
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('\t') {
                Some((word, tag)) if !word.is_empty() && !tag.trim().is_empty() => {
                    tagger
                        .entries
                        .entry(word.to_string())
                        .or_insert_with(|| tag.trim().to_string());
                }
                _ => warn!(line = index + 1, content = line, "lexicon line without word<TAB>tag, skipped"),
            }
        }
        tagger
    }

    /// Read a lexicon file
    pub async fn load<P: AsRef<Path>>(path: P, default_tag: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read lexicon {}", path.display()))?;

        let tagger = Self::parse(&content, default_tag);
        info!("Loaded lexicon {}: {} entries", path.display(), tagger.len());
        Ok(tagger)
    }

    /// Tag for a single word: exact entry, lowercase entry, number,
    /// punctuation, then the default
    pub fn lookup(&self, word: &str) -> String {
        if let Some(tag) = self.entries.get(word) {
            return tag.clone();
        }
        if let Some(tag) = self.entries.get(&word.to_lowercase()) {
            return tag.clone();
        }
        if is_number(word) {
            return "CD".to_string();
        }
        if let Some(tag) = punctuation_tag(word) {
            return tag.to_string();
        }
        self.default_tag.clone()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, sentence: &[RawToken]) -> Vec<String> {
        sentence.iter().map(|token| self.lookup(&token.text)).collect()
    }
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit()) && word.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
}

fn punctuation_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "..." => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "\u{201C}" | "``" => "``",
        "\u{201D}" | "''" => "''",
        "$" => "$",
        "#" => "#",
        _ => return None,
    };
    Some(tag)
}

/// Tag every sentence and build the token model. A tagger that returns the
/// wrong number of tags aborts the run.
pub fn tag_sentences<T: PosTagger + ?Sized>(
    tagger: &T,
    sentences: &[RawSentence],
) -> Result<Vec<TaggedSentence>, ExtractError> {
    let mut tagged = Vec::with_capacity(sentences.len());

    for (index, sentence) in sentences.iter().enumerate() {
        let tags = tagger.tag(sentence);
        if tags.len() != sentence.len() {
            return Err(ExtractError::TaggingContract {
                sentence: index,
                tokens: sentence.len(),
                tags: tags.len(),
            });
        }

        let tokens = sentence
            .iter()
            .zip(tags)
            .map(|(raw, tag)| Token::new(raw.text.clone(), tag, raw.start))
            .collect();
        tagged.push(TaggedSentence::new(tokens));
    }

    debug!("Tagged {} sentences", tagged.len());
    Ok(tagged)
}
