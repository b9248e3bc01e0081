// Free-text adapter: sentence boundaries from the `[.!?]\s+[A-Z]` pattern
// (with closing/opening quotes allowed around the gap), then Penn Treebank
// style tokens. Offsets are char positions in the input text.

use anyhow::{Context, Result};
use regex_automata::{meta::Regex, Input};
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use super::{AbbreviationChecker, RawSentence, RawToken};

static BOUNDARY: OnceLock<Regex> = OnceLock::new();
static TOKEN: OnceLock<Regex> = OnceLock::new();

fn boundary_pattern() -> &'static Regex {
    BOUNDARY.get_or_init(|| {
        Regex::new(r#"[.!?]['"\u{201D}\u{2019})\]]*\s+['"\u{201C}\u{2018}(\[]*[A-Z]"#)
            .expect("sentence boundary pattern is a valid constant regex")
    })
}

fn token_pattern() -> &'static Regex {
    TOKEN.get_or_init(|| {
        Regex::new(r"\w+(?:[-.]\w+)*|'(?i:s|re|ve|ll|d|m)\b|\S").expect("token pattern is a valid constant regex")
    })
}

/// Byte to char position counter, only moves forward
struct CharCounter {
    byte_pos: usize,
    char_pos: i64,
}

impl CharCounter {
    fn new() -> Self {
        Self { byte_pos: 0, char_pos: 0 }
    }

    fn advance_to_byte(&mut self, text_bytes: &[u8], target_byte_pos: usize) -> i64 {
        while self.byte_pos < target_byte_pos && self.byte_pos < text_bytes.len() {
            let byte = text_bytes[self.byte_pos];
            // count only bytes that start a UTF-8 character
            if (byte & 0x80) == 0 || (byte & 0xC0) == 0xC0 {
                self.char_pos += 1;
            }
            self.byte_pos += 1;
        }
        self.char_pos
    }
}

/// Byte ranges of the sentences in `text`
pub fn sentence_ranges(text: &str) -> Vec<Range<usize>> {
    let checker = AbbreviationChecker::new();
    let mut ranges = Vec::new();
    let mut start = 0;

    for found in boundary_pattern().find_iter(text) {
        let matched = &text[found.start()..found.end()];
        let end = found.start() + matched.find(char::is_whitespace).unwrap_or(matched.len());

        if checker.ends_with_title_abbreviation(&text[start..end]) {
            continue;
        }
        ranges.push(start..end);
        start = end;
    }
    if start < text.len() {
        ranges.push(start..text.len());
    }
    ranges
}

fn tokenize_range(
    text: &str,
    range: Range<usize>,
    counter: &mut CharCounter,
    checker: &AbbreviationChecker,
) -> RawSentence {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut push = |start: usize, end: usize, counter: &mut CharCounter| {
        let char_start = counter.advance_to_byte(bytes, start);
        tokens.push(RawToken::new(&text[start..end], char_start));
    };

    let mut pos = range.start;
    while pos < range.end {
        let input = Input::new(text).range(pos..range.end);
        let Some(found) = token_pattern().search(&input) else {
            break;
        };
        let (start, mut end) = (found.start(), found.end());
        let rest = &text[end..range.end];

        // "didn't" -> "did" + "n't"
        let negation = rest.get(..2).is_some_and(|s| s.eq_ignore_ascii_case("'t"));
        if negation && end - start > 1 && text[start..end].ends_with(|c: char| c.eq_ignore_ascii_case(&'n')) {
            push(start, end - 1, counter);
            push(end - 1, end + 2, counter);
            pos = end + 2;
            continue;
        }

        if rest.starts_with('.') && checker.is_abbreviation(&text[start..end + 1]) {
            end += 1;
        }
        push(start, end, counter);
        pos = end;
    }
    tokens
}

/// Split free text into sentences of untagged tokens
pub fn segment_text(text: &str) -> Vec<RawSentence> {
    let checker = AbbreviationChecker::new();
    let mut counter = CharCounter::new();

    let sentences: Vec<RawSentence> = sentence_ranges(text)
        .into_iter()
        .map(|range| tokenize_range(text, range, &mut counter, &checker))
        .filter(|sentence| !sentence.is_empty())
        .collect();

    debug!("Segmented {} bytes into {} sentences", text.len(), sentences.len());
    sentences
}

/// Read a UTF-8 text file and segment it
pub async fn read_text<P: AsRef<Path>>(path: P) -> Result<Vec<RawSentence>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read text file {}", path.display()))?;
    let sentences = segment_text(&content);
    info!("Read {}: {} bytes, {} sentences", path.display(), content.len(), sentences.len());
    Ok(sentences)
}
