// Abbreviation lookup for free-text segmentation: keeps "Dr." as one token
// and stops a title from ending a sentence before the name it precedes.

use std::collections::HashSet;

/// Titles that precede proper nouns, "Dr. Smith", "Mr. Johnson"
pub const TITLE_ABBREVIATIONS: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St."];

/// Abbreviations kept together with their period when tokenizing
pub const ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.",
    "Inc.", "Corp.", "Co.", "Ltd.", "Bros.",
    "Jan.", "Feb.", "Mar.", "Apr.", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.",
    "ft.", "lbs.", "oz.", "mi.", "km.", "etc.", "vs.", "No.",
];

/// Set-backed abbreviation checks
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
    title_abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
            title_abbreviations: TITLE_ABBREVIATIONS.iter().copied().collect(),
        }
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    pub fn is_title_abbreviation(&self, word: &str) -> bool {
        self.title_abbreviations.contains(word)
    }

    /// Check whether the last word of `text` is a title abbreviation,
    /// ignoring surrounding quotes
    pub fn ends_with_title_abbreviation(&self, text: &str) -> bool {
        text.split_whitespace().last().is_some_and(|last_word| {
            let clean_word = last_word.trim_matches(|c: char| {
                matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '(')
            });
            self.is_title_abbreviation(clean_word)
        })
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
