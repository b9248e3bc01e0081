// Locates the span of a derived phrase inside its sentence. Resolution is
// monotonic: a phrase may only start after the last resolved start, so a
// repeated word is never mistaken for an earlier phrase's start.

use tracing::warn;

use crate::token::TaggedSentence;

/// Offset value marking an unresolved phrase boundary
pub const UNRESOLVED: i64 = -1;

/// Resolved `(start, end)` pair, `end` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub const UNRESOLVED: Span = Span {
        start: UNRESOLVED,
        end: UNRESOLVED,
    };

    pub fn is_resolved(&self) -> bool {
        self.start >= 0 && self.end >= 0
    }
}

/// Explicit "last resolved start" state, reset before each sentence
#[derive(Debug, Clone)]
pub struct OffsetResolver {
    last_start: i64,
    failures: usize,
}

impl Default for OffsetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetResolver {
    pub fn new() -> Self {
        Self {
            last_start: UNRESOLVED,
            failures: 0,
        }
    }

    /// Back to the sentence-start sentinel; failure count is kept
    pub fn reset(&mut self) {
        self.last_start = UNRESOLVED;
    }

    pub fn last_start(&self) -> i64 {
        self.last_start
    }

    /// Number of phrases that could not be located since creation
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Move the state forward to `start` without resolving anything.
    /// Never moves backwards.
    pub fn advance_to(&mut self, start: i64) {
        self.last_start = self.last_start.max(start);
    }

    /// Resolve `surface` (tags already stripped) inside `sentence`
    pub fn resolve(&mut self, surface: &str, sentence: &TaggedSentence) -> Span {
        let first_word = surface.split(' ').next().unwrap_or_default();
        let found = sentence
            .tokens()
            .iter()
            .find(|token| token.text == first_word && token.start > self.last_start);

        match found {
            Some(token) => {
                let start = token.start;
                self.last_start = start;
                Span {
                    start,
                    end: start + surface.chars().count() as i64 - 1,
                }
            }
            None => {
                self.failures += 1;
                warn!(
                    phrase = surface,
                    last_start = self.last_start,
                    "offset resolution failed, keeping phrase with unresolved offsets"
                );
                Span::UNRESOLVED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn sentence(words: &[(&str, &str)]) -> TaggedSentence {
        let mut start = 0;
        let mut tokens = Vec::new();
        for (text, tag) in words {
            let token = Token::new(*text, *tag, start);
            start = token.end + 2;
            tokens.push(token);
        }
        TaggedSentence::new(tokens)
    }

    #[test]
    fn test_resolves_first_word_position() {
        let s = sentence(&[("cat", "NN"), ("ran", "VB")]);
        let mut resolver = OffsetResolver::new();
        assert_eq!(resolver.resolve("cat", &s), Span { start: 0, end: 2 });
        assert_eq!(resolver.last_start(), 0);
    }

    #[test]
    fn test_repeated_word_resolves_forward() {
        let s = sentence(&[("bank", "NN"), ("by", "IN"), ("the", "DT"), ("bank", "NN")]);
        let mut resolver = OffsetResolver::new();
        let first = resolver.resolve("bank", &s);
        let second = resolver.resolve("bank", &s);
        assert_eq!(first.start, 0);
        assert_eq!(second.start, 12);
        assert!(second.start > first.end);
    }

    #[test]
    fn test_unresolvable_phrase_gets_sentinel() {
        let s = sentence(&[("cat", "NN")]);
        let mut resolver = OffsetResolver::new();
        resolver.resolve("cat", &s);
        let span = resolver.resolve("cat", &s);
        assert_eq!(span, Span::UNRESOLVED);
        assert!(!span.is_resolved());
        assert_eq!(resolver.failures(), 1);
        // a failure leaves the state untouched
        assert_eq!(resolver.last_start(), 0);
    }

    #[test]
    fn test_reset_and_advance() {
        let s = sentence(&[("a", "DT"), ("dog", "NN"), ("a", "DT"), ("cat", "NN")]);
        let mut resolver = OffsetResolver::new();
        resolver.advance_to(3);
        assert_eq!(resolver.resolve("a cat", &s), Span { start: 6, end: 10 });

        resolver.advance_to(0);
        assert_eq!(resolver.last_start(), 6);

        resolver.reset();
        assert_eq!(resolver.resolve("a dog", &s).start, 0);
    }
}
