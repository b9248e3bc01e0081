// Tagged token model shared by every stage of the pipeline

/// One tagged token. Offsets are char positions in the source document,
/// `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: String,
    pub start: i64,
    pub end: i64,
}

impl Token {
    /// Build a token starting at `start`; `end` follows from the text length
    pub fn new(text: impl Into<String>, tag: impl Into<String>, start: i64) -> Self {
        let text = text.into();
        let end = start + text.chars().count() as i64 - 1;
        Self {
            text,
            tag: tag.into(),
            start,
            end,
        }
    }
}

/// Ordered tokens of one sentence, in original word order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaggedSentence {
    tokens: Vec<Token>,
}

impl TaggedSentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Matchable form: `text/TAG` tokens joined by single spaces
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.tokens.iter().map(|t| t.text.len() + t.tag.len() + 2).sum());
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                rendered.push(' ');
            }
            rendered.push_str(&token.text);
            rendered.push('/');
            rendered.push_str(&token.tag);
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_end_is_inclusive() {
        let token = Token::new("cat", "NN", 0);
        assert_eq!(token.end, 2);

        // char count, not byte count
        let token = Token::new("café", "NN", 10);
        assert_eq!(token.end, 13);
    }

    #[test]
    fn test_render_joins_with_single_spaces() {
        let sentence = TaggedSentence::new(vec![
            Token::new("cat", "NN", 0),
            Token::new("ran", "VBD", 4),
        ]);
        assert_eq!(sentence.render(), "cat/NN ran/VBD");
        assert_eq!(TaggedSentence::default().render(), "");
    }
}
