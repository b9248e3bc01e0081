// Base noun phrase records and the live candidate set

use serde::Serialize;
use std::collections::HashMap;

use crate::offsets::{OffsetResolver, Span};
use crate::tags::strip_tags;
use crate::token::TaggedSentence;

/// Stable identity of a phrase, assigned at creation. Two phrases with the
/// same text are still distinct entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PhraseId(u64);

/// A minimal noun phrase span extracted from one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseNounPhrase {
    id: PhraseId,
    /// Index of the sentence the phrase was found in
    pub sentence_index: usize,
    pub surface_text: String,
    pub surface_text_with_tags: String,
    pub start_offset: i64,
    pub end_offset: i64,
    /// Tag of the last token; empty for sub-phrases produced by splitting
    pub head_tag: String,
}

impl BaseNounPhrase {
    pub fn id(&self) -> PhraseId {
        self.id
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.start_offset,
            end: self.end_offset,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.span().is_resolved()
    }

    /// Number of space-separated words in the surface text
    pub fn word_count(&self) -> usize {
        self.surface_text.split(' ').count()
    }
}

/// Ordered live candidates plus their sentence membership
#[derive(Debug, Clone, Default)]
pub struct PhraseSet {
    phrases: Vec<BaseNounPhrase>,
    membership: HashMap<PhraseId, usize>,
    next_id: u64,
}

impl PhraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a phrase for `with_tags` found in sentence `sentence_index`.
    /// Returns `None` when the text is empty once tags are stripped.
    /// The phrase is not yet part of the live list.
    pub fn mint(
        &mut self,
        with_tags: &str,
        head_tag: &str,
        sentence_index: usize,
        sentence: &TaggedSentence,
        resolver: &mut OffsetResolver,
    ) -> Option<BaseNounPhrase> {
        let surface = strip_tags(with_tags);
        if surface.is_empty() {
            return None;
        }
        let span = resolver.resolve(&surface, sentence);
        let id = PhraseId(self.next_id);
        self.next_id += 1;
        self.membership.insert(id, sentence_index);
        Some(BaseNounPhrase {
            id,
            sentence_index,
            surface_text: surface,
            surface_text_with_tags: with_tags.trim().to_string(),
            start_offset: span.start,
            end_offset: span.end,
            head_tag: head_tag.to_string(),
        })
    }

    pub fn push(&mut self, phrase: BaseNounPhrase) {
        self.phrases.push(phrase);
    }

    /// Sentence a live phrase belongs to
    pub fn sentence_of(&self, id: PhraseId) -> Option<usize> {
        self.membership.get(&id).copied()
    }

    /// Drop `id` from the membership map. The caller removes it from the list.
    pub(crate) fn forget(&mut self, id: PhraseId) {
        self.membership.remove(&id);
    }

    /// Take the live list out for a rewrite pass
    pub(crate) fn take_phrases(&mut self) -> Vec<BaseNounPhrase> {
        std::mem::take(&mut self.phrases)
    }

    /// Install the list produced by a rewrite pass
    pub(crate) fn replace_phrases(&mut self, phrases: Vec<BaseNounPhrase>) {
        self.phrases = phrases;
    }

    pub fn phrases(&self) -> &[BaseNounPhrase] {
        &self.phrases
    }

    pub fn into_phrases(self) -> Vec<BaseNounPhrase> {
        self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Every live phrase has exactly one membership entry and nothing else does
    pub fn is_consistent(&self) -> bool {
        self.phrases.len() == self.membership.len()
            && self.phrases.iter().all(|p| self.membership.contains_key(&p.id))
    }
}
