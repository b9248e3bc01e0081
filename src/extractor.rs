// Candidate extraction: scan each rendered sentence for non-overlapping
// matches of the compiled extraction pattern.

use tracing::{debug, info, warn};

use crate::offsets::OffsetResolver;
use crate::phrase::PhraseSet;
use crate::rules::CompiledPattern;
use crate::tags::head_tag;
use crate::token::TaggedSentence;

/// Extract candidate phrases from every sentence, in sentence then scan order.
/// The resolver is reset before each sentence, so token offsets may be
/// document-global or restart at 0 per sentence.
pub fn extract_candidates(
    sentences: &[TaggedSentence],
    pattern: &CompiledPattern,
    resolver: &mut OffsetResolver,
) -> PhraseSet {
    info!("Applying extraction rules to {} sentences", sentences.len());
    let mut set = PhraseSet::new();
    let mut discarded = 0usize;

    for (sentence_index, sentence) in sentences.iter().enumerate() {
        resolver.reset();
        let rendered = sentence.render();

        for found in pattern.regex().find_iter(&rendered) {
            let matched = match found {
                Ok(m) => m.as_str(),
                Err(e) => {
                    warn!(sentence = sentence_index, error = %e, "extraction scan aborted for sentence");
                    break;
                }
            };

            let tag = head_tag(matched).unwrap_or_default();
            match set.mint(matched, tag, sentence_index, sentence, resolver) {
                Some(phrase) => {
                    debug!(sentence = sentence_index, phrase = %phrase.surface_text, head = tag, "candidate");
                    set.push(phrase);
                }
                None => discarded += 1,
            }
        }
    }

    info!(
        "Extracted {} candidate phrases ({} tag-only matches discarded)",
        set.len(),
        discarded
    );
    set
}
