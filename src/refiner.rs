// Rejection refinement: every rejection group in file order rewrites the
// candidate list. A group pass reads the current list and builds a new one;
// a matched candidate is replaced in place by the pieces of its split.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::offsets::OffsetResolver;
use crate::phrase::PhraseSet;
use crate::rules::{EdgePolicy, RejectionRuleGroup, RejectionTemplate};
use crate::tags::strip_tags;
use crate::token::TaggedSentence;

/// What one group pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub delimiter: String,
    /// Candidates removed by this group
    pub rejected: usize,
    /// Sub-phrases minted in their place
    pub produced: usize,
}

/// Apply every rejection group to `set`, in order
pub fn refine_candidates(
    set: &mut PhraseSet,
    sentences: &[TaggedSentence],
    groups: &[RejectionRuleGroup],
    resolver: &mut OffsetResolver,
) -> Vec<GroupReport> {
    info!("Applying {} rejection rule groups to {} candidates", groups.len(), set.len());

    // sentences never change, render them once for every group
    let rendered: Vec<String> = sentences.iter().map(TaggedSentence::render).collect();

    let reports: Vec<GroupReport> = groups
        .iter()
        .map(|group| apply_group(set, sentences, &rendered, group, resolver))
        .collect();

    info!("Rejection rules left {} phrases", set.len());
    reports
}

/// One pass of `group` over the whole candidate list
pub fn apply_group(
    set: &mut PhraseSet,
    sentences: &[TaggedSentence],
    rendered: &[String],
    group: &RejectionRuleGroup,
    resolver: &mut OffsetResolver,
) -> GroupReport {
    let candidates = set.take_phrases();
    let mut output = Vec::with_capacity(candidates.len());
    let mut report = GroupReport {
        delimiter: group.delimiter.clone(),
        rejected: 0,
        produced: 0,
    };

    let mut current_sentence = None;

    for candidate in candidates {
        let Some(sentence_index) = set.sentence_of(candidate.id()) else {
            debug!(phrase = %candidate.surface_text, "candidate has no sentence, skipped");
            output.push(candidate);
            continue;
        };
        if current_sentence != Some(sentence_index) {
            resolver.reset();
            current_sentence = Some(sentence_index);
        }

        let pieces = split_to_fixed_point(group, &candidate.surface_text_with_tags, &rendered[sentence_index]);
        let Some(pieces) = pieces else {
            if candidate.is_resolved() {
                resolver.advance_to(candidate.start_offset);
            }
            output.push(candidate);
            continue;
        };

        // replacements resolve inside the span of the candidate they replace
        if candidate.is_resolved() {
            resolver.advance_to(candidate.start_offset - 1);
        }
        set.forget(candidate.id());
        report.rejected += 1;

        for piece in &pieces {
            if let Some(phrase) = set.mint(piece, "", sentence_index, &sentences[sentence_index], resolver) {
                debug!(from = %candidate.surface_text, to = %phrase.surface_text, "split candidate");
                output.push(phrase);
                report.produced += 1;
            }
        }
    }

    set.replace_phrases(output);
    info!(
        delimiter = %group.delimiter,
        rejected = report.rejected,
        produced = report.produced,
        "Rejection group applied"
    );
    report
}

/// Split `text` with `group` and keep splitting the pieces until the group no
/// longer matches any of them. `None` when the group leaves `text` unchanged.
pub fn split_to_fixed_point(group: &RejectionRuleGroup, text: &str, sentence: &str) -> Option<Vec<String>> {
    let pieces = split_once(group, text, sentence)?;
    let mut settled = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match split_to_fixed_point(group, &piece, sentence) {
            Some(sub_pieces) => settled.extend(sub_pieces),
            None => settled.push(piece),
        }
    }
    Some(settled)
}

/// One split at the first delimiter occurrence, if a template of the group
/// matches. Pieces that are empty once tags are stripped are dropped.
pub fn split_once(group: &RejectionRuleGroup, text: &str, sentence: &str) -> Option<Vec<String>> {
    let (part_one, part_two) = text.split_once(group.delimiter.as_str())?;

    let template = group
        .patterns
        .iter()
        .find(|template| template_matches(template, text, part_one, part_two, sentence))?;
    debug!(line = template.line(), pattern = template.source(), phrase = text, "rejection pattern matched");

    let delimiter = group.delimiter.as_str();
    let (left, right) = match group.edge_policy {
        EdgePolicy::KeepLeft => (format!("{part_one}{delimiter}"), part_two.to_string()),
        EdgePolicy::KeepRight => (part_one.to_string(), format!("{delimiter}{part_two}")),
        EdgePolicy::None => (part_one.to_string(), part_two.to_string()),
    };

    let pieces: Vec<String> = [left, right]
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !strip_tags(piece).is_empty())
        .collect();

    // the delimiter sat on the phrase edge that keeps it, nothing changes
    if pieces.len() == 1 && pieces[0] == text {
        return None;
    }
    Some(pieces)
}

fn template_matches(template: &RejectionTemplate, phrase: &str, part_one: &str, part_two: &str, sentence: &str) -> bool {
    let regex = match template.compile_for(phrase, part_one, part_two) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(line = template.line(), error = %e, "rendered rejection pattern does not compile");
            return false;
        }
    };
    match regex.is_match(sentence) {
        Ok(found) => found,
        Err(e) => {
            warn!(line = template.line(), error = %e, "rejection pattern match failed");
            false
        }
    }
}
