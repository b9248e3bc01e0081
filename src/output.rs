// Result serialization: BIO-labelled columns (`token<TAB>tag<TAB>chunk`)
// and a plain phrase listing.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::phrase::BaseNounPhrase;
use crate::token::{TaggedSentence, Token};

/// Chunk label of one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkTag {
    Begin,
    Inside,
    Outside,
}

impl ChunkTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkTag::Begin => "B",
            ChunkTag::Inside => "I",
            ChunkTag::Outside => "O",
        }
    }
}

/// One output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BioRow<'a> {
    pub token: &'a Token,
    pub chunk: ChunkTag,
}

/// Label tokens sentence by sentence. A phrase starts (`B`) at the token of
/// its own sentence whose start equals its resolved start and continues (`I`) for the rest of
/// its words, never past the end of the sentence. Unresolved phrases are
/// skipped. Rows stop after the last phrase is consumed, so the final
/// sentence may be partial and later sentences absent.
pub fn bio_rows<'a>(sentences: &'a [TaggedSentence], phrases: &[BaseNounPhrase]) -> Vec<Vec<BioRow<'a>>> {
    let mut starts: HashMap<(usize, i64), usize> = HashMap::new();
    for phrase in phrases.iter().filter(|p| p.is_resolved()) {
        starts
            .entry((phrase.sentence_index, phrase.start_offset))
            .or_insert_with(|| phrase.word_count());
    }

    let mut pending = starts.len();
    let mut rows = Vec::new();

    'sentences: for (sentence_index, sentence) in sentences.iter().enumerate() {
        let mut sentence_rows = Vec::with_capacity(sentence.len());
        let mut remaining = 0usize;

        for token in sentence.tokens() {
            if pending == 0 && remaining == 0 {
                if !sentence_rows.is_empty() {
                    rows.push(sentence_rows);
                }
                break 'sentences;
            }

            let chunk = if remaining > 0 {
                remaining -= 1;
                ChunkTag::Inside
            } else if let Some(words) = starts.remove(&(sentence_index, token.start)) {
                pending -= 1;
                remaining = words.saturating_sub(1);
                ChunkTag::Begin
            } else {
                ChunkTag::Outside
            };
            sentence_rows.push(BioRow { token, chunk });
        }

        if !sentence_rows.is_empty() {
            rows.push(sentence_rows);
        }
    }

    debug!("Labelled {} sentences, {} phrases not aligned", rows.len(), pending);
    rows
}

/// Render the BIO rows, one blank line between sentences
pub fn format_bio(sentences: &[TaggedSentence], phrases: &[BaseNounPhrase]) -> String {
    let mut out = String::new();
    for (i, sentence_rows) in bio_rows(sentences, phrases).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for row in sentence_rows {
            out.push_str(&row.token.text);
            out.push('\t');
            out.push_str(&row.token.tag);
            out.push('\t');
            out.push_str(row.chunk.as_str());
            out.push('\n');
        }
    }
    out
}

/// Write the BIO rendering to `path`
pub async fn write_bio(path: &Path, sentences: &[TaggedSentence], phrases: &[BaseNounPhrase]) -> Result<()> {
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let rendered = format_bio(sentences, phrases);
    writer.write_all(rendered.as_bytes()).await?;
    writer.flush().await?;

    info!("Wrote BIO output to {}", path.display());
    Ok(())
}

/// One phrase per line: `start<TAB>end<TAB>head<TAB>surface`
pub fn format_phrases(phrases: &[BaseNounPhrase]) -> String {
    phrases
        .iter()
        .map(|p| format!("{}\t{}\t{}\t{}\n", p.start_offset, p.end_offset, p.head_tag, p.surface_text))
        .collect()
}
