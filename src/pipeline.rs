// Orchestration: ingest -> tag -> extract -> refine, with run statistics.
// Rules are compiled once per extractor and reused for every input.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::extractor::extract_candidates;
use crate::ingest::{read_columns, read_text, segment_text, InputFormat, RawSentence};
use crate::offsets::OffsetResolver;
use crate::phrase::BaseNounPhrase;
use crate::refiner::{refine_candidates, GroupReport};
use crate::rules::{RulePaths, RuleSet};
use crate::tagger::{tag_sentences, ColumnTagger, LexiconTagger, PosTagger, DEFAULT_TAG};
use crate::token::TaggedSentence;

/// Settings for one command-line run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub rules: RulePaths,
    /// `None` infers the layout from the input extension
    pub format: Option<InputFormat>,
    pub lexicon: Option<PathBuf>,
    pub default_tag: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: RulePaths::default(),
            format: None,
            lexicon: None,
            default_tag: DEFAULT_TAG.to_string(),
        }
    }
}

/// Counters and timings of one extraction
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub sentences: usize,
    pub tokens: usize,
    /// Phrases produced by the extraction pattern, before rejection
    pub candidates: usize,
    /// Phrases left after every rejection group
    pub phrases: usize,
    /// Final phrases that carry `-1` offsets
    pub unresolved_phrases: usize,
    /// Every failed resolution, including phrases later replaced
    pub offset_failures: usize,
    pub rejection_groups: Vec<GroupReport>,
    pub extraction_time_ms: u64,
    pub refinement_time_ms: u64,
}

/// Sentences the phrases were found in, the final phrases in sentence and
/// scan order, and what it took to get there
#[derive(Debug, Clone)]
pub struct Extraction {
    pub sentences: Vec<TaggedSentence>,
    pub phrases: Vec<BaseNounPhrase>,
    pub stats: RunStats,
}

/// The extraction engine, holding compiled rules
#[derive(Debug, Clone)]
pub struct BaseNounPhraseExtractor {
    rules: RuleSet,
}

impl BaseNounPhraseExtractor {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Load and compile the two rule files
    pub async fn from_rule_files(paths: &RulePaths) -> Result<Self, ExtractError> {
        Ok(Self::new(RuleSet::load(paths).await?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run extraction and refinement over already tagged sentences
    pub fn extract_tagged(&self, sentences: Vec<TaggedSentence>) -> Extraction {
        let mut resolver = OffsetResolver::new();

        let extraction_start = Instant::now();
        let mut set = extract_candidates(&sentences, &self.rules.extraction, &mut resolver);
        let extraction_time = extraction_start.elapsed();
        let candidates = set.len();

        let refinement_start = Instant::now();
        let rejection_groups = refine_candidates(&mut set, &sentences, &self.rules.rejection, &mut resolver);
        let refinement_time = refinement_start.elapsed();

        let phrases = set.into_phrases();
        let stats = RunStats {
            sentences: sentences.len(),
            tokens: sentences.iter().map(TaggedSentence::len).sum(),
            candidates,
            phrases: phrases.len(),
            unresolved_phrases: phrases.iter().filter(|p| !p.is_resolved()).count(),
            offset_failures: resolver.failures(),
            rejection_groups,
            extraction_time_ms: extraction_time.as_millis() as u64,
            refinement_time_ms: refinement_time.as_millis() as u64,
        };

        if stats.unresolved_phrases > 0 {
            warn!("{} phrases kept with unresolved offsets", stats.unresolved_phrases);
        }
        info!(
            sentences = stats.sentences,
            candidates = stats.candidates,
            phrases = stats.phrases,
            "Extraction complete"
        );

        Extraction {
            sentences,
            phrases,
            stats,
        }
    }

    /// Tag raw sentences with `tagger`, then extract
    pub fn extract_raw<T: PosTagger + ?Sized>(
        &self,
        tagger: &T,
        sentences: &[RawSentence],
    ) -> Result<Extraction, ExtractError> {
        let tagged = tag_sentences(tagger, sentences)?;
        Ok(self.extract_tagged(tagged))
    }

    /// Segment, tag and extract free text held in memory
    pub fn extract_from_text<T: PosTagger + ?Sized>(&self, text: &str, tagger: &T) -> Result<Extraction, ExtractError> {
        self.extract_raw(tagger, &segment_text(text))
    }

    /// Read a corpus file in the given layout, tag it and extract
    pub async fn extract_from_file<T: PosTagger + ?Sized>(
        &self,
        input: &Path,
        format: InputFormat,
        tagger: &T,
    ) -> Result<Extraction> {
        let raw = match format {
            InputFormat::Columns => read_columns(input).await?,
            InputFormat::Text => read_text(input).await?,
        };
        let extraction = self
            .extract_raw(tagger, &raw)
            .with_context(|| format!("Extraction failed for {}", input.display()))?;
        Ok(extraction)
    }
}

/// Pick the tagger for a run: a lexicon when one is configured, otherwise
/// the tags supplied by the corpus
pub async fn build_tagger(config: &PipelineConfig, format: InputFormat) -> Result<Box<dyn PosTagger + Send + Sync>> {
    match &config.lexicon {
        Some(path) => Ok(Box::new(LexiconTagger::load(path, &config.default_tag).await?)),
        None => {
            if format == InputFormat::Text {
                warn!(
                    default_tag = %config.default_tag,
                    "free text without a lexicon, every token gets the default tag"
                );
            }
            Ok(Box::new(ColumnTagger::new(config.default_tag.clone())))
        }
    }
}

/// Full run for one input file. Rules are loaded before the corpus is read,
/// so a broken rule file fails the run before any extraction starts.
pub async fn run(config: &PipelineConfig, input: &Path) -> Result<Extraction> {
    let extractor = BaseNounPhraseExtractor::from_rule_files(&config.rules)
        .await
        .context("Failed to prepare extraction rules")?;
    let format = config.format.unwrap_or_else(|| InputFormat::from_path(input));
    let tagger = build_tagger(config, format).await?;

    info!(input = %input.display(), ?format, "Starting extraction");
    extractor.extract_from_file(input, format, tagger.as_ref()).await
}
