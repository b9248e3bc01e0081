pub mod error;
pub mod extractor;
pub mod ingest;
pub mod offsets;
pub mod output;
pub mod phrase;
pub mod pipeline;
pub mod refiner;
pub mod rules;
pub mod tagger;
pub mod tags;
pub mod token;

// Re-export main types for convenient access
pub use error::ExtractError;
pub use phrase::{BaseNounPhrase, PhraseId, PhraseSet};
pub use token::{TaggedSentence, Token};

// Re-export the engine and its configuration
pub use pipeline::{BaseNounPhraseExtractor, Extraction, PipelineConfig, RunStats};
pub use rules::{CompiledPattern, EdgePolicy, RejectionRuleGroup, RulePaths, RuleSet};

// Re-export collaborators used by the binary and benchmarks
pub use ingest::{InputFormat, RawSentence, RawToken};
pub use output::{format_bio, write_bio};
pub use tagger::{ColumnTagger, LexiconTagger, PosTagger};
