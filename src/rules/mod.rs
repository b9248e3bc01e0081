// Rule compilation: turns the two rule documents into the artifacts the
// extractor and refiner run on. Everything here happens once per run.

use std::path::{Path, PathBuf};
use tracing::info;

pub mod extraction;
pub mod rejection;

pub use extraction::{compile_extraction, CompiledPattern, RuleDefinition};
pub use rejection::{compile_rejection, EdgePolicy, RejectionRuleGroup, RejectionTemplate};

use crate::error::ExtractError;

/// Default rule file names, looked up relative to the working directory
pub const DEFAULT_EXTRACTION_RULES: &str = "positiveRules.txt";
pub const DEFAULT_REJECTION_RULES: &str = "rejectionRules.txt";

/// Locations of the two rule documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePaths {
    pub extraction: PathBuf,
    pub rejection: PathBuf,
}

impl Default for RulePaths {
    fn default() -> Self {
        Self {
            extraction: PathBuf::from(DEFAULT_EXTRACTION_RULES),
            rejection: PathBuf::from(DEFAULT_REJECTION_RULES),
        }
    }
}

/// Compiled extraction pattern plus ordered rejection groups
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub extraction: CompiledPattern,
    pub rejection: Vec<RejectionRuleGroup>,
}

impl RuleSet {
    /// Compile both documents held in memory
    pub fn compile(extraction_doc: &str, rejection_doc: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            extraction: compile_extraction(extraction_doc)?,
            rejection: compile_rejection(rejection_doc)?,
        })
    }

    /// Read and compile both rule files. Nothing is compiled unless both
    /// files could be read.
    pub async fn load(paths: &RulePaths) -> Result<Self, ExtractError> {
        let extraction_doc = read_rule_file(&paths.extraction).await?;
        let rejection_doc = read_rule_file(&paths.rejection).await?;
        let rules = Self::compile(&extraction_doc, &rejection_doc)?;
        info!(
            extraction = %paths.extraction.display(),
            rejection = %paths.rejection.display(),
            "Rule files compiled"
        );
        Ok(rules)
    }
}

async fn read_rule_file(path: &Path) -> Result<String, ExtractError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ExtractError::rule_load(path, e))
}

/// Escape every `$` not already preceded by an odd run of backslashes.
/// With `keep_trailing_anchor`, a final unescaped `$` is left as an anchor.
pub(crate) fn escape_unescaped_dollars(text: &str, keep_trailing_anchor: bool) -> String {
    let mut escaped = String::with_capacity(text.len() + 4);
    let mut backslashes = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        match ch {
            '\\' => {
                backslashes += 1;
                escaped.push(ch);
                continue;
            }
            '$' if backslashes % 2 == 0 => {
                let is_last = chars.peek().is_none();
                if !(is_last && keep_trailing_anchor) {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
        backslashes = 0;
    }
    escaped
}
