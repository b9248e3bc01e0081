// Error taxonomy for the extraction run. Every variant here is fatal to the
// run it occurs in; unresolved offsets are reported through tracing instead.

use std::fmt;
use std::path::PathBuf;

/// Fatal failure of an extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A rule file is missing or unreadable
    RuleLoad { path: PathBuf, reason: String },
    /// A rule line violates the rule-file grammar or does not compile
    MalformedRule { line: usize, reason: String },
    /// A `;@name@;` placeholder names a rule that is never defined
    MissingRuleReference { rule: String, reference: String },
    /// The tagger returned a different number of tags than it was given tokens
    TaggingContract { sentence: usize, tokens: usize, tags: usize },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::RuleLoad { path, reason } => {
                write!(f, "failed to load rule file {}: {}", path.display(), reason)
            }
            ExtractError::MalformedRule { line, reason } => {
                write!(f, "malformed rule at line {}: {}", line, reason)
            }
            ExtractError::MissingRuleReference { rule, reference } => {
                write!(f, "rule '{}' references undefined rule '{}'", rule, reference)
            }
            ExtractError::TaggingContract { sentence, tokens, tags } => write!(
                f,
                "tagger returned {} tags for {} tokens in sentence {}",
                tags, tokens, sentence
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

impl ExtractError {
    pub(crate) fn rule_load(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ExtractError::RuleLoad {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ExtractError::MalformedRule {
            line,
            reason: reason.into(),
        }
    }
}
