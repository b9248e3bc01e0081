// Extraction rule document: `name;;body` definitions in priority order,
// bodies may reference other rules with `;@name@;`.

use fancy_regex::Regex;
use regex_automata::meta::Regex as PlaceholderRegex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use super::escape_unescaped_dollars;
use crate::error::ExtractError;

static PLACEHOLDER: OnceLock<PlaceholderRegex> = OnceLock::new();

fn placeholder_pattern() -> &'static PlaceholderRegex {
    PLACEHOLDER.get_or_init(|| PlaceholderRegex::new(r";@\S+?@;").expect("placeholder pattern is a valid constant regex"))
}

/// One `name;;body` definition as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    pub name: String,
    pub body: String,
    /// 1-based line number in the source document
    pub line: usize,
}

/// Pattern of a document without rules: a word boundary that is also a
/// non-boundary
const NEVER_MATCHES: &str = r"(\b\B)";

/// The combined extraction pattern, built once per rule document
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    rule_count: usize,
}

impl CompiledPattern {
    /// Full alternation source, one parenthesized group per rule
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }
}

/// Parse definition lines; comments and blank lines are skipped
pub fn parse_definitions(document: &str) -> Result<Vec<RuleDefinition>, ExtractError> {
    let mut definitions: Vec<RuleDefinition> = Vec::new();

    for (index, raw_line) in document.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        let line_no = index + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, body) = line
            .split_once(";;")
            .ok_or_else(|| ExtractError::malformed(line_no, "expected 'name;;pattern'"))?;

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ExtractError::malformed(
                line_no,
                format!("invalid rule name '{}'", name),
            ));
        }

        if definitions.iter().any(|d| d.name == name) {
            warn!(rule = name, line = line_no, "rule redefined, later definition wins for references");
        }

        definitions.push(RuleDefinition {
            name: name.to_string(),
            body: body.to_string(),
            line: line_no,
        });
    }

    Ok(definitions)
}

/// Expands placeholders with memoized depth-first substitution. The result
/// equals repeated textual substitution run to its fixed point.
struct Resolver<'a> {
    definitions: &'a [RuleDefinition],
    by_name: HashMap<&'a str, usize>,
    resolved: HashMap<&'a str, String>,
    in_progress: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    fn new(definitions: &'a [RuleDefinition]) -> Self {
        let mut by_name = HashMap::new();
        for (i, definition) in definitions.iter().enumerate() {
            by_name.insert(definition.name.as_str(), i);
        }
        Self {
            definitions,
            by_name,
            resolved: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    fn resolve_name(&mut self, name: &'a str, owner: &str) -> Result<String, ExtractError> {
        if let Some(body) = self.resolved.get(name) {
            return Ok(body.clone());
        }
        let index = *self.by_name.get(name).ok_or_else(|| ExtractError::MissingRuleReference {
            rule: owner.to_string(),
            reference: name.to_string(),
        })?;
        let definition = &self.definitions[index];

        if self.in_progress.contains(&name) {
            return Err(ExtractError::malformed(
                definition.line,
                format!("rule '{}' references itself through '{}'", name, owner),
            ));
        }

        self.in_progress.push(name);
        let expanded = self.expand(&definition.body, &definition.name);
        self.in_progress.pop();

        let expanded = expanded?;
        self.resolved.insert(name, expanded.clone());
        Ok(expanded)
    }

    fn expand(&mut self, body: &'a str, owner: &'a str) -> Result<String, ExtractError> {
        let mut output = String::with_capacity(body.len());
        let mut last = 0;
        for placeholder in placeholder_pattern().find_iter(body) {
            let name = &body[placeholder.start() + 2..placeholder.end() - 2];
            output.push_str(&body[last..placeholder.start()]);
            output.push_str(&self.resolve_name(name, owner)?);
            last = placeholder.end();
        }
        output.push_str(&body[last..]);
        Ok(output)
    }
}

/// Resolve every placeholder and return the fully expanded bodies in
/// priority order
pub fn resolve_bodies(definitions: &[RuleDefinition]) -> Result<Vec<String>, ExtractError> {
    let mut resolver = Resolver::new(definitions);
    definitions
        .iter()
        .map(|definition| resolver.expand(&definition.body, &definition.name))
        .collect()
}

/// Compile an extraction document into the combined alternation pattern
pub fn compile_extraction(document: &str) -> Result<CompiledPattern, ExtractError> {
    let definitions = parse_definitions(document)?;
    if definitions.is_empty() {
        warn!("extraction document defines no rules, nothing will be extracted");
        return Ok(CompiledPattern {
            source: NEVER_MATCHES.to_string(),
            regex: Regex::new(NEVER_MATCHES)
                .map_err(|e| ExtractError::malformed(0, format!("empty pattern does not compile: {}", e)))?,
            rule_count: 0,
        });
    }

    let bodies = resolve_bodies(&definitions)?;
    let mut groups = Vec::with_capacity(bodies.len());

    for (definition, body) in definitions.iter().zip(bodies) {
        let group = format!("({})", escape_unescaped_dollars(&body, false));
        // compile each alternative on its own so a bad rule is reported by line
        if let Err(e) = Regex::new(&group) {
            return Err(ExtractError::malformed(
                definition.line,
                format!("rule '{}' does not compile: {}", definition.name, e),
            ));
        }
        debug!(rule = %definition.name, pattern = %group, "expanded extraction rule");
        groups.push(group);
    }

    let source = format!("({})", groups.join("|"));
    let regex = Regex::new(&source)
        .map_err(|e| ExtractError::malformed(0, format!("combined pattern does not compile: {}", e)))?;

    info!("Compiled {} extraction rules into one pattern", groups.len());
    Ok(CompiledPattern {
        source,
        regex,
        rule_count: groups.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rule_is_parenthesized() {
        let pattern = compile_extraction("NP;;\\w+/NN").unwrap();
        assert_eq!(pattern.as_str(), "((\\w+/NN))");
        assert_eq!(pattern.rule_count(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let doc = "# determiners\n\nDET;;\\w+/DT\n# nouns\nNP;;;@DET@; \\w+/NN\n";
        let definitions = parse_definitions(doc).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[1].name, "NP");
        assert_eq!(definitions[1].line, 5);
    }

    #[test]
    fn test_placeholders_resolve_in_priority_order() {
        let doc = "NP;;;@DET@; ;@ADJ@;*\\w+/NN\nDET;;\\w+/DT\nADJ;;(?:\\w+/JJ )";
        let pattern = compile_extraction(doc).unwrap();
        assert_eq!(
            pattern.as_str(),
            "((\\w+/DT (?:\\w+/JJ )*\\w+/NN)|(\\w+/DT)|((?:\\w+/JJ )))"
        );
    }

    #[test]
    fn test_nested_placeholders_reach_fixed_point() {
        let doc = "A;;;@B@;x\nB;;;@C@;y\nC;;z";
        let bodies = resolve_bodies(&parse_definitions(doc).unwrap()).unwrap();
        assert_eq!(bodies, vec!["zyx", "zy", "z"]);
    }

    #[test]
    fn test_missing_reference_is_reported() {
        let err = compile_extraction("NP;;;@ghost@; \\w+/NN").unwrap_err();
        assert_eq!(
            err,
            ExtractError::MissingRuleReference {
                rule: "NP".to_string(),
                reference: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_cyclic_reference_is_malformed() {
        let err = compile_extraction("A;;;@B@;\nB;;;@A@;").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedRule { .. }));
    }

    #[test]
    fn test_line_without_separator_is_malformed() {
        let err = compile_extraction("NP;;\\w+/NN\nthis is not a rule").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedRule { line: 2, .. }));
    }

    #[test]
    fn test_invalid_body_reports_its_line() {
        let err = compile_extraction("NP;;\\w+/NN\nBAD;;(unclosed").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedRule { line: 2, .. }));
    }

    #[test]
    fn test_dollar_in_tag_is_literal() {
        let pattern = compile_extraction("POSS;;\\w+/PRP$ \\w+/NN").unwrap();
        assert_eq!(pattern.as_str(), "((\\w+/PRP\\$ \\w+/NN))");
        assert!(pattern.regex().is_match("his/PRP$ dog/NN").unwrap());
    }

    #[test]
    fn test_document_without_rules_matches_nothing() {
        let pattern = compile_extraction("# only comments\n").unwrap();
        assert_eq!(pattern.rule_count(), 0);
        assert!(!pattern.regex().is_match("the/DT dog/NN").unwrap());
        assert!(!pattern.regex().is_match("").unwrap());
    }
}
