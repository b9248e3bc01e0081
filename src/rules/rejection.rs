// Rejection rule document: `∞delimiter∞;policy;` headers, each followed by
// the pattern templates of its group. Templates reference the candidate
// through `;@phrase@;`, `;@phrasepartone@;` and `;@phraseparttwo@;`, which
// are filled in at match time.

use fancy_regex::Regex;
use tracing::{debug, info, warn};

use super::escape_unescaped_dollars;
use crate::error::ExtractError;

const HEADER_MARKER: char = '∞';
const PHRASE: &str = ";@phrase@;";
const PART_ONE: &str = ";@phrasepartone@;";
const PART_TWO: &str = ";@phraseparttwo@;";

/// Which split piece gets the delimiter back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    None,
    KeepLeft,
    KeepRight,
}

impl EdgePolicy {
    /// `keepleft`, `keepright`, anything else is `None`
    pub fn parse(value: &str) -> Self {
        match value {
            "keepleft" => EdgePolicy::KeepLeft,
            "keepright" => EdgePolicy::KeepRight,
            _ => EdgePolicy::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Phrase,
    PartOne,
    PartTwo,
}

/// A rejection pattern split into literal text and phrase placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionTemplate {
    source: String,
    segments: Vec<Segment>,
    line: usize,
}

impl RejectionTemplate {
    /// Parse a template line. Unescaped `$` in literal text is escaped, except
    /// a final `$` which anchors the pattern at the end of the sentence.
    pub fn parse(source: &str, line: usize) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(at) = rest.find(";@") {
            let tail = &rest[at..];
            let found = [(PHRASE, Segment::Phrase), (PART_ONE, Segment::PartOne), (PART_TWO, Segment::PartTwo)]
                .into_iter()
                .find(|(token, _)| tail.starts_with(token));
            match found {
                Some((token, segment)) => {
                    if at > 0 {
                        segments.push(Segment::Literal(rest[..at].to_string()));
                    }
                    segments.push(segment);
                    rest = &tail[token.len()..];
                }
                None => {
                    // not a phrase placeholder, keep it as literal text
                    segments.push(Segment::Literal(rest[..at + 2].to_string()));
                    rest = &tail[2..];
                }
            }
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter_mut().enumerate() {
            if let Segment::Literal(text) = segment {
                *text = escape_unescaped_dollars(text, i == last);
            }
        }

        Self {
            source: source.to_string(),
            segments,
            line,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Fill in the placeholders; phrase text is regex-escaped
    pub fn render(&self, phrase: &str, part_one: &str, part_two: &str) -> String {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Phrase => rendered.push_str(&fancy_regex::escape(phrase)),
                Segment::PartOne => rendered.push_str(&fancy_regex::escape(part_one)),
                Segment::PartTwo => rendered.push_str(&fancy_regex::escape(part_two)),
            }
        }
        rendered
    }

    /// Render and compile for one candidate
    pub fn compile_for(&self, phrase: &str, part_one: &str, part_two: &str) -> Result<Regex, fancy_regex::Error> {
        Regex::new(&self.render(phrase, part_one, part_two))
    }
}

/// Templates sharing one delimiter and edge policy, tried in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionRuleGroup {
    pub delimiter: String,
    pub edge_policy: EdgePolicy,
    pub patterns: Vec<RejectionTemplate>,
    /// Line of the group header
    pub line: usize,
}

/// Parse a `∞delimiter∞;policy;` header line
fn parse_header(line: &str, line_no: usize) -> Result<RejectionRuleGroup, ExtractError> {
    let inner = line
        .strip_prefix(HEADER_MARKER)
        .ok_or_else(|| ExtractError::malformed(line_no, "group header must start with '∞'"))?;
    let close = inner
        .rfind(HEADER_MARKER)
        .ok_or_else(|| ExtractError::malformed(line_no, "group header is missing its closing '∞'"))?;

    let delimiter = &inner[..close];
    if delimiter.is_empty() {
        return Err(ExtractError::malformed(line_no, "group header has an empty delimiter"));
    }

    let policy = inner[close + HEADER_MARKER.len_utf8()..]
        .strip_prefix(';')
        .and_then(|rest| rest.strip_suffix(';'))
        .ok_or_else(|| ExtractError::malformed(line_no, "group header must end with ';policy;'"))?;

    Ok(RejectionRuleGroup {
        delimiter: delimiter.to_string(),
        edge_policy: EdgePolicy::parse(policy),
        patterns: Vec::new(),
        line: line_no,
    })
}

/// Parse and validate a rejection document into groups in file order
pub fn compile_rejection(document: &str) -> Result<Vec<RejectionRuleGroup>, ExtractError> {
    let mut groups: Vec<RejectionRuleGroup> = Vec::new();

    for (index, raw_line) in document.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        let line_no = index + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with(HEADER_MARKER) {
            groups.push(parse_header(line.trim_end(), line_no)?);
            continue;
        }

        let Some(group) = groups.last_mut() else {
            warn!(line = line_no, "rejection pattern before any group header, ignored");
            continue;
        };

        let template = RejectionTemplate::parse(line, line_no);
        if let Err(e) = template.compile_for("", "", "") {
            return Err(ExtractError::malformed(
                line_no,
                format!("rejection pattern does not compile: {}", e),
            ));
        }
        group.patterns.push(template);
    }

    for group in &groups {
        debug!(
            delimiter = %group.delimiter,
            policy = ?group.edge_policy,
            patterns = group.patterns.len(),
            "rejection group"
        );
    }
    info!("Loaded {} rejection rule groups", groups.len());
    Ok(groups)
}
