// Recognition of `/TAG` suffixes in the rendered `text/TAG` form.
// A tag is 1-4 chars from `A-Z , $ # €`, introduced by a `/` that is not
// itself preceded by `/`, `)` or `\`, and it must end at whitespace or at
// the end of the text.

use regex_automata::meta::Regex;
use std::sync::OnceLock;

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"/[A-Z,$#€]{1,4}").expect("tag pattern is a valid constant regex"))
}

/// Byte ranges (slash included) of every tag suffix in `text`
pub fn tag_spans(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    tag_pattern().find_iter(text).filter_map(move |m| {
        let preceded_ok = !matches!(text[..m.start()].chars().next_back(), Some('/' | ')' | '\\'));
        let followed_ok = text[m.end()..].chars().next().map_or(true, char::is_whitespace);
        (preceded_ok && followed_ok).then(|| (m.start(), m.end()))
    })
}

/// Tag of the last tagged token in `text`, if any
pub fn head_tag(text: &str) -> Option<&str> {
    tag_spans(text).last().map(|(start, end)| &text[start + 1..end])
}

/// Remove every tag suffix and trim the result
pub fn strip_tags(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in tag_spans(text) {
        stripped.push_str(&text[last..start]);
        last = end;
    }
    stripped.push_str(&text[last..]);
    stripped.trim().to_string()
}
