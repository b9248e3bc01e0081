// Columnar (CoNLL-style) corpus reader. First column is the token, an
// optional second column is kept as a supplied POS tag. Offsets run across
// the whole file as if every token were joined by a single space.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::{RawSentence, RawToken};

/// Incremental sentence builder shared by the sync and async readers
#[derive(Debug, Default)]
struct ColumnParser {
    sentences: Vec<RawSentence>,
    current: RawSentence,
    next_start: i64,
    strange_lines: usize,
}

impl ColumnParser {
    fn feed(&mut self, raw_line: &str, line_no: usize) {
        let line = raw_line.trim_end_matches('\r');

        if line.is_empty() || line == "\t\t" {
            self.finish_sentence();
            return;
        }
        if line.contains("\t\t") {
            self.strange_lines += 1;
            warn!(line = line_no, content = line, "strange line in columnar input, skipped");
            return;
        }

        let mut columns: Vec<&str> = if line.contains('\t') {
            line.split('\t').collect()
        } else {
            line.split(' ').collect()
        };
        columns.retain(|c| !c.is_empty());

        let Some(text) = columns.first() else {
            self.strange_lines += 1;
            warn!(line = line_no, "line without a token column, skipped");
            return;
        };

        let mut token = RawToken::new(*text, self.next_start);
        if let Some(tag) = columns.get(1) {
            token = token.with_tag(*tag);
        }
        self.next_start = token.end + 2;
        self.current.push(token);
    }

    fn finish_sentence(&mut self) {
        if !self.current.is_empty() {
            self.sentences.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<RawSentence> {
        // a trailing sentence without a blank line after it still counts
        self.finish_sentence();
        if self.strange_lines > 0 {
            info!("Skipped {} malformed lines", self.strange_lines);
        }
        self.sentences
    }
}

/// Parse columnar content held in memory
pub fn parse_columns(content: &str) -> Vec<RawSentence> {
    let mut parser = ColumnParser::default();
    for (index, line) in content.lines().enumerate() {
        parser.feed(line, index + 1);
    }
    parser.finish()
}

/// Stream a columnar file line by line
pub async fn read_columns<P: AsRef<Path>>(path: P) -> Result<Vec<RawSentence>> {
    let path = path.as_ref();
    debug!("Starting async read of columnar file: {}", path.display());

    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open columnar file {}", path.display()))?;
    let mut lines = BufReader::with_capacity(8192, file).lines();
    let mut parser = ColumnParser::default();
    let mut line_no = 0;

    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("UTF-8 decoding error in {} at line {}", path.display(), line_no + 1))?
    {
        line_no += 1;
        parser.feed(&line, line_no);
    }

    let sentences = parser.finish();
    info!("Read {}: {} lines, {} sentences", path.display(), line_no, sentences.len());
    Ok(sentences)
}
