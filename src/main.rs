use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use basenp::output::{format_phrases, write_bio};
use basenp::pipeline::{self, PipelineConfig};
use basenp::rules::{RulePaths, DEFAULT_EXTRACTION_RULES, DEFAULT_REJECTION_RULES};
use basenp::tagger::DEFAULT_TAG;
use basenp::InputFormat;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Free text, sentence-split and tokenized
    Text,
    /// One token per line, optional POS tag in the second column
    Conll,
}

impl From<FormatArg> for InputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => InputFormat::Text,
            FormatArg::Conll => InputFormat::Columns,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Parser, Debug)]
#[command(name = "basenp")]
#[command(about = "Rule-driven base noun phrase extractor for POS-tagged text")]
#[command(version)]
struct Args {
    /// Corpus to extract from
    input: PathBuf,

    /// Input layout; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Extraction rule file
    #[arg(long, default_value = DEFAULT_EXTRACTION_RULES)]
    positive_rules: PathBuf,

    /// Rejection rule file
    #[arg(long, default_value = DEFAULT_REJECTION_RULES)]
    rejection_rules: PathBuf,

    /// Tab-separated word/tag lexicon used instead of corpus-supplied tags
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Tag for tokens without one
    #[arg(long, default_value = DEFAULT_TAG)]
    default_tag: String,

    /// Write BIO columns here instead of listing phrases on stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Log line format
    #[arg(long, value_enum, default_value = "json")]
    log_format: LogFormat,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rules: RulePaths {
                extraction: self.positive_rules.clone(),
                rejection: self.rejection_rules.clone(),
            },
            format: self.format.map(InputFormat::from),
            lexicon: self.lexicon.clone(),
            default_tag: self.default_tag.clone(),
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // WHY: JSON by default so runs can be collected by log tooling
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);

    info!("Starting basenp");
    info!(?args, "Parsed CLI arguments");

    // WHY: validate input exists early to fail fast with clear error
    if !args.input.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = args.pipeline_config();
    let extraction = pipeline::run(&config, &args.input).await?;

    match &args.output {
        Some(path) => write_bio(path, &extraction.sentences, &extraction.phrases).await?,
        None => print!("{}", format_phrases(&extraction.phrases)),
    }

    if let Some(stats_path) = &args.stats_out {
        let json = serde_json::to_string_pretty(&extraction.stats)?;
        tokio::fs::write(stats_path, json)
            .await
            .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
        info!("Stats written to {}", stats_path.display());
    }

    let stats = &extraction.stats;
    eprintln!("basenp v{} - extraction complete", env!("CARGO_PKG_VERSION"));
    eprintln!("  Sentences: {}, tokens: {}", stats.sentences, stats.tokens);
    eprintln!("  Candidates: {}, phrases: {}", stats.candidates, stats.phrases);
    if stats.unresolved_phrases > 0 {
        eprintln!("  Unresolved offsets: {}", stats.unresolved_phrases);
    }

    Ok(())
}
