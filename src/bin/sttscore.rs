use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use sttscore::{
    load_text, run_metrics, Identity, Lowercase, Normalizer, OutputDialect, ScoringConfig,
    ScoringError, SectionedWriter, SourceKind,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sttscore")]
#[command(about = "Score a speech-to-text hypothesis against a reference transcript")]
struct Args {
    /// Reference transcript: a file path, or the text itself with `--reference-type argument`.
    reference: String,
    /// Hypothesis transcript: a file path, or the text itself with `--hypothesis-type argument`.
    hypothesis: String,
    #[arg(
        long = "reference-type",
        visible_alias = "rt",
        env = "STTSCORE_REFERENCE_TYPE",
        default_value = "infer",
        value_parser = parse_source_kind
    )]
    reference_type: SourceKind,
    #[arg(
        long = "hypothesis-type",
        visible_alias = "ht",
        env = "STTSCORE_HYPOTHESIS_TYPE",
        default_value = "infer",
        value_parser = parse_source_kind
    )]
    hypothesis_type: SourceKind,
    /// plain, restructuredtext, markdown or json. Overrides the config file.
    #[arg(short = 'o', long, env = "STTSCORE_OUTPUT_FORMAT", value_parser = parse_output_dialect)]
    output_format: Option<OutputDialect>,
    /// Metric to compute, as `name[:arg,...]` (e.g. `wer:weighted`). Repeatable.
    #[arg(short = 'm', long = "metric")]
    metrics: Vec<String>,
    /// Lowercase both inputs before segmenting.
    #[arg(long, env = "STTSCORE_LOWERCASE")]
    lowercase: bool,
    /// JSON scoring config; command-line flags take precedence.
    #[arg(long, env = "STTSCORE_CONFIG")]
    config: Option<PathBuf>,
}

fn parse_source_kind(value: &str) -> Result<SourceKind, ScoringError> {
    value.parse()
}

fn parse_output_dialect(value: &str) -> Result<OutputDialect, ScoringError> {
    value.parse()
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("sttscore: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sttscore=warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), ScoringError> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    config.validate()?;
    let selections = config.metric_selections()?;

    let reference = load_text(&args.reference, args.reference_type)?;
    let hypothesis = load_text(&args.hypothesis, args.hypothesis_type)?;
    let normalizer: &dyn Normalizer = if config.lowercase {
        &Lowercase
    } else {
        &Identity
    };
    tracing::debug!(
        output_format = %config.output_format,
        metrics = selections.len(),
        lowercase = config.lowercase,
        "scoring"
    );

    let stdout = io::stdout();
    let mut writer = SectionedWriter::new(BufWriter::new(stdout.lock()), config.output_format);
    run_metrics(&reference, &hypothesis, &selections, normalizer, &mut writer)
}

fn resolve_config(args: &Args) -> Result<ScoringConfig, ScoringError> {
    let mut config = match &args.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(format) = args.output_format {
        config.output_format = format;
    }
    if !args.metrics.is_empty() {
        config.metrics = args.metrics.clone();
    }
    config.lowercase |= args.lowercase;
    Ok(config)
}
