use std::fmt;
use std::str::FromStr;

use crate::alignment::Algorithm;
use crate::config::canonical_name;
use crate::error::ScoringError;
use crate::types::{MetricResult, Unit};

pub mod diff_counts;
pub mod diffs;
pub mod error_rate;

pub use diff_counts::DiffCounts;
pub use diffs::{DiffDialect, RenderedDiff};
pub use error_rate::{ErrorRate, ErrorRateMode, Penalties};

/// A comparison of a hypothesis sequence against a reference sequence.
///
/// Implementations hold configuration only; `compare` is pure.
pub trait Metric: Send + Sync {
    fn compare(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<MetricResult, ScoringError>;
}

/// Which segmentation a metric expects its input sequences to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Word,
    Sentence,
}

/// Every metric the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Wer,
    Ser,
    DiffCounts,
    SentenceDiffCounts,
    WordDiffs,
    SentenceDiffs,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Wer,
        MetricKind::Ser,
        MetricKind::DiffCounts,
        MetricKind::SentenceDiffCounts,
        MetricKind::WordDiffs,
        MetricKind::SentenceDiffs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Wer => "wer",
            Self::Ser => "ser",
            Self::DiffCounts => "diffcounts",
            Self::SentenceDiffCounts => "sentencediffcounts",
            Self::WordDiffs => "worddiffs",
            Self::SentenceDiffs => "sentencediffs",
        }
    }

    pub fn granularity(self) -> Granularity {
        match self {
            Self::Wer | Self::DiffCounts | Self::WordDiffs => Granularity::Word,
            Self::Ser | Self::SentenceDiffCounts | Self::SentenceDiffs => Granularity::Sentence,
        }
    }

    /// Upper bound on positional arguments accepted by the metric.
    fn max_args(self) -> usize {
        match self {
            Self::Wer | Self::Ser | Self::WordDiffs | Self::SentenceDiffs => 2,
            Self::DiffCounts | Self::SentenceDiffCounts => 1,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = canonical_name(value);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                ScoringError::configuration(format!(
                    "unknown metric '{value}' (expected one of: {})",
                    Self::ALL.map(MetricKind::name).join(", ")
                ))
            })
    }
}

/// A metric name plus its positional arguments, e.g. `wer:weighted` or
/// `worddiffs:html,ratcliffobershelp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection {
    pub kind: MetricKind,
    pub args: Vec<String>,
}

impl MetricSelection {
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            args: Vec::new(),
        }
    }

    pub fn with_args<S: Into<String>>(kind: MetricKind, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Instantiates the metric. `default_dialect` is used by diff metrics
    /// when no dialect argument was given.
    pub fn build(&self, default_dialect: DiffDialect) -> Result<Box<dyn Metric>, ScoringError> {
        if self.args.len() > self.kind.max_args() {
            return Err(ScoringError::configuration(format!(
                "metric '{}' accepts at most {} argument(s), got {}",
                self.kind,
                self.kind.max_args(),
                self.args.len()
            )));
        }
        let arg = |idx: usize| self.args.get(idx).map(String::as_str);
        let algorithm = |idx: usize| -> Result<Algorithm, ScoringError> {
            arg(idx).map_or(Ok(Algorithm::default()), str::parse)
        };

        let metric: Box<dyn Metric> = match self.kind {
            MetricKind::Wer | MetricKind::Ser => {
                let mode = arg(0).map_or(Ok(ErrorRateMode::default()), str::parse)?;
                Box::new(ErrorRate::new(mode, algorithm(1)?)?)
            }
            MetricKind::DiffCounts | MetricKind::SentenceDiffCounts => {
                Box::new(DiffCounts::new(algorithm(0)?)?)
            }
            MetricKind::WordDiffs | MetricKind::SentenceDiffs => {
                let dialect = arg(0).map_or(Ok(default_dialect), str::parse)?;
                Box::new(RenderedDiff::new(dialect, algorithm(1)?)?)
            }
        };
        tracing::debug!(metric = %self.kind, args = ?self.args, "built metric");
        Ok(metric)
    }
}

impl FromStr for MetricSelection {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, args) = match value.split_once(':') {
            Some((name, args)) => (name, args),
            None => (value, ""),
        };
        let kind: MetricKind = name.trim().parse()?;
        let args: Vec<String> = if args.trim().is_empty() {
            Vec::new()
        } else {
            args.split(',').map(|arg| arg.trim().to_string()).collect()
        };
        if args.iter().any(String::is_empty) {
            return Err(ScoringError::configuration(format!(
                "empty argument in metric selection '{value}'"
            )));
        }
        Ok(Self { kind, args })
    }
}
