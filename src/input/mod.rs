//! Turning raw text into unit sequences.
//!
//! Reading, normalizing and segmenting are seams: the engine only needs
//! ordered [`Unit`]s, and the implementations here are the simple defaults
//! used by the command-line tool.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::canonical_name;
use crate::error::ScoringError;
use crate::metrics::Granularity;
use crate::types::Unit;

pub mod segmentation;

pub use segmentation::{SentenceSegmenter, WhitespaceSegmenter};

/// Pure text-to-text transform applied once before segmentation.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<Unit>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl Normalizer for Lowercase {
    fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Normalizes `text` and splits it with the default segmenter for
/// `granularity`.
pub fn segment(text: &str, granularity: Granularity, normalizer: &dyn Normalizer) -> Vec<Unit> {
    let normalized = normalizer.normalize(text);
    let units = match granularity {
        Granularity::Word => WhitespaceSegmenter.segment(&normalized),
        Granularity::Sentence => SentenceSegmenter.segment(&normalized),
    };
    tracing::debug!(?granularity, units = units.len(), "segmented input");
    units
}

/// How a reference or hypothesis argument is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// A file path whose type follows from its extension.
    #[default]
    Infer,
    /// The argument itself is the text.
    Argument,
    /// A plain-text file regardless of extension.
    PlainText,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Infer => "infer",
            Self::Argument => "argument",
            Self::PlainText => "txt",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical_name(value).as_str() {
            "infer" => Ok(Self::Infer),
            "argument" => Ok(Self::Argument),
            "txt" | "plaintext" => Ok(Self::PlainText),
            _ => Err(ScoringError::configuration(format!(
                "unknown input type '{value}' (expected one of: infer, argument, txt)"
            ))),
        }
    }
}

/// Returns the text named by `value`.
pub fn load_text(value: &str, kind: SourceKind) -> Result<String, ScoringError> {
    let kind = match kind {
        SourceKind::Infer => infer_kind(Path::new(value))?,
        explicit => explicit,
    };
    match kind {
        SourceKind::Argument => Ok(value.to_string()),
        SourceKind::PlainText | SourceKind::Infer => std::fs::read_to_string(value)
            .map_err(|e| ScoringError::io("read input file", e)),
    }
}

fn infer_kind(path: &Path) -> Result<SourceKind, ScoringError> {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return Err(ScoringError::configuration(format!(
            "cannot infer the input type of '{}' without a file extension",
            path.display()
        )));
    };
    match extension.to_lowercase().as_str() {
        "txt" => Ok(SourceKind::PlainText),
        other => Err(ScoringError::configuration(format!(
            "cannot infer the input type of files with extension '{other}'"
        ))),
    }
}
