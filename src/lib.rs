pub mod alignment;
pub mod config;
pub mod error;
pub mod input;
pub mod metrics;
pub mod output;
pub mod runner;
pub mod types;

pub use alignment::{align, edit_distance, opcodes, reduce, Algorithm};
pub use config::ScoringConfig;
pub use error::{ScoringError, SequenceError};
pub use input::{load_text, segment, Identity, Lowercase, Normalizer, Segmenter, SourceKind};
pub use metrics::{
    DiffCounts, DiffDialect, ErrorRate, ErrorRateMode, Granularity, Metric, MetricKind,
    MetricSelection, RenderedDiff,
};
pub use output::{OutputDialect, Section, SectionedWriter};
pub use runner::{run_metric, run_metrics, write_metric_result};
pub use types::{units, MetricResult, Op, OpTag, OpcodeCounts, ResultValue, TitledResult, Unit};
