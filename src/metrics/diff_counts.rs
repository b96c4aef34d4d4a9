use crate::alignment::{align, reduce, Algorithm};
use crate::error::ScoringError;
use crate::metrics::Metric;
use crate::types::{MetricResult, OpcodeCounts, Unit};

/// Raw equal/replace/insert/delete unit counts, no normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffCounts {
    algorithm: Algorithm,
}

impl DiffCounts {
    pub fn new(algorithm: Algorithm) -> Result<Self, ScoringError> {
        if !algorithm.produces_ops() {
            return Err(ScoringError::configuration(format!(
                "diff counts need an edit script; algorithm '{algorithm}' does not produce one"
            )));
        }
        Ok(Self { algorithm })
    }

    pub fn counts(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<OpcodeCounts, ScoringError> {
        Ok(reduce(&align(reference, hypothesis, self.algorithm)?))
    }
}

impl Default for DiffCounts {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
        }
    }
}

impl Metric for DiffCounts {
    fn compare(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<MetricResult, ScoringError> {
        self.counts(reference, hypothesis).map(MetricResult::from)
    }
}
