use std::fmt;
use std::str::FromStr;

use crate::alignment::{edit_distance, opcodes, reduce, Algorithm};
use crate::config::canonical_name;
use crate::error::ScoringError;
use crate::metrics::Metric;
use crate::types::{MetricResult, OpcodeCounts, ResultValue, Unit};

/// Error rate reported when the reference is empty.
pub const EMPTY_REFERENCE_ERROR_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorRateMode {
    /// Every insertion, deletion and substitution costs 1.
    #[default]
    Strict,
    /// Insertions and deletions cost 0.5, substitutions 1.
    Weighted,
    /// Minimum edit distance divided by reference length; no edit script.
    Distance,
}

impl ErrorRateMode {
    pub const ALL: [ErrorRateMode; 3] = [
        ErrorRateMode::Strict,
        ErrorRateMode::Weighted,
        ErrorRateMode::Distance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Weighted => "weighted",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for ErrorRateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorRateMode {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical_name(value).as_str() {
            "strict" => Ok(Self::Strict),
            "weighted" | "hunt" => Ok(Self::Weighted),
            "distance" | "levenshtein" => Ok(Self::Distance),
            _ => Err(ScoringError::configuration(format!(
                "unknown error rate mode '{value}' (expected one of: {})",
                Self::ALL.map(ErrorRateMode::as_str).join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalties {
    pub substitution: f64,
    pub deletion: f64,
    pub insertion: f64,
}

impl Penalties {
    pub const STRICT: Penalties = Penalties {
        substitution: 1.0,
        deletion: 1.0,
        insertion: 1.0,
    };
    pub const WEIGHTED: Penalties = Penalties {
        substitution: 1.0,
        deletion: 0.5,
        insertion: 0.5,
    };
}

/// Word or sentence error rate, depending on how the inputs were segmented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRate {
    mode: ErrorRateMode,
    algorithm: Algorithm,
}

impl ErrorRate {
    /// Selecting the `levenshtein` algorithm computes a plain edit distance,
    /// so it combines with `strict` or `distance` but not with `weighted`.
    pub fn new(mode: ErrorRateMode, algorithm: Algorithm) -> Result<Self, ScoringError> {
        if algorithm == Algorithm::Levenshtein && mode == ErrorRateMode::Weighted {
            return Err(ScoringError::configuration(
                "weighted error rate needs an edit script; use the ratcliffobershelp algorithm",
            ));
        }
        Ok(Self { mode, algorithm })
    }

    pub fn mode(&self) -> ErrorRateMode {
        self.mode
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn compute(&self, reference: &[Unit], hypothesis: &[Unit]) -> f64 {
        let penalties = match (self.mode, self.algorithm) {
            (ErrorRateMode::Distance, _) | (_, Algorithm::Levenshtein) => {
                return distance_rate(reference, hypothesis);
            }
            (ErrorRateMode::Weighted, Algorithm::RatcliffObershelp) => Penalties::WEIGHTED,
            (ErrorRateMode::Strict, Algorithm::RatcliffObershelp) => Penalties::STRICT,
        };
        rate_from_counts(&reduce(&opcodes(reference, hypothesis)), penalties)
    }
}

impl Metric for ErrorRate {
    fn compare(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<MetricResult, ScoringError> {
        if reference.is_empty() {
            tracing::warn!(
                hypothesis_units = hypothesis.len(),
                "empty reference; error rate reported as 1"
            );
            // rendered as the integer 1
            return Ok(MetricResult::from(ResultValue::Integer(1)));
        }
        let rate = self.compute(reference, hypothesis);
        tracing::debug!(mode = %self.mode, algorithm = %self.algorithm, rate, "error rate");
        Ok(MetricResult::from(rate))
    }
}

/// `(replace*sub + delete*del + insert*ins) / (equal + replace + delete)`,
/// or exactly 1 when the reference is empty.
pub fn rate_from_counts(counts: &OpcodeCounts, penalties: Penalties) -> f64 {
    let total_reference = counts.reference_len();
    if total_reference == 0 {
        return EMPTY_REFERENCE_ERROR_RATE;
    }
    let changes = counts.replace as f64 * penalties.substitution
        + counts.delete as f64 * penalties.deletion
        + counts.insert as f64 * penalties.insertion;
    changes / total_reference as f64
}

fn distance_rate(reference: &[Unit], hypothesis: &[Unit]) -> f64 {
    if reference.is_empty() {
        return EMPTY_REFERENCE_ERROR_RATE;
    }
    edit_distance(reference, hypothesis) as f64 / reference.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::units;

    fn strict() -> ErrorRate {
        ErrorRate::new(ErrorRateMode::Strict, Algorithm::RatcliffObershelp).unwrap()
    }

    #[test]
    fn identical_sequences_score_zero() {
        let words = units(&["a", "b", "c"]);
        assert_eq!(strict().compute(&words, &words), 0.0);
    }

    #[test]
    fn single_substitution_of_three() {
        let rate = strict().compute(&units(&["the", "cat", "sat"]), &units(&["the", "cat", "sit"]));
        assert!((rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_reference_is_exactly_one() {
        assert_eq!(strict().compute(&[], &units(&["a"])), 1.0);
        assert_eq!(strict().compute(&[], &units(&["a", "b", "c", "d"])), 1.0);
        assert_eq!(strict().compute(&[], &[]), 1.0);
        let distance = ErrorRate::new(ErrorRateMode::Distance, Algorithm::default()).unwrap();
        assert_eq!(distance.compute(&[], &units(&["a"])), 1.0);
    }

    #[test]
    fn empty_reference_result_is_integral() {
        let result = strict().compare(&[], &units(&["a", "b"])).unwrap();
        assert_eq!(result, MetricResult::from(ResultValue::Integer(1)));
        assert_eq!(
            serde_json::to_string(result.as_value().unwrap()).unwrap(),
            "1"
        );
        let measured = strict().compare(&units(&["a"]), &units(&["b"])).unwrap();
        assert_eq!(measured, MetricResult::from(ResultValue::Float(1.0)));
    }

    #[test]
    fn weighted_halves_insertions_and_deletions() {
        let weighted = ErrorRate::new(ErrorRateMode::Weighted, Algorithm::default()).unwrap();
        let reference = units(&["a", "b", "c", "d"]);
        let hypothesis = units(&["a", "b", "x", "y", "z", "c", "d"]);
        let strict_rate = strict().compute(&reference, &hypothesis);
        let weighted_rate = weighted.compute(&reference, &hypothesis);
        assert!((strict_rate - 0.75).abs() < 1e-12);
        assert!((weighted_rate - strict_rate / 2.0).abs() < 1e-12);
    }

    #[test]
    fn unequal_replace_uses_asymmetric_split() {
        // one replace block 1 -> 3: one substitution plus two insertions
        let reference = units(&["a", "x"]);
        let hypothesis = units(&["a", "p", "q", "r"]);
        let weighted = ErrorRate::new(ErrorRateMode::Weighted, Algorithm::default()).unwrap();
        assert!((strict().compute(&reference, &hypothesis) - 1.5).abs() < 1e-12);
        assert!((weighted.compute(&reference, &hypothesis) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_mode_uses_edit_distance() {
        let distance = ErrorRate::new(ErrorRateMode::Distance, Algorithm::default()).unwrap();
        let reference = units(&["a", "b", "c", "d"]);
        let hypothesis = units(&["b", "c", "d", "a"]);
        // block matching: delete a, equal bcd, insert a -> 2 edits as well
        assert!((distance.compute(&reference, &hypothesis) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn levenshtein_algorithm_implies_distance() {
        let metric = ErrorRate::new(ErrorRateMode::Strict, Algorithm::Levenshtein).unwrap();
        let rate = metric.compute(&units(&["a", "b"]), &units(&["b", "a"]));
        assert!((rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_levenshtein_is_rejected() {
        let err = ErrorRate::new(ErrorRateMode::Weighted, Algorithm::Levenshtein).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn hunt_is_an_alias_for_weighted() {
        assert_eq!("hunt".parse::<ErrorRateMode>().unwrap(), ErrorRateMode::Weighted);
        assert!("lenient".parse::<ErrorRateMode>().is_err());
    }
}
