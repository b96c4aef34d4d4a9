use std::fmt;
use std::str::FromStr;

use crate::config::canonical_name;
use crate::error::ScoringError;
use crate::types::{Op, Unit};

pub mod block_matching;
pub mod edit_distance;
pub mod reducer;

pub use block_matching::{matching_blocks, opcodes, MatchingBlock};
pub use edit_distance::edit_distance;
pub use reducer::reduce;

/// Selects how two unit sequences are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Ratcliff–Obershelp longest-matching-block alignment.
    #[default]
    RatcliffObershelp,
    /// Classic minimum edit distance. Yields a distance, never an op list.
    Levenshtein,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::RatcliffObershelp, Algorithm::Levenshtein];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RatcliffObershelp => "ratcliffobershelp",
            Self::Levenshtein => "levenshtein",
        }
    }

    pub fn produces_ops(self) -> bool {
        matches!(self, Self::RatcliffObershelp)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical_name(value).as_str() {
            "ratcliffobershelp" | "blockmatching" => Ok(Self::RatcliffObershelp),
            "levenshtein" | "editdistance" => Ok(Self::Levenshtein),
            _ => Err(ScoringError::configuration(format!(
                "unknown alignment algorithm '{value}' (expected one of: {})",
                Self::ALL.map(Algorithm::as_str).join(", ")
            ))),
        }
    }
}

/// Computes the edit script turning `reference` into `hypothesis`.
pub fn align(
    reference: &[Unit],
    hypothesis: &[Unit],
    algorithm: Algorithm,
) -> Result<Vec<Op>, ScoringError> {
    match algorithm {
        Algorithm::RatcliffObershelp => {
            let ops = opcodes(reference, hypothesis);
            tracing::debug!(
                algorithm = %algorithm,
                reference_len = reference.len(),
                hypothesis_len = hypothesis.len(),
                op_count = ops.len(),
                "aligned sequences"
            );
            Ok(ops)
        }
        Algorithm::Levenshtein => Err(ScoringError::configuration(
            "the levenshtein algorithm yields a distance only and cannot produce an edit script",
        )),
    }
}
