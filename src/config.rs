use std::path::Path;

use serde::Deserialize;

use crate::error::ScoringError;
use crate::metrics::MetricSelection;
use crate::output::OutputDialect;

/// Run configuration for a scoring session, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub output_format: OutputDialect,
    /// Metric selections in `name[:arg[,arg...]]` form.
    pub metrics: Vec<String>,
    pub lowercase: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            output_format: OutputDialect::ReStructuredText,
            metrics: Vec::new(),
            lowercase: false,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::io("read scoring config", e))?;
        serde_json::from_str(&data).map_err(|e| ScoringError::json("parse scoring config", e))
    }

    /// Parses every metric selection so bad names fail before any comparison.
    pub fn metric_selections(&self) -> Result<Vec<MetricSelection>, ScoringError> {
        self.metrics.iter().map(|raw| raw.parse()).collect()
    }

    /// Parses and builds every selected metric without running any.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let dialect = self.output_format.default_diff_dialect();
        for selection in self.metric_selections()? {
            selection.build(dialect)?;
        }
        Ok(())
    }
}

/// Lowercases a selector and strips `-`, `_`, `.` and spaces so that
/// `Ratcliff-Obershelp` and `ratcliffobershelp` name the same thing.
pub(crate) fn canonical_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_config_default() {
        let config = ScoringConfig::default();
        assert_eq!(config.output_format, OutputDialect::ReStructuredText);
        assert!(config.metrics.is_empty());
        assert!(!config.lowercase);
    }

    #[test]
    fn scoring_config_from_json() {
        let json = r#"{
            "output_format": "json",
            "metrics": ["wer:weighted", "diffcounts"],
            "lowercase": true
        }"#;
        let config: ScoringConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.output_format, OutputDialect::Json);
        assert_eq!(config.metrics.len(), 2);
        assert!(config.lowercase);
        assert_eq!(config.metric_selections().unwrap().len(), 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"metrics": ["wer"]}"#).expect("valid config json");
        assert_eq!(config.output_format, OutputDialect::ReStructuredText);
        assert!(!config.lowercase);
    }

    #[test]
    fn unknown_metric_fails_eagerly() {
        let config = ScoringConfig {
            metrics: vec!["wer".to_string(), "bleu".to_string()],
            ..ScoringConfig::default()
        };
        let err = config.metric_selections().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn validate_builds_metrics() {
        let mut config = ScoringConfig {
            metrics: vec!["wer:distance,levenshtein".to_string()],
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_ok());
        config.metrics.push("worddiffs:cli,levenshtein".to_string());
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let result: Result<ScoringConfig, _> =
            serde_json::from_str(r#"{"output_format": "yaml"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let path = std::env::temp_dir().join("sttscore_config_load_test.json");
        std::fs::write(&path, r#"{"output_format": "markdown"}"#).expect("write config");
        let config = ScoringConfig::load(&path).expect("load config");
        assert_eq!(config.output_format, OutputDialect::MarkDown);
        let _ = std::fs::remove_file(&path);

        let err = ScoringConfig::load(Path::new("/nonexistent/sttscore.json")).unwrap_err();
        assert!(matches!(err, ScoringError::Io { .. }));
    }

    #[test]
    fn canonical_name_strips_separators() {
        assert_eq!(canonical_name("Ratcliff-Obershelp"), "ratcliffobershelp");
        assert_eq!(canonical_name("sentence_diff.counts"), "sentencediffcounts");
    }
}
