use std::io::Write;

use crate::error::ScoringError;
use crate::input::{segment, Normalizer};
use crate::metrics::{Granularity, Metric, MetricSelection};
use crate::output::SectionedWriter;
use crate::types::{MetricResult, Unit};

/// Segmented reference and hypothesis, produced once per granularity.
struct SegmentedPair<'a> {
    reference: &'a str,
    hypothesis: &'a str,
    normalizer: &'a dyn Normalizer,
    words: Option<(Vec<Unit>, Vec<Unit>)>,
    sentences: Option<(Vec<Unit>, Vec<Unit>)>,
}

impl<'a> SegmentedPair<'a> {
    fn new(reference: &'a str, hypothesis: &'a str, normalizer: &'a dyn Normalizer) -> Self {
        Self {
            reference,
            hypothesis,
            normalizer,
            words: None,
            sentences: None,
        }
    }

    fn get(&mut self, granularity: Granularity) -> (&[Unit], &[Unit]) {
        let (reference, hypothesis, normalizer) =
            (self.reference, self.hypothesis, self.normalizer);
        let slot = match granularity {
            Granularity::Word => &mut self.words,
            Granularity::Sentence => &mut self.sentences,
        };
        let (ref_units, hyp_units) = slot.get_or_insert_with(|| {
            (
                segment(reference, granularity, normalizer),
                segment(hypothesis, granularity, normalizer),
            )
        });
        (ref_units.as_slice(), hyp_units.as_slice())
    }
}

/// Scores `hypothesis` against `reference` with every selected metric and
/// renders the results through `writer` in one session.
///
/// All metrics are built before any comparison runs, so a bad selection
/// never produces partial output.
pub fn run_metrics<W: Write>(
    reference: &str,
    hypothesis: &str,
    selections: &[MetricSelection],
    normalizer: &dyn Normalizer,
    writer: &mut SectionedWriter<W>,
) -> Result<(), ScoringError> {
    if selections.is_empty() {
        return Err(ScoringError::configuration("need at least one metric"));
    }
    let default_dialect = writer.dialect().default_diff_dialect();
    let metrics = selections
        .iter()
        .map(|selection| {
            selection
                .build(default_dialect)
                .map(|metric| (selection, metric))
        })
        .collect::<Result<Vec<_>, ScoringError>>()?;

    let mut inputs = SegmentedPair::new(reference, hypothesis, normalizer);
    writer.session(|out| {
        for (selection, metric) in &metrics {
            let (ref_units, hyp_units) = inputs.get(selection.kind.granularity());
            tracing::debug!(
                metric = %selection.kind,
                reference_units = ref_units.len(),
                hypothesis_units = hyp_units.len(),
                "comparing"
            );
            let result = metric.compare(ref_units, hyp_units)?;
            write_metric_result(out, selection.kind.name(), &result)?;
        }
        Ok(())
    })
}

/// Runs a single metric and writes it under `name`.
pub fn run_metric<W: Write>(
    name: &str,
    metric: &dyn Metric,
    reference: &[Unit],
    hypothesis: &[Unit],
    writer: &mut SectionedWriter<W>,
) -> Result<(), ScoringError> {
    let result = metric.compare(reference, hypothesis)?;
    write_metric_result(writer, name, &result)
}

/// `title(name)` followed by the value, or by a nested section holding one
/// title/result pair per row.
pub fn write_metric_result<W: Write>(
    writer: &mut SectionedWriter<W>,
    name: &str,
    result: &MetricResult,
) -> Result<(), ScoringError> {
    writer.title(name, None)?;
    match result {
        MetricResult::Value(value) => writer.result(value.clone()),
        MetricResult::Sections(rows) => {
            writer.start_section()?;
            for row in rows {
                writer.title(&row.title, None)?;
                writer.result(row.result.clone())?;
            }
            writer.stop_section()
        }
    }
}
