use std::fmt;
use std::str::FromStr;

use crate::alignment::{align, Algorithm};
use crate::config::canonical_name;
use crate::error::ScoringError;
use crate::metrics::Metric;
use crate::types::{MetricResult, Op, OpTag, ResultValue, Unit};

const ANSI_DELETE: &str = "\x1b[31m";
const ANSI_INSERT: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";
const COMBINING_STRIKE: char = '\u{0336}';
const COMBINING_UNDERLINE: char = '\u{0332}';

/// How a rendered diff marks deleted and inserted spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffDialect {
    /// ANSI colors: red deletions, green insertions.
    Cli,
    /// `<span class="delete">` / `<span class="insert">`, HTML-escaped.
    Html,
    /// Unicode combining strike-through and underline.
    Text,
    /// Structured list of `{type, reference, hypothesis}` records.
    List,
}

impl DiffDialect {
    pub const ALL: [DiffDialect; 4] = [
        DiffDialect::Cli,
        DiffDialect::Html,
        DiffDialect::Text,
        DiffDialect::List,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Html => "html",
            Self::Text => "text",
            Self::List => "list",
        }
    }

    fn equal(self, text: &str) -> String {
        match self {
            Self::Html => html_escape(text),
            Self::Cli | Self::Text | Self::List => text.to_string(),
        }
    }

    fn delete(self, text: &str) -> String {
        match self {
            Self::Cli => format!("{ANSI_DELETE}{text}{ANSI_RESET}"),
            Self::Html => format!("<span class=\"delete\">{}</span>", html_escape(text)),
            Self::Text => combine_each(text, COMBINING_STRIKE),
            Self::List => text.to_string(),
        }
    }

    fn insert(self, text: &str) -> String {
        match self {
            Self::Cli => format!("{ANSI_INSERT}{text}{ANSI_RESET}"),
            Self::Html => format!("<span class=\"insert\">{}</span>", html_escape(text)),
            Self::Text => combine_each(text, COMBINING_UNDERLINE),
            Self::List => text.to_string(),
        }
    }
}

impl fmt::Display for DiffDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffDialect {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical_name(value).as_str() {
            "cli" | "ansi" => Ok(Self::Cli),
            "html" => Ok(Self::Html),
            "text" | "utf8" => Ok(Self::Text),
            "list" => Ok(Self::List),
            _ => Err(ScoringError::configuration(format!(
                "unknown diff dialect '{value}' (expected one of: {})",
                Self::ALL.map(DiffDialect::as_str).join(", ")
            ))),
        }
    }
}

/// Word- or sentence-level diff of the original (raw) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedDiff {
    dialect: DiffDialect,
    algorithm: Algorithm,
}

impl RenderedDiff {
    pub fn new(dialect: DiffDialect, algorithm: Algorithm) -> Result<Self, ScoringError> {
        if !algorithm.produces_ops() {
            return Err(ScoringError::configuration(format!(
                "rendered diffs need an edit script; algorithm '{algorithm}' does not produce one"
            )));
        }
        Ok(Self { dialect, algorithm })
    }

    pub fn dialect(&self) -> DiffDialect {
        self.dialect
    }

    pub fn render(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<ResultValue, ScoringError> {
        let ops = align(reference, hypothesis, self.algorithm)?;
        Ok(match self.dialect {
            DiffDialect::List => render_list(&ops, reference, hypothesis),
            dialect => ResultValue::Text(render_inline(dialect, &ops, reference, hypothesis)),
        })
    }
}

impl Metric for RenderedDiff {
    fn compare(
        &self,
        reference: &[Unit],
        hypothesis: &[Unit],
    ) -> Result<MetricResult, ScoringError> {
        self.render(reference, hypothesis).map(MetricResult::Value)
    }
}

fn render_inline(
    dialect: DiffDialect,
    ops: &[Op],
    reference: &[Unit],
    hypothesis: &[Unit],
) -> String {
    let mut pieces: Vec<String> = Vec::with_capacity(ops.len());
    for op in ops {
        let ref_text = raw_span(&reference[op.a.clone()]);
        let hyp_text = raw_span(&hypothesis[op.b.clone()]);
        let mut push = |text: &str, render: fn(DiffDialect, &str) -> String| {
            if !text.is_empty() {
                pieces.push(render(dialect, text));
            }
        };
        match op.tag {
            OpTag::Equal => push(&ref_text, DiffDialect::equal),
            OpTag::Delete => push(&ref_text, DiffDialect::delete),
            OpTag::Insert => push(&hyp_text, DiffDialect::insert),
            OpTag::Replace => {
                push(&ref_text, DiffDialect::delete);
                push(&hyp_text, DiffDialect::insert);
            }
        }
    }
    pieces.join(" ")
}

fn render_list(ops: &[Op], reference: &[Unit], hypothesis: &[Unit]) -> ResultValue {
    let side = |units: &[Unit]| {
        if units.is_empty() {
            ResultValue::Null
        } else {
            ResultValue::Text(raw_span(units))
        }
    };
    ResultValue::List(
        ops.iter()
            .map(|op| {
                ResultValue::map([
                    ("type", ResultValue::from(op.tag.as_str())),
                    ("reference", side(&reference[op.a.clone()])),
                    ("hypothesis", side(&hypothesis[op.b.clone()])),
                ])
            })
            .collect(),
    )
}

/// Raw forms of a run of units joined by single spaces. Units without a raw
/// form fall back to their content.
fn raw_span(units: &[Unit]) -> String {
    units
        .iter()
        .map(|unit| {
            let raw = unit.raw.trim();
            if raw.is_empty() {
                unit.content.trim()
            } else {
                raw
            }
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn combine_each(text: &str, mark: char) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        out.push(c);
        if !c.is_whitespace() {
            out.push(mark);
        }
    }
    out
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::units;

    fn diff(dialect: DiffDialect) -> RenderedDiff {
        RenderedDiff::new(dialect, Algorithm::default()).unwrap()
    }

    #[test]
    fn cli_marks_replacements_with_colors() {
        let rendered = diff(DiffDialect::Cli)
            .render(&units(&["the", "cat", "sat"]), &units(&["the", "cat", "sit"]))
            .unwrap();
        assert_eq!(
            rendered,
            ResultValue::Text("the cat \x1b[31msat\x1b[0m \x1b[32msit\x1b[0m".to_string())
        );
    }

    #[test]
    fn html_escapes_and_wraps_spans() {
        let reference = vec![Unit::new("a", "a"), Unit::new("b", "<b>")];
        let hypothesis = vec![Unit::new("a", "a")];
        let rendered = diff(DiffDialect::Html).render(&reference, &hypothesis).unwrap();
        assert_eq!(
            rendered,
            ResultValue::Text("a <span class=\"delete\">&lt;b&gt;</span>".to_string())
        );
    }

    #[test]
    fn text_dialect_uses_combining_marks() {
        let rendered = diff(DiffDialect::Text)
            .render(&units(&["a"]), &units(&["a", "bc"]))
            .unwrap();
        assert_eq!(rendered, ResultValue::Text("a b\u{0332}c\u{0332}".to_string()));
    }

    #[test]
    fn raw_text_is_rendered_not_content() {
        let reference = vec![Unit::new("hello", "Hello, "), Unit::new("world", "world!\n")];
        let hypothesis = vec![Unit::new("hello", "hello "), Unit::new("world", "world")];
        let rendered = diff(DiffDialect::Cli).render(&reference, &hypothesis).unwrap();
        assert_eq!(rendered, ResultValue::Text("Hello, world!".to_string()));
    }

    #[test]
    fn list_dialect_yields_records() {
        let rendered = diff(DiffDialect::List)
            .render(&units(&["a", "b"]), &units(&["a", "c", "d"]))
            .unwrap();
        let ResultValue::List(items) = rendered else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[1],
            ResultValue::map([
                ("type", ResultValue::from("replace")),
                ("reference", ResultValue::from("b")),
                ("hypothesis", ResultValue::from("c d")),
            ])
        );
    }

    #[test]
    fn list_dialect_marks_missing_side_as_null() {
        let rendered = diff(DiffDialect::List).render(&[], &units(&["a"])).unwrap();
        assert_eq!(
            rendered,
            ResultValue::List(vec![ResultValue::map([
                ("type", ResultValue::from("insert")),
                ("reference", ResultValue::Null),
                ("hypothesis", ResultValue::from("a")),
            ])])
        );
    }

    #[test]
    fn dialect_names_parse() {
        assert_eq!("ANSI".parse::<DiffDialect>().unwrap(), DiffDialect::Cli);
        assert_eq!("utf-8".parse::<DiffDialect>().unwrap(), DiffDialect::Text);
        assert!("latex".parse::<DiffDialect>().unwrap_err().is_configuration());
    }
}
