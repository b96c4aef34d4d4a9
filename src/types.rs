use std::fmt;
use std::ops::Range;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// One segmented token (a word or a sentence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Normalized text used for comparison.
    pub content: String,
    /// Original text, only used when rendering human-readable diffs.
    pub raw: String,
}

impl Unit {
    pub fn new(content: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            raw: raw.into(),
        }
    }

    /// Unit whose raw form is identical to its content.
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            raw: content.clone(),
            content,
        }
    }
}

/// Builds a sequence of plain units from string slices.
pub fn units<S: AsRef<str>>(items: &[S]) -> Vec<Unit> {
    items.iter().map(|item| Unit::plain(item.as_ref())).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Insert,
    Delete,
}

impl OpTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Replace => "replace",
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OpTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alignment operation.
///
/// `a` indexes the reference sequence and `b` the hypothesis sequence; both
/// are half-open. Across an op list the `a` ranges tile `[0, len(reference))`
/// and the `b` ranges tile `[0, len(hypothesis))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub tag: OpTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

impl Op {
    pub fn new(tag: OpTag, a: Range<usize>, b: Range<usize>) -> Self {
        Self { tag, a, b }
    }

    pub fn reference_len(&self) -> usize {
        self.a.len()
    }

    pub fn hypothesis_len(&self) -> usize {
        self.b.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OpcodeCounts {
    pub equal: usize,
    pub replace: usize,
    pub insert: usize,
    pub delete: usize,
}

impl OpcodeCounts {
    /// Number of reference units covered by these counts.
    pub fn reference_len(&self) -> usize {
        self.equal + self.replace + self.delete
    }

    /// Number of hypothesis units covered by these counts.
    pub fn hypothesis_len(&self) -> usize {
        self.equal + self.replace + self.insert
    }
}

/// A value handed to the output writer.
///
/// Maps keep insertion order so records render deterministically.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Null,
    Float(f64),
    Integer(i64),
    Text(String),
    Map(Vec<(String, ResultValue)>),
    List(Vec<ResultValue>),
}

impl ResultValue {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, ResultValue)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ResultValue {
    /// Inline text rendering: floats use six decimals, maps render as
    /// `key: value` pairs and lists as their comma-separated items.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Float(value) => write!(f, "{value:.6}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Map(entries) => {
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                Ok(())
            }
            Self::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<usize> for ResultValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<i64> for ResultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<OpcodeCounts> for ResultValue {
    fn from(counts: OpcodeCounts) -> Self {
        Self::map([
            ("equal", counts.equal.into()),
            ("replace", counts.replace.into()),
            ("insert", counts.insert.into()),
            ("delete", counts.delete.into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitledResult {
    pub title: String,
    pub result: ResultValue,
}

/// Output of one metric comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricResult {
    Value(ResultValue),
    /// Rendered as one nested section per row.
    Sections(Vec<TitledResult>),
}

impl MetricResult {
    pub fn as_value(&self) -> Option<&ResultValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Sections(_) => None,
        }
    }
}

impl From<ResultValue> for MetricResult {
    fn from(value: ResultValue) -> Self {
        Self::Value(value)
    }
}

impl From<f64> for MetricResult {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<OpcodeCounts> for MetricResult {
    fn from(counts: OpcodeCounts) -> Self {
        Self::Value(counts.into())
    }
}
