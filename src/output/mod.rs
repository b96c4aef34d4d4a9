//! Streaming, nesting-aware result writer.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::config::canonical_name;
use crate::error::{ScoringError, SequenceError};
use crate::metrics::DiffDialect;
use crate::types::ResultValue;

pub mod json;

/// reStructuredText underline characters, indexed by heading level.
const RST_UNDERLINES: [char; 14] = [
    '=', '-', '~', '#', '+', '*', '_', '`', ':', '\'', '"', '^', '<', '>',
];
const PLAIN_INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputDialect {
    Plain,
    #[default]
    ReStructuredText,
    MarkDown,
    Json,
}

impl OutputDialect {
    pub const ALL: [OutputDialect; 4] = [
        OutputDialect::Plain,
        OutputDialect::ReStructuredText,
        OutputDialect::MarkDown,
        OutputDialect::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::ReStructuredText => "restructuredtext",
            Self::MarkDown => "markdown",
            Self::Json => "json",
        }
    }

    /// Diff dialect used by diff metrics that were not given one.
    pub fn default_diff_dialect(self) -> DiffDialect {
        match self {
            Self::Json => DiffDialect::List,
            Self::Plain | Self::ReStructuredText | Self::MarkDown => DiffDialect::Cli,
        }
    }
}

impl fmt::Display for OutputDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputDialect {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match canonical_name(value).as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "restructuredtext" | "rst" => Ok(Self::ReStructuredText),
            "markdown" | "md" => Ok(Self::MarkDown),
            "json" => Ok(Self::Json),
            _ => Err(ScoringError::configuration(format!(
                "unknown output format '{value}' (expected one of: {})",
                Self::ALL.map(OutputDialect::as_str).join(", ")
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for OutputDialect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Fields of a convenience section, emitted in the order title, result,
/// nested sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub title: Option<String>,
    pub result: Option<ResultValue>,
    pub sections: Vec<Section>,
}

impl Section {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_result(mut self, result: impl Into<ResultValue>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

#[derive(Debug)]
struct Session {
    /// Entries written so far at each open level; the last one is current.
    levels: Vec<usize>,
    /// At most one title waiting for its result (JSON only).
    pending_title: Option<String>,
}

impl Session {
    fn new() -> Self {
        Self {
            levels: vec![0],
            pending_title: None,
        }
    }

    fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    fn entries(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    fn count_entry(&mut self) {
        if let Some(count) = self.levels.last_mut() {
            *count += 1;
        }
    }
}

/// Renders titles, results and nested sections to `W` as they arrive.
///
/// A session runs from [`open`](Self::open) to [`close`](Self::close). In the
/// JSON dialect the bytes written so far plus what `close` appends always form
/// one JSON array, so nothing already flushed is ever rewritten. The sink is
/// never closed by the writer.
pub struct SectionedWriter<W: Write> {
    sink: W,
    dialect: OutputDialect,
    session: Option<Session>,
}

impl<W: Write> SectionedWriter<W> {
    pub fn new(sink: W, dialect: OutputDialect) -> Self {
        Self {
            sink,
            dialect,
            session: None,
        }
    }

    pub fn dialect(&self) -> OutputDialect {
        self.dialect
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Current nesting depth, `None` outside a session.
    pub fn depth(&self) -> Option<usize> {
        self.session.as_ref().map(Session::depth)
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn open(&mut self) -> Result<(), ScoringError> {
        if self.session.is_some() {
            return Err(SequenceError::AlreadyOpen.into());
        }
        if self.dialect == OutputDialect::Json {
            json::write_open(&mut self.sink)?;
        }
        self.session = Some(Session::new());
        tracing::debug!(dialect = %self.dialect, "writer session opened");
        Ok(())
    }

    /// Heading at `level`, or at the current depth when `level` is `None`.
    ///
    /// The JSON dialect holds the title until the next result or section; a
    /// second title before that is a configuration error.
    pub fn title(&mut self, text: &str, level: Option<usize>) -> Result<(), ScoringError> {
        let session = self.session.as_mut().ok_or(SequenceError::NotOpen)?;
        let level = level.unwrap_or_else(|| session.depth());
        let rendered = match self.dialect {
            OutputDialect::Json => {
                if let Some(pending) = &session.pending_title {
                    return Err(ScoringError::configuration(format!(
                        "title '{text}' follows title '{pending}' without a result in between"
                    )));
                }
                session.pending_title = Some(text.to_string());
                return Ok(());
            }
            OutputDialect::Plain => format!("{}{text}\n", PLAIN_INDENT.repeat(level)),
            OutputDialect::ReStructuredText => rst_heading(text, level),
            OutputDialect::MarkDown => format!("{} {text}\n\n", "#".repeat(level + 1)),
        };
        self.sink
            .write_all(rendered.as_bytes())
            .map_err(|e| ScoringError::io("write title", e))
    }

    pub fn result(&mut self, value: impl Into<ResultValue>) -> Result<(), ScoringError> {
        let value = value.into();
        let session = self.session.as_mut().ok_or(SequenceError::NotOpen)?;
        match self.dialect {
            OutputDialect::Json => {
                let title = session.pending_title.take();
                json::write_entry(
                    &mut self.sink,
                    session.depth(),
                    session.entries(),
                    title.as_deref(),
                    &value,
                )?;
            }
            OutputDialect::Plain => {
                let indent = PLAIN_INDENT.repeat(session.depth());
                self.sink
                    .write_all(text_result(&value, &indent).as_bytes())
                    .map_err(|e| ScoringError::io("write result", e))?;
            }
            OutputDialect::ReStructuredText | OutputDialect::MarkDown => {
                self.sink
                    .write_all(text_result(&value, "").as_bytes())
                    .map_err(|e| ScoringError::io("write result", e))?;
            }
        }
        session.count_entry();
        Ok(())
    }

    pub fn start_section(&mut self) -> Result<(), ScoringError> {
        let session = self.session.as_mut().ok_or(SequenceError::NotOpen)?;
        if self.dialect == OutputDialect::Json {
            let title = session.pending_title.take();
            json::write_nested_start(
                &mut self.sink,
                session.depth(),
                session.entries(),
                title.as_deref(),
            )?;
        }
        session.count_entry();
        session.levels.push(0);
        Ok(())
    }

    pub fn stop_section(&mut self) -> Result<(), ScoringError> {
        let session = self.session.as_mut().ok_or(SequenceError::NotOpen)?;
        if session.depth() == 0 {
            return Err(SequenceError::NoOpenSection.into());
        }
        if self.dialect == OutputDialect::Json {
            if let Some(title) = session.pending_title.take() {
                json::write_entry(
                    &mut self.sink,
                    session.depth(),
                    session.entries(),
                    Some(&title),
                    &ResultValue::Null,
                )?;
                session.count_entry();
            }
        }
        let nested_entries = session.levels.pop().unwrap_or(0);
        if self.dialect == OutputDialect::Json {
            json::write_nested_end(&mut self.sink, session.depth(), nested_entries)?;
        }
        Ok(())
    }

    /// Opens a section, emits whichever fields are set and closes it again.
    pub fn section(&mut self, section: &Section) -> Result<(), ScoringError> {
        self.start_section()?;
        if let Some(title) = &section.title {
            self.title(title, None)?;
        }
        if let Some(result) = &section.result {
            self.result(result.clone())?;
        }
        for nested in &section.sections {
            self.section(nested)?;
        }
        self.stop_section()
    }

    pub fn close(&mut self) -> Result<(), ScoringError> {
        let session = self.session.as_mut().ok_or(SequenceError::NotOpen)?;
        let depth = session.depth();
        if depth > 0 {
            return Err(SequenceError::UnbalancedSection { depth }.into());
        }
        if self.dialect == OutputDialect::Json {
            if let Some(title) = session.pending_title.take() {
                json::write_entry(
                    &mut self.sink,
                    0,
                    session.entries(),
                    Some(&title),
                    &ResultValue::Null,
                )?;
                session.count_entry();
            }
            json::write_close(&mut self.sink)?;
        }
        let entries = session.entries();
        self.session = None;
        self.sink
            .flush()
            .map_err(|e| ScoringError::io("flush output", e))?;
        tracing::debug!(dialect = %self.dialect, entries, "writer session closed");
        Ok(())
    }

    /// Runs `body` between `open` and `close`.
    ///
    /// The session ends whether or not `body` succeeds. When `body` fails or
    /// leaves sections open, the JSON dialect still terminates its array:
    /// a pending title is flushed, every open level is closed and the
    /// trailing `]` is written. The first error is returned.
    pub fn session<F>(&mut self, body: F) -> Result<(), ScoringError>
    where
        F: FnOnce(&mut Self) -> Result<(), ScoringError>,
    {
        self.open()?;
        let outcome = body(self).and_then(|()| self.close());
        if let Err(err) = &outcome {
            self.abandon(err);
        }
        outcome
    }

    /// Ends a session that could not be closed normally.
    fn abandon(&mut self, cause: &ScoringError) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        tracing::warn!(
            depth = session.depth(),
            error = %cause,
            "writer session abandoned"
        );
        let terminated = match self.dialect {
            OutputDialect::Json => terminate_json(&mut self.sink, &mut session),
            OutputDialect::Plain | OutputDialect::ReStructuredText | OutputDialect::MarkDown => {
                self.sink
                    .flush()
                    .map_err(|e| ScoringError::io("flush output", e))
            }
        };
        if let Err(err) = terminated {
            tracing::warn!(error = %err, "could not terminate abandoned writer session");
        }
    }
}

/// Writes whatever `close` would, from any depth.
fn terminate_json<W: Write>(sink: &mut W, session: &mut Session) -> Result<(), ScoringError> {
    if let Some(title) = session.pending_title.take() {
        json::write_entry(
            sink,
            session.depth(),
            session.entries(),
            Some(&title),
            &ResultValue::Null,
        )?;
        session.count_entry();
    }
    while session.depth() > 0 {
        let nested_entries = session.levels.pop().unwrap_or(0);
        json::write_nested_end(sink, session.depth(), nested_entries)?;
    }
    json::write_close(sink)?;
    sink.flush()
        .map_err(|e| ScoringError::io("flush output", e))
}

fn rst_heading(text: &str, level: usize) -> String {
    let underline = RST_UNDERLINES
        .get(level)
        .copied()
        .unwrap_or(RST_UNDERLINES[RST_UNDERLINES.len() - 1]);
    let rule: String = std::iter::repeat(underline)
        .take(text.chars().count())
        .collect();
    format!("{text}\n{rule}\n\n")
}

/// One line per scalar, map entry or list item, then a blank line.
fn text_result(value: &ResultValue, indent: &str) -> String {
    let lines: Vec<String> = match value {
        ResultValue::Map(entries) => entries
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect(),
        ResultValue::List(items) => items.iter().map(ToString::to_string).collect(),
        scalar => vec![scalar.to_string()],
    };
    let mut out = String::new();
    for line in lines {
        out.push_str(indent);
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
    out
}
