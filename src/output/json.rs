//! Streaming JSON rendering.
//!
//! The writer never rewrites flushed bytes, so separators are emitted in
//! front of an entry (when the level already holds one) instead of after it.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::ScoringError;
use crate::types::ResultValue;

/// Compact JSON with `", "` and `": "` separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serializes `value` with [`SpacedFormatter`].
pub fn to_spaced_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ScoringError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ScoringError::json("encode result", e))?;
    Ok(buf)
}

#[derive(Serialize)]
struct Entry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    result: &'a ResultValue,
}

/// Writes the separator and indentation that precede an entry at `depth`.
fn entry_prefix<W: Write>(sink: &mut W, depth: usize, siblings: usize) -> io::Result<()> {
    if siblings > 0 {
        sink.write_all(b",")?;
    }
    sink.write_all(b"\n")?;
    sink.write_all(&b"\t".repeat(depth + 1))
}

pub(crate) fn write_open<W: Write>(sink: &mut W) -> Result<(), ScoringError> {
    sink.write_all(b"[")
        .map_err(|e| ScoringError::io("write JSON array start", e))
}

pub(crate) fn write_close<W: Write>(sink: &mut W) -> Result<(), ScoringError> {
    sink.write_all(b"\n]\n")
        .map_err(|e| ScoringError::io("write JSON array end", e))
}

/// `{"title": ..., "result": ...}` as the next entry at `depth`.
pub(crate) fn write_entry<W: Write>(
    sink: &mut W,
    depth: usize,
    siblings: usize,
    title: Option<&str>,
    result: &ResultValue,
) -> Result<(), ScoringError> {
    let encoded = to_spaced_vec(&Entry { title, result })?;
    entry_prefix(sink, depth, siblings)
        .and_then(|()| sink.write_all(&encoded))
        .map_err(|e| ScoringError::io("write JSON entry", e))
}

/// Opens an entry at `depth` whose result is the array of the nested level.
pub(crate) fn write_nested_start<W: Write>(
    sink: &mut W,
    depth: usize,
    siblings: usize,
    title: Option<&str>,
) -> Result<(), ScoringError> {
    let mut head = b"{".to_vec();
    if let Some(title) = title {
        head.extend_from_slice(b"\"title\": ");
        head.extend_from_slice(&to_spaced_vec(title)?);
        head.extend_from_slice(b", ");
    }
    head.extend_from_slice(b"\"result\": [");
    entry_prefix(sink, depth, siblings)
        .and_then(|()| sink.write_all(&head))
        .map_err(|e| ScoringError::io("write JSON section start", e))
}

/// Closes the entry opened by [`write_nested_start`]; `depth` is the outer level.
pub(crate) fn write_nested_end<W: Write>(
    sink: &mut W,
    depth: usize,
    nested_entries: usize,
) -> Result<(), ScoringError> {
    let mut tail = Vec::new();
    if nested_entries > 0 {
        tail.push(b'\n');
        tail.extend(b"\t".repeat(depth + 1));
    }
    tail.extend_from_slice(b"]}");
    sink.write_all(&tail)
        .map_err(|e| ScoringError::io("write JSON section end", e))
}
