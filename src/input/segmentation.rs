use std::ops::Range;

use crate::input::Segmenter;
use crate::types::Unit;

/// Splits on runs of whitespace. Each unit's raw form carries the whitespace
/// that follows it; leading whitespace goes to the first unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<Unit> {
        let spans = word_spans(text);
        spans
            .iter()
            .enumerate()
            .map(|(idx, span)| {
                let raw_start = if idx == 0 { 0 } else { span.start };
                let raw_end = spans.get(idx + 1).map_or(text.len(), |next| next.start);
                Unit::new(&text[span.clone()], &text[raw_start..raw_end])
            })
            .collect()
    }
}

fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut word_start = None;
    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), word_start) {
            (false, None) => word_start = Some(idx),
            (true, Some(start)) => {
                spans.push(start..idx);
                word_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = word_start {
        spans.push(start..text.len());
    }
    spans
}

/// Splits after `.`, `!` or `?` when followed by whitespace or the end of
/// the text. Content is the trimmed sentence; raw keeps trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSegmenter;

impl Segmenter for SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<Unit> {
        let mut units = Vec::new();
        let mut push = |raw: &str| {
            let content = raw.trim();
            if !content.is_empty() {
                units.push(Unit::new(content, raw));
            }
        };

        let mut start = 0;
        let mut chars = text.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            let terminal = matches!(c, '.' | '!' | '?')
                && chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if !terminal {
                continue;
            }
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            push(&text[start..end]);
            start = end;
        }
        if start < text.len() {
            push(&text[start..]);
        }
        units
    }
}
