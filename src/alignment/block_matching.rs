use std::collections::HashMap;

use crate::types::{Op, OpTag, Unit};

/// A maximal run of equal units: `reference[a..a + size] == hypothesis[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Index of every position each content string occupies in the hypothesis.
struct HypothesisIndex<'a> {
    positions: HashMap<&'a str, Vec<usize>>,
}

impl<'a> HypothesisIndex<'a> {
    fn new(hypothesis: &'a [Unit]) -> Self {
        let mut positions: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, unit) in hypothesis.iter().enumerate() {
            positions.entry(unit.content.as_str()).or_default().push(idx);
        }
        Self { positions }
    }

    /// Longest common run inside `reference[alo..ahi]` / `hypothesis[blo..bhi]`.
    ///
    /// Among runs of equal length the one starting earliest in the reference
    /// wins, then the one starting earliest in the hypothesis.
    fn longest_match(
        &self,
        reference: &[Unit],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let mut best = MatchingBlock {
            a: alo,
            b: blo,
            size: 0,
        };
        // run length of the match ending at (i - 1, j), keyed by j
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for (i, unit) in reference.iter().enumerate().take(ahi).skip(alo) {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.positions.get(unit.content.as_str()) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let run = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, run);
                    if run > best.size {
                        best = MatchingBlock {
                            a: i + 1 - run,
                            b: j + 1 - run,
                            size: run,
                        };
                    }
                }
            }
            run_ending_at = next_runs;
        }

        best
    }
}

/// Matching blocks in increasing order, adjacent blocks merged, terminated by
/// a zero-sized sentinel at `(len(reference), len(hypothesis))`.
pub fn matching_blocks(reference: &[Unit], hypothesis: &[Unit]) -> Vec<MatchingBlock> {
    let index = HypothesisIndex::new(hypothesis);
    let mut pending = vec![(0, reference.len(), 0, hypothesis.len())];
    let mut found = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let block = index.longest_match(reference, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }
        found.push(block);
        if alo < block.a && blo < block.b {
            pending.push((alo, block.a, blo, block.b));
        }
        let a_end = block.a + block.size;
        let b_end = block.b + block.size;
        if a_end < ahi && b_end < bhi {
            pending.push((a_end, ahi, b_end, bhi));
        }
    }
    found.sort();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
    for block in found {
        match merged.last_mut() {
            Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                last.size += block.size;
            }
            _ => merged.push(block),
        }
    }
    merged.push(MatchingBlock {
        a: reference.len(),
        b: hypothesis.len(),
        size: 0,
    });
    merged
}

/// Edit script derived from the matching blocks. Gaps between blocks become
/// `replace` when both sides are non-empty, otherwise `delete` or `insert`.
pub fn opcodes(reference: &[Unit], hypothesis: &[Unit]) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut i = 0usize;
    let mut j = 0usize;

    for block in matching_blocks(reference, hypothesis) {
        let tag = match (i < block.a, j < block.b) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            ops.push(Op::new(tag, i..block.a, j..block.b));
        }
        i = block.a + block.size;
        j = block.b + block.size;
        if block.size > 0 {
            ops.push(Op::new(OpTag::Equal, block.a..i, block.b..j));
        }
    }

    ops
}
