use std::cmp::Ordering;

use crate::types::{Op, OpTag, OpcodeCounts};

/// Folds an edit script into per-tag unit counts.
///
/// A `replace` block of unequal length only counts the overlapping part as
/// substitutions: the surplus is an insertion when the hypothesis side is
/// longer and a deletion when the reference side is longer.
pub fn reduce(ops: &[Op]) -> OpcodeCounts {
    let mut counts = OpcodeCounts::default();
    for op in ops {
        let ca = op.reference_len();
        let cb = op.hypothesis_len();
        match op.tag {
            OpTag::Equal => counts.equal += ca,
            OpTag::Insert => counts.insert += cb,
            OpTag::Delete => counts.delete += ca,
            OpTag::Replace => match ca.cmp(&cb) {
                Ordering::Equal => counts.replace += ca,
                Ordering::Less => {
                    counts.replace += ca;
                    counts.insert += cb - ca;
                }
                Ordering::Greater => {
                    counts.replace += cb;
                    counts.delete += ca - cb;
                }
            },
        }
    }
    tracing::debug!(
        equal = counts.equal,
        replace = counts.replace,
        insert = counts.insert,
        delete = counts.delete,
        "reduced opcodes"
    );
    counts
}
