use proptest::prelude::*;
use sttscore::{
    opcodes, reduce, units, Algorithm, ErrorRate, ErrorRateMode, OpTag, OutputDialect,
    SectionedWriter, Unit,
};

fn words(alphabet: &'static [&'static str], max_len: usize) -> impl Strategy<Value = Vec<Unit>> {
    prop::collection::vec(prop::sample::select(alphabet), 0..max_len)
        .prop_map(|items| units(&items))
}

fn rate(mode: ErrorRateMode, reference: &[Unit], hypothesis: &[Unit]) -> f64 {
    ErrorRate::new(mode, Algorithm::RatcliffObershelp)
        .expect("op-based mode")
        .compute(reference, hypothesis)
}

proptest! {
    #[test]
    fn op_ranges_tile_both_sequences(
        reference in words(&["a", "b", "c", "d"], 14),
        hypothesis in words(&["a", "b", "c", "d"], 14),
    ) {
        let ops = opcodes(&reference, &hypothesis);
        let (mut a_end, mut b_end) = (0, 0);
        for op in &ops {
            prop_assert_eq!(op.a.start, a_end);
            prop_assert_eq!(op.b.start, b_end);
            a_end = op.a.end;
            b_end = op.b.end;
            match op.tag {
                OpTag::Equal => {
                    prop_assert_eq!(op.a.len(), op.b.len());
                    prop_assert!(!op.a.is_empty());
                    for (r, h) in reference[op.a.clone()].iter().zip(&hypothesis[op.b.clone()]) {
                        prop_assert_eq!(&r.content, &h.content);
                    }
                }
                OpTag::Replace => prop_assert!(!op.a.is_empty() && !op.b.is_empty()),
                OpTag::Insert => prop_assert!(op.a.is_empty() && !op.b.is_empty()),
                OpTag::Delete => prop_assert!(!op.a.is_empty() && op.b.is_empty()),
            }
        }
        prop_assert_eq!(a_end, reference.len());
        prop_assert_eq!(b_end, hypothesis.len());
    }

    #[test]
    fn reduction_is_lossless(
        reference in words(&["a", "b", "c"], 16),
        hypothesis in words(&["a", "b", "c"], 16),
    ) {
        let counts = reduce(&opcodes(&reference, &hypothesis));
        prop_assert_eq!(counts.equal + counts.replace + counts.delete, reference.len());
        prop_assert_eq!(counts.equal + counts.replace + counts.insert, hypothesis.len());
    }

    #[test]
    fn identical_sequences_align_as_one_equal_block(sequence in words(&["a", "b", "c"], 16)) {
        let ops = opcodes(&sequence, &sequence);
        if sequence.is_empty() {
            prop_assert!(ops.is_empty());
        } else {
            prop_assert_eq!(ops.len(), 1);
            prop_assert_eq!(ops[0].tag, OpTag::Equal);
            prop_assert_eq!(ops[0].a.clone(), 0..sequence.len());
            prop_assert_eq!(rate(ErrorRateMode::Strict, &sequence, &sequence), 0.0);
        }
        let counts = reduce(&ops);
        prop_assert_eq!(counts.equal, sequence.len());
        prop_assert_eq!(counts.replace + counts.insert + counts.delete, 0);
    }

    #[test]
    fn disjoint_sequences_reduce_to_replacements(
        reference in words(&["a", "b"], 10),
        hypothesis in words(&["x", "y"], 10),
    ) {
        let (m, n) = (reference.len(), hypothesis.len());
        let counts = reduce(&opcodes(&reference, &hypothesis));
        prop_assert_eq!(counts.equal, 0);
        prop_assert_eq!(counts.replace, m.min(n));
        prop_assert_eq!(counts.insert, n.saturating_sub(m));
        prop_assert_eq!(counts.delete, m.saturating_sub(n));
    }

    #[test]
    fn empty_reference_scores_one(hypothesis in words(&["a", "b"], 10)) {
        prop_assert_eq!(rate(ErrorRateMode::Strict, &[], &hypothesis), 1.0);
        prop_assert_eq!(rate(ErrorRateMode::Weighted, &[], &hypothesis), 1.0);
    }

    #[test]
    fn weighted_halves_pure_deletions_and_insertions(
        sequence in words(&["a", "b", "c"], 16),
        lo in 0usize..16,
        hi in 0usize..16,
    ) {
        prop_assume!(!sequence.is_empty());
        let lo = lo.min(sequence.len());
        let hi = hi.clamp(lo, sequence.len());
        let shorter = &sequence[lo..hi];
        prop_assume!(!shorter.is_empty());

        let deletions = rate(ErrorRateMode::Strict, &sequence, shorter);
        let weighted = rate(ErrorRateMode::Weighted, &sequence, shorter);
        prop_assert!((weighted - deletions / 2.0).abs() < 1e-12);

        let insertions = rate(ErrorRateMode::Strict, shorter, &sequence);
        let weighted = rate(ErrorRateMode::Weighted, shorter, &sequence);
        prop_assert!((weighted - insertions / 2.0).abs() < 1e-12);
    }

    #[test]
    fn json_writer_output_always_parses(calls in prop::collection::vec(0u8..4, 0..40)) {
        let mut writer = SectionedWriter::new(Vec::new(), OutputDialect::Json);
        writer.open().expect("open");
        let mut depth = 0usize;
        let mut pending = false;
        for (idx, call) in calls.into_iter().enumerate() {
            match call {
                0 if !pending => {
                    writer.title(&format!("t{idx}"), None).expect("title");
                    pending = true;
                }
                1 => {
                    writer.result(idx as f64 / 4.0).expect("result");
                    pending = false;
                }
                2 => {
                    writer.start_section().expect("start");
                    depth += 1;
                    pending = false;
                }
                3 if depth > 0 => {
                    writer.stop_section().expect("stop");
                    depth -= 1;
                    pending = false;
                }
                _ => {}
            }
        }
        for _ in 0..depth {
            writer.stop_section().expect("stop");
        }
        writer.close().expect("close");
        let parsed: serde_json::Value =
            serde_json::from_slice(&writer.into_inner()).expect("valid JSON");
        prop_assert!(parsed.is_array());
    }
}
