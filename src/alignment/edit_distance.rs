use crate::types::Unit;

/// Minimum number of unit insertions, deletions and substitutions turning
/// `reference` into `hypothesis`, comparing units by `content`.
pub fn edit_distance(reference: &[Unit], hypothesis: &[Unit]) -> usize {
    if reference.is_empty() {
        return hypothesis.len();
    }
    if hypothesis.is_empty() {
        return reference.len();
    }

    let mut prev: Vec<usize> = (0..=hypothesis.len()).collect();
    let mut curr = vec![0usize; hypothesis.len() + 1];

    for (i, ref_unit) in reference.iter().enumerate() {
        curr[0] = i + 1;
        for (j, hyp_unit) in hypothesis.iter().enumerate() {
            let substitution = prev[j] + usize::from(ref_unit.content != hyp_unit.content);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[hypothesis.len()]
}
