//! Positional shift detection.
//!
//! When a transformation drops or inserts a field upstream, everything
//! after that point mismatches even though the values are intact.
//! Probing a small neighborhood of offsets around the first difference
//! distinguishes that case from a plain value error.

use tracing::debug;

/// First 0-based index within the common prefix where the two
/// sequences disagree, if any.
pub fn first_mismatch(actual: &[String], expected: &[String]) -> Option<usize> {
    let common = actual.len().min(expected.len());
    (0..common).find(|&i| actual[i] != expected[i])
}

/// Probe offsets `-probe_radius..=probe_radius` (excluding 0, in
/// increasing order) for an offset at which the actual value at
/// `first_diff_index` reappears in the expected sequence.
///
/// Returns the first candidate offset, or `None` when the misalignment
/// looks like a value error rather than a positional shift. This is a
/// heuristic: it does not verify that the remainder of the sequence
/// re-aligns under the offset. Callers wanting confirmation should
/// re-run the comparison with one side shifted.
pub fn detect_shift(
    actual: &[String],
    expected: &[String],
    first_diff_index: usize,
    probe_radius: usize,
) -> Option<isize> {
    let probe = actual.get(first_diff_index)?;
    let radius = probe_radius as isize;

    for offset in -radius..=radius {
        if offset == 0 {
            continue;
        }

        let check = first_diff_index as isize + offset;
        if check < 0 {
            continue;
        }

        if let Some(candidate) = expected.get(check as usize) {
            if probe == candidate {
                debug!(first_diff_index, offset, "shift candidate found");
                return Some(offset);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn first_mismatch_finds_earliest_difference() {
        let a = fields(&["1", "2", "3"]);
        let b = fields(&["1", "X", "Y"]);
        assert_eq!(first_mismatch(&a, &b), Some(1));
    }

    #[test]
    fn first_mismatch_none_when_prefix_agrees() {
        let a = fields(&["1", "2"]);
        let b = fields(&["1", "2", "3"]);
        assert_eq!(first_mismatch(&a, &b), None);
    }

    #[test]
    fn detects_dropped_field_as_positive_offset() {
        // Generated side dropped "2": everything after shifts left by one.
        let actual = fields(&["1", "3", "4"]);
        let expected = fields(&["1", "2", "3", "4"]);

        assert_eq!(first_mismatch(&actual, &expected), Some(1));
        assert_eq!(detect_shift(&actual, &expected, 1, 3), Some(1));
    }

    #[test]
    fn detects_inserted_field_as_negative_offset() {
        // Generated side inserted "9" ahead of "2".
        let actual = fields(&["1", "9", "2", "3"]);
        let expected = fields(&["1", "2", "3"]);

        assert_eq!(first_mismatch(&actual, &expected), Some(1));
        // Probing index 2 ("2" vs "3") finds expected[1] == "2".
        assert_eq!(detect_shift(&actual, &expected, 2, 3), Some(-1));
    }

    #[test]
    fn value_error_yields_no_shift() {
        let actual = fields(&["1", "WRONG", "3"]);
        let expected = fields(&["1", "2", "3"]);

        assert_eq!(detect_shift(&actual, &expected, 1, 3), None);
    }

    #[test]
    fn returns_most_negative_candidate_first() {
        // "x" appears both one before and one after the probe position;
        // scanning order makes -1 win.
        let actual = fields(&["a", "x", "c"]);
        let expected = fields(&["x", "b", "x"]);

        assert_eq!(detect_shift(&actual, &expected, 1, 3), Some(-1));
    }

    #[test]
    fn probe_index_beyond_actual_is_none() {
        let actual = fields(&["1"]);
        let expected = fields(&["1", "2"]);
        assert_eq!(detect_shift(&actual, &expected, 5, 3), None);
    }
}
