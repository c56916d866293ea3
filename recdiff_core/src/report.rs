//! Summary layer over comparator output.
//!
//! Builds the structures the presentation layer renders. Summaries only
//! count and truncate values the engines already computed; no comparison
//! happens here.

use crate::binary_diff::{StructureCheck, WindowReport, WindowResult};
use crate::field_diff::{FieldDiffResult, FieldMismatch, RangeAccuracy};
use serde::Serialize;

/// A suspected positional shift, attached to a field summary as a hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftHint {
    /// 1-based ordinal of the first differing field.
    pub first_diff_field: usize,
    /// Offset at which the actual value reappears in the expected
    /// sequence. Heuristic, not a verified re-alignment.
    pub offset: isize,
}

/// Rendered-ready summary of a field-level comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub actual_fields: usize,
    pub expected_fields: usize,
    pub matches: usize,
    pub mismatched: usize,
    pub missing: usize,
    pub extra: usize,
    /// Matches as a percentage of expected fields, 0 when expected is empty.
    pub match_percentage: f64,
    /// First N mismatches, N per caller configuration.
    pub mismatches: Vec<FieldMismatch>,
    /// How many mismatches the truncation dropped.
    pub mismatches_elided: usize,
    pub ranges: Vec<RangeAccuracy>,
    pub shift: Option<ShiftHint>,
}

impl FieldSummary {
    pub fn new(
        result: &FieldDiffResult,
        ranges: Vec<RangeAccuracy>,
        shift: Option<ShiftHint>,
        max_mismatches: usize,
    ) -> Self {
        let shown = result.mismatches.len().min(max_mismatches);

        Self {
            actual_fields: result.actual_count,
            expected_fields: result.expected_count,
            matches: result.matches,
            mismatched: result.mismatches.len(),
            missing: result.missing.len(),
            extra: result.extra.len(),
            match_percentage: result.match_percentage(),
            mismatches: result.mismatches[..shown].to_vec(),
            mismatches_elided: result.mismatches.len() - shown,
            ranges,
            shift,
        }
    }
}

/// Rendered-ready summary of a byte-window comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinarySummary {
    pub actual_len: usize,
    pub expected_len: usize,
    pub len_match: bool,
    pub windows: Vec<WindowResult>,
    pub windows_skipped: usize,
    pub total_compared: usize,
    pub total_matches: usize,
    pub overall_percentage: f64,
    pub structure: Option<StructureCheck>,
}

impl BinarySummary {
    pub fn new(report: WindowReport, structure: Option<StructureCheck>) -> Self {
        Self {
            actual_len: report.actual_len,
            expected_len: report.expected_len,
            len_match: report.len_match,
            windows: report.windows,
            windows_skipped: report.skipped,
            total_compared: report.total_compared,
            total_matches: report.total_matches,
            overall_percentage: report.overall_percentage,
            structure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary_diff::BinaryDiffEngine;
    use crate::field_diff::FieldDiffEngine;
    use recdiff_common::ByteWindow;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn summary_counts_follow_result() {
        let engine = FieldDiffEngine::new();
        let result = engine.compare(
            &fields(&["1", "2", "3", "4"]),
            &fields(&["1", "X", "3", "4", "5"]),
        );

        let summary = FieldSummary::new(&result, Vec::new(), None, 20);
        assert_eq!(summary.actual_fields, 4);
        assert_eq!(summary.expected_fields, 5);
        assert_eq!(summary.matches, 3);
        assert_eq!(summary.mismatched, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.extra, 0);
        assert_eq!(summary.match_percentage, 60.0);
        assert_eq!(summary.mismatches_elided, 0);
    }

    #[test]
    fn summary_truncates_mismatch_list() {
        let engine = FieldDiffEngine::new();
        let actual: Vec<String> = (0..30).map(|i| format!("a{i}")).collect();
        let expected: Vec<String> = (0..30).map(|i| format!("b{i}")).collect();
        let result = engine.compare(&actual, &expected);

        let summary = FieldSummary::new(&result, Vec::new(), None, 20);
        assert_eq!(summary.mismatched, 30);
        assert_eq!(summary.mismatches.len(), 20);
        assert_eq!(summary.mismatches_elided, 10);
        assert_eq!(summary.mismatches[0].field, 1);
    }

    #[test]
    fn empty_comparison_summarizes_to_zeros() {
        let engine = FieldDiffEngine::new();
        let result = engine.compare(&[], &[]);

        let summary = FieldSummary::new(&result, Vec::new(), None, 20);
        assert_eq!(summary.matches, 0);
        assert_eq!(summary.match_percentage, 0.0);
        assert_eq!(summary.mismatched, 0);
        assert!(summary.mismatches.is_empty());
    }

    #[test]
    fn binary_summary_carries_report_values_unchanged() {
        let engine = BinaryDiffEngine::new();
        let report = engine.compare_windows(
            b"\x01\x02\x03",
            b"\x01\xFF\x03",
            &[ByteWindow::new(0, 3, "W")],
        );
        let structure = engine.check_structure(10_000, 2_000, Some(5));

        let summary = BinarySummary::new(report.clone(), Some(structure));
        assert_eq!(summary.total_matches, report.total_matches);
        assert_eq!(summary.overall_percentage, report.overall_percentage);
        assert_eq!(summary.windows.len(), 1);
        assert_eq!(summary.structure.as_ref().unwrap().record_count, 5);
    }

    #[test]
    fn summaries_serialize_to_json() {
        let engine = FieldDiffEngine::new();
        let result = engine.compare(&fields(&["1"]), &fields(&["2"]));
        let summary = FieldSummary::new(
            &result,
            Vec::new(),
            Some(ShiftHint {
                first_diff_field: 1,
                offset: 1,
            }),
            20,
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["expected_fields"], 1);
        assert_eq!(json["shift"]["offset"], 1);
    }
}
