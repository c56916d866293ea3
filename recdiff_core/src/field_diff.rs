use recdiff_common::NamedRange;
use serde::Serialize;
use tracing::debug;

/// 0-based index of the record-type discriminator (field 3 in layout
/// terms) in the legacy delimited formats this tool verifies.
const RECORD_TYPE_FIELD: usize = 2;

/// A field present on both sides with unequal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    /// 1-based field ordinal.
    pub field: usize,
    pub actual: String,
    pub expected: String,
}

/// A field the expected record has but the actual record lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    /// 1-based field ordinal.
    pub field: usize,
    pub expected: String,
}

/// A field the actual record has beyond the expected record's length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraField {
    /// 1-based field ordinal.
    pub field: usize,
    pub actual: String,
}

/// Result of a positional field-by-field comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiffResult {
    /// Field count on the actual (generated) side
    pub actual_count: usize,
    /// Field count on the expected (reference) side
    pub expected_count: usize,
    /// Number of positions where both sides hold equal values
    pub matches: usize,
    /// Positions compared on both sides with unequal values
    pub mismatches: Vec<FieldMismatch>,
    /// Positions the expected side has beyond the actual side
    pub missing: Vec<MissingField>,
    /// Positions the actual side has beyond the expected side
    pub extra: Vec<ExtraField>,
}

impl FieldDiffResult {
    /// True when every expected field is present and equal.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.missing.is_empty() && self.extra.is_empty()
    }

    /// Matches as a percentage of the expected field count, 0 when the
    /// expected side is empty.
    pub fn match_percentage(&self) -> f64 {
        if self.expected_count == 0 {
            0.0
        } else {
            self.matches as f64 / self.expected_count as f64 * 100.0
        }
    }
}

/// Match accuracy aggregated over one named field range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeAccuracy {
    pub label: String,
    /// 1-based ordinal of the first field in the range.
    pub first_field: usize,
    /// 1-based ordinal of the last field in the range.
    pub last_field: usize,
    /// Matching positions within the range.
    pub matches: usize,
    /// Positions present on both sides within the range.
    pub compared: usize,
    /// `matches / compared * 100`, 0 when the range has no overlap.
    pub percentage: f64,
}

/// One row of context around the first difference, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRow {
    /// 1-based field ordinal.
    pub field: usize,
    pub actual: Option<String>,
    pub expected: Option<String>,
}

/// Engine for segmenting delimited records and comparing them
/// position by position.
pub struct FieldDiffEngine {
    delimiter: char,
}

impl FieldDiffEngine {
    pub fn new() -> Self {
        Self { delimiter: '|' }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Split a record into its field values. Empty values between
    /// consecutive delimiters are preserved; never fails.
    pub fn segment(&self, record: &str) -> Vec<String> {
        record.split(self.delimiter).map(str::to_string).collect()
    }

    /// Record-type discriminator: the value of field 3. Records too
    /// short to carry one classify as unknown (`None`) rather than
    /// failing.
    pub fn record_type<'a>(&self, fields: &'a [String]) -> Option<&'a str> {
        if fields.len() > RECORD_TYPE_FIELD {
            Some(fields[RECORD_TYPE_FIELD].as_str())
        } else {
            None
        }
    }

    /// Find the first record of the wanted type in a batch of raw
    /// delimited records.
    pub fn find_record<'a>(&self, records: &'a [String], wanted: &str) -> Option<&'a str> {
        records.iter().map(String::as_str).find(|record| {
            let fields = self.segment(record);
            self.record_type(&fields) == Some(wanted)
        })
    }

    /// Segment both records and compare them.
    pub fn compare_records(&self, actual: &str, expected: &str) -> FieldDiffResult {
        self.compare(&self.segment(actual), &self.segment(expected))
    }

    /// Compare two field sequences positionally with strict value
    /// equality. Pure; no normalization or trimming is applied.
    pub fn compare(&self, actual: &[String], expected: &[String]) -> FieldDiffResult {
        let common = actual.len().min(expected.len());

        let mut matches = 0;
        let mut mismatches = Vec::new();

        for i in 0..common {
            if actual[i] == expected[i] {
                matches += 1;
            } else {
                mismatches.push(FieldMismatch {
                    field: i + 1,
                    actual: actual[i].clone(),
                    expected: expected[i].clone(),
                });
            }
        }

        let missing = expected[common..]
            .iter()
            .enumerate()
            .map(|(i, value)| MissingField {
                field: common + i + 1,
                expected: value.clone(),
            })
            .collect();

        let extra = actual[common..]
            .iter()
            .enumerate()
            .map(|(i, value)| ExtraField {
                field: common + i + 1,
                actual: value.clone(),
            })
            .collect();

        debug!(
            actual = actual.len(),
            expected = expected.len(),
            matches,
            "compared field sequences"
        );

        FieldDiffResult {
            actual_count: actual.len(),
            expected_count: expected.len(),
            matches,
            mismatches,
            missing,
            extra,
        }
    }

    /// Aggregate match accuracy over named field ranges. Only positions
    /// present on both sides count; a range with zero overlap reports
    /// 0%, not an error.
    pub fn range_accuracy(
        &self,
        actual: &[String],
        expected: &[String],
        ranges: &[NamedRange],
    ) -> Vec<RangeAccuracy> {
        let common = actual.len().min(expected.len());

        ranges
            .iter()
            .map(|range| {
                let start = range.start.min(common);
                let end = range.end.min(common).max(start);

                let matches = (start..end).filter(|&i| actual[i] == expected[i]).count();
                let compared = end - start;
                let percentage = if compared == 0 {
                    0.0
                } else {
                    matches as f64 / compared as f64 * 100.0
                };

                RangeAccuracy {
                    label: range.label.clone(),
                    first_field: range.start + 1,
                    last_field: range.end,
                    matches,
                    compared,
                    percentage,
                }
            })
            .collect()
    }

    /// Rows of actual/expected values around a 0-based index, for
    /// showing the neighborhood of the first difference.
    pub fn context_rows(
        &self,
        actual: &[String],
        expected: &[String],
        index: usize,
        radius: usize,
    ) -> Vec<ContextRow> {
        let start = index.saturating_sub(radius);
        let end = (index + radius + 1).max(start).min(actual.len().max(expected.len()));

        (start..end)
            .map(|i| ContextRow {
                field: i + 1,
                actual: actual.get(i).cloned(),
                expected: expected.get(i).cloned(),
            })
            .collect()
    }
}

impl Default for FieldDiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
