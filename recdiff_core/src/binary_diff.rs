use recdiff_common::ByteWindow;
use serde::Serialize;
use tracing::debug;

/// Byte-level accuracy of one named window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowResult {
    pub label: String,
    pub start: usize,
    pub end: usize,
    /// Bytes compared (bounded by both buffers).
    pub compared: usize,
    /// Bytes equal at the same offset.
    pub matches: usize,
    /// `matches / compared * 100`, 0 when nothing was compared.
    pub percentage: f64,
    /// Hex of the actual slice, present when the window is not a full match.
    pub actual_hex: Option<String>,
    /// Hex of the expected slice, present when the window is not a full match.
    pub expected_hex: Option<String>,
}

impl WindowResult {
    pub fn is_full_match(&self) -> bool {
        self.compared > 0 && self.matches == self.compared
    }
}

/// All window results plus whole-buffer aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub windows: Vec<WindowResult>,
    /// Windows skipped because their start lies beyond a buffer.
    pub skipped: usize,
    pub total_compared: usize,
    pub total_matches: usize,
    /// Accuracy across all compared window bytes, 0 when none.
    pub overall_percentage: f64,
    pub actual_len: usize,
    pub expected_len: usize,
    pub len_match: bool,
}

/// Record-count / record-size verification over a flat buffer meant to
/// hold N fixed-size records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureCheck {
    pub actual_len: usize,
    pub expected_record_size: usize,
    pub expected_record_count: Option<usize>,
    /// `actual_len / expected_record_size`, integer division.
    pub record_count: usize,
    /// `actual_len / record_count`, 0 when the buffer holds no full record.
    pub derived_record_size: usize,
    pub size_match: bool,
    pub count_match: Option<bool>,
}

/// Engine for comparing fixed-offset binary records window by window.
pub struct BinaryDiffEngine;

impl BinaryDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compare the named windows of two buffers byte-for-byte.
    ///
    /// A window whose start lies beyond either buffer is skipped, not an
    /// error; a window is otherwise clamped to `[start, min(end, len))`
    /// on each side and compared up to the shorter slice.
    pub fn compare_windows(
        &self,
        actual: &[u8],
        expected: &[u8],
        windows: &[ByteWindow],
    ) -> WindowReport {
        let mut results = Vec::new();
        let mut skipped = 0;
        let mut total_compared = 0;
        let mut total_matches = 0;

        for window in windows {
            if window.start >= actual.len() || window.start >= expected.len() {
                debug!(label = %window.label, start = window.start, "window beyond buffer, skipped");
                skipped += 1;
                continue;
            }

            let actual_end = window.end.min(actual.len()).max(window.start);
            let expected_end = window.end.min(expected.len()).max(window.start);
            let actual_slice = &actual[window.start..actual_end];
            let expected_slice = &expected[window.start..expected_end];

            let compared = actual_slice.len().min(expected_slice.len());
            let matches = (0..compared)
                .filter(|&i| actual_slice[i] == expected_slice[i])
                .count();
            let percentage = if compared == 0 {
                0.0
            } else {
                matches as f64 / compared as f64 * 100.0
            };

            total_compared += compared;
            total_matches += matches;

            let full_match = compared > 0 && matches == compared;
            let (actual_hex, expected_hex) = if full_match {
                (None, None)
            } else {
                (
                    Some(hex::encode(actual_slice)),
                    Some(hex::encode(expected_slice)),
                )
            };

            results.push(WindowResult {
                label: window.label.clone(),
                start: window.start,
                end: window.end,
                compared,
                matches,
                percentage,
                actual_hex,
                expected_hex,
            });
        }

        let overall_percentage = if total_compared == 0 {
            0.0
        } else {
            total_matches as f64 / total_compared as f64 * 100.0
        };

        WindowReport {
            windows: results,
            skipped,
            total_compared,
            total_matches,
            overall_percentage,
            actual_len: actual.len(),
            expected_len: expected.len(),
            len_match: actual.len() == expected.len(),
        }
    }

    /// Verify the buffer divides into the expected fixed-size records.
    pub fn check_structure(
        &self,
        actual_len: usize,
        expected_record_size: usize,
        expected_record_count: Option<usize>,
    ) -> StructureCheck {
        let record_count = if expected_record_size == 0 {
            0
        } else {
            actual_len / expected_record_size
        };
        let derived_record_size = if record_count == 0 {
            0
        } else {
            actual_len / record_count
        };

        StructureCheck {
            actual_len,
            expected_record_size,
            expected_record_count,
            record_count,
            derived_record_size,
            size_match: derived_record_size == expected_record_size,
            count_match: expected_record_count.map(|count| count == record_count),
        }
    }

    /// Format one row of a hex dump: offset, byte pairs, ASCII gutter.
    /// Rows are 16 bytes wide; short rows are padded so gutters align.
    pub fn format_hex_line(&self, offset: usize, data: &[u8]) -> String {
        const ROW_WIDTH: usize = 16;

        let pairs: Vec<String> = (0..ROW_WIDTH)
            .map(|i| match data.get(i) {
                Some(byte) => format!("{byte:02X}"),
                None => "  ".to_string(),
            })
            .collect();

        let ascii: String = data
            .iter()
            .map(|&byte| {
                if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();

        format!(
            "{offset:08X}  {} {}  |{ascii}|",
            pairs[..ROW_WIDTH / 2].join(" "),
            pairs[ROW_WIDTH / 2..].join(" ")
        )
    }
}

impl Default for BinaryDiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
