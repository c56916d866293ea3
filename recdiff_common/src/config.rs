use crate::{ByteWindow, NamedRange, RecDiffError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How many mismatches a rendered report lists before truncating.
pub const DEFAULT_MAX_MISMATCHES: usize = 20;

/// How far the shift detector probes around the first difference.
pub const DEFAULT_PROBE_RADIUS: usize = 3;

/// Describes one fixed-layout record format: delimiter, expected shape,
/// and the named field ranges / byte windows to aggregate accuracy over.
///
/// Loaded from a TOML file supplied by the caller. Every field has a
/// default so a partial layout (or no layout at all) still works; the
/// legacy formats this tool was built for vary per client, so nothing
/// here is baked into the comparison logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Field separator for delimited records.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Field count a well-formed record should have, if known.
    #[serde(default)]
    pub expected_field_count: Option<usize>,

    /// Fixed record size in bytes, for the binary structure check.
    #[serde(default)]
    pub record_size: Option<usize>,

    /// Number of records the binary buffer should hold.
    #[serde(default)]
    pub record_count: Option<usize>,

    /// Mismatch list truncation for rendered reports.
    #[serde(default = "default_max_mismatches")]
    pub max_mismatches: usize,

    /// Probe radius for shift detection.
    #[serde(default = "default_probe_radius")]
    pub probe_radius: usize,

    /// Named field ranges, 1-based inclusive ordinals as written in
    /// layout sheets.
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,

    /// Named byte windows, absolute half-open offsets.
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
}

/// A field range as written in a layout file: fields `first..=last`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSpec {
    pub first: usize,
    pub last: usize,
    pub label: String,
}

/// A byte window as written in a layout file: bytes `start..end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSpec {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

fn default_delimiter() -> char {
    '|'
}

fn default_max_mismatches() -> usize {
    DEFAULT_MAX_MISMATCHES
}

fn default_probe_radius() -> usize {
    DEFAULT_PROBE_RADIUS
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            expected_field_count: None,
            record_size: None,
            record_count: None,
            max_mismatches: default_max_mismatches(),
            probe_radius: default_probe_radius(),
            ranges: Vec::new(),
            windows: Vec::new(),
        }
    }
}

impl Layout {
    pub fn load(path: &Path) -> Result<Self, RecDiffError> {
        let data = fs::read_to_string(path)?;
        toml::from_str(&data)
            .map_err(|e| RecDiffError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn named_ranges(&self) -> Vec<NamedRange> {
        self.ranges
            .iter()
            .map(|r| NamedRange::from_ordinals(r.first, r.last, r.label.clone()))
            .collect()
    }

    pub fn byte_windows(&self) -> Vec<ByteWindow> {
        self.windows
            .iter()
            .map(|w| ByteWindow::new(w.start, w.end, w.label.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_layout_uses_defaults() {
        let layout: Layout = toml::from_str("").unwrap();
        assert_eq!(layout.delimiter, '|');
        assert_eq!(layout.max_mismatches, DEFAULT_MAX_MISMATCHES);
        assert_eq!(layout.probe_radius, DEFAULT_PROBE_RADIUS);
        assert!(layout.ranges.is_empty());
        assert!(layout.windows.is_empty());
    }

    #[test]
    fn parses_ranges_and_windows() {
        let layout: Layout = toml::from_str(
            r#"
            expected_field_count = 533
            record_size = 2000
            record_count = 5

            [[ranges]]
            first = 1
            last = 20
            label = "Header and Identifiers"

            [[windows]]
            start = 6
            end = 12
            label = "Binary Control Pattern"
            "#,
        )
        .unwrap();

        assert_eq!(layout.expected_field_count, Some(533));
        let ranges = layout.named_ranges();
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[0].end, 20);
        let windows = layout.byte_windows();
        assert_eq!(windows[0].start, 6);
        assert_eq!(windows[0].end, 12);
    }

    #[test]
    fn load_reports_parse_errors_as_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"delimiter = [not toml]]").unwrap();
        let err = Layout::load(file.path()).unwrap_err();
        assert!(matches!(err, RecDiffError::Config(_)));
    }

    #[test]
    fn load_missing_file_is_io() {
        let err = Layout::load(Path::new("/nonexistent/layout.toml")).unwrap_err();
        assert!(matches!(err, RecDiffError::Io(_)));
    }
}
