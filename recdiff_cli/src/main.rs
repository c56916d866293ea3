use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use recdiff_common::Layout;
use recdiff_core::{
    detect_shift, first_mismatch, load_binary, load_text_records, BinaryDiffEngine, BinarySummary,
    FieldDiffEngine, FieldSummary, ShiftHint,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recdiff")]
#[command(author = "RecDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Field and byte accuracy reports for fixed-layout record migration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two delimited text records field by field
    Fields {
        /// Generated record file
        actual: PathBuf,

        /// Known-correct reference record file
        expected: PathBuf,

        /// Layout TOML (delimiter, expected counts, ranges, windows)
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Field delimiter (overrides layout)
        #[arg(long)]
        delimiter: Option<char>,

        /// Compare the first record of this type (e.g. P) on each side
        #[arg(short = 't', long)]
        record_type: Option<String>,

        /// Compare the record at this 1-based line index on each side
        #[arg(short = 'r', long)]
        record: Option<usize>,

        /// Mismatch list truncation (overrides layout)
        #[arg(long)]
        max_mismatches: Option<usize>,

        /// Shift probe radius (overrides layout)
        #[arg(long)]
        probe_radius: Option<usize>,

        /// Rows of context to show around the first difference
        #[arg(short = 'C', long, default_value_t = 5)]
        context: usize,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },

    /// Compare two fixed-width binary buffers window by window
    Bytes {
        /// Generated binary file
        actual: PathBuf,

        /// Known-correct reference binary file
        expected: PathBuf,

        /// Layout TOML (record size/count, byte windows)
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Fixed record size in bytes (overrides layout)
        #[arg(long)]
        record_size: Option<usize>,

        /// Expected record count (overrides layout)
        #[arg(long)]
        record_count: Option<usize>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() {
    // Logs go to stderr so JSON output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Fields {
            actual,
            expected,
            layout,
            delimiter,
            record_type,
            record,
            max_mismatches,
            probe_radius,
            context,
            json,
            no_color,
        } => run_fields(
            actual,
            expected,
            layout,
            delimiter,
            record_type,
            record,
            max_mismatches,
            probe_radius,
            context,
            json,
            no_color,
        ),
        Commands::Bytes {
            actual,
            expected,
            layout,
            record_size,
            record_count,
            json,
            no_color,
        } => run_bytes(
            actual,
            expected,
            layout,
            record_size,
            record_count,
            json,
            no_color,
        ),
    };

    if let Err(e) = outcome {
        error!("Comparison failed: {:#}", e);
        std::process::exit(1);
    }
}

fn load_layout(path: Option<PathBuf>) -> anyhow::Result<Layout> {
    match path {
        Some(path) => {
            let layout = Layout::load(&path)
                .with_context(|| format!("loading layout {}", path.display()))?;
            info!("Using layout: {}", path.display());
            Ok(layout)
        }
        None => Ok(Layout::default()),
    }
}

fn run_fields(
    actual_path: PathBuf,
    expected_path: PathBuf,
    layout_path: Option<PathBuf>,
    delimiter: Option<char>,
    record_type: Option<String>,
    record_index: Option<usize>,
    max_mismatches: Option<usize>,
    probe_radius: Option<usize>,
    context: usize,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let mut layout = load_layout(layout_path)?;
    if let Some(delimiter) = delimiter {
        layout.delimiter = delimiter;
    }
    if let Some(max) = max_mismatches {
        layout.max_mismatches = max;
    }
    if let Some(radius) = probe_radius {
        layout.probe_radius = radius;
    }

    let actual_records = load_text_records(&actual_path)?;
    let expected_records = load_text_records(&expected_path)?;

    info!(
        "Record counts: actual {} / expected {}",
        actual_records.len(),
        expected_records.len()
    );

    let engine = FieldDiffEngine::new().with_delimiter(layout.delimiter);

    let actual_record = select_record(&engine, &actual_records, &record_type, record_index)
        .with_context(|| format!("selecting record from {}", actual_path.display()))?;
    let expected_record = select_record(&engine, &expected_records, &record_type, record_index)
        .with_context(|| format!("selecting record from {}", expected_path.display()))?;

    let actual_fields = engine.segment(actual_record);
    let expected_fields = engine.segment(expected_record);

    let result = engine.compare(&actual_fields, &expected_fields);
    let ranges = engine.range_accuracy(&actual_fields, &expected_fields, &layout.named_ranges());

    let first_diff = first_mismatch(&actual_fields, &expected_fields);
    let shift = first_diff.and_then(|index| {
        detect_shift(&actual_fields, &expected_fields, index, layout.probe_radius).map(|offset| {
            ShiftHint {
                first_diff_field: index + 1,
                offset,
            }
        })
    });

    let summary = FieldSummary::new(&result, ranges, shift, layout.max_mismatches);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let use_color = !no_color && std::io::stdout().is_terminal();
    render_field_summary(&summary, &layout, use_color);

    if context > 0 {
        if let Some(index) = first_diff {
            render_context(&engine, &actual_fields, &expected_fields, index, context);
        }
    }

    Ok(())
}

fn run_bytes(
    actual_path: PathBuf,
    expected_path: PathBuf,
    layout_path: Option<PathBuf>,
    record_size: Option<usize>,
    record_count: Option<usize>,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let mut layout = load_layout(layout_path)?;
    if record_size.is_some() {
        layout.record_size = record_size;
    }
    if record_count.is_some() {
        layout.record_count = record_count;
    }

    let actual = load_binary(&actual_path)?;
    let expected = load_binary(&expected_path)?;

    info!(
        "Buffer sizes: actual {} / expected {} bytes",
        actual.len(),
        expected.len()
    );

    let engine = BinaryDiffEngine::new();
    let report = engine.compare_windows(&actual, &expected, &layout.byte_windows());
    let structure = layout
        .record_size
        .map(|size| engine.check_structure(actual.len(), size, layout.record_count));

    let summary = BinarySummary::new(report, structure);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let use_color = !no_color && std::io::stdout().is_terminal();
    render_binary_summary(&engine, &summary, &actual, &expected, use_color);

    Ok(())
}

fn select_record<'a>(
    engine: &FieldDiffEngine,
    records: &'a [String],
    record_type: &Option<String>,
    record_index: Option<usize>,
) -> anyhow::Result<&'a str> {
    if let Some(wanted) = record_type {
        return engine
            .find_record(records, wanted)
            .ok_or_else(|| anyhow::anyhow!("no record of type '{wanted}' found"));
    }

    let index = record_index.unwrap_or(1);
    if index == 0 {
        bail!("record index is 1-based");
    }
    records
        .get(index - 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("record {index} not present ({} records)", records.len()))
}

fn status_mark(ok: bool, use_color: bool) -> String {
    match (ok, use_color) {
        (true, true) => "\x1b[32mOK\x1b[0m".to_string(),
        (false, true) => "\x1b[31mDIFF\x1b[0m".to_string(),
        (true, false) => "OK".to_string(),
        (false, false) => "DIFF".to_string(),
    }
}

fn render_field_summary(summary: &FieldSummary, layout: &Layout, use_color: bool) {
    println!("\n{}", "=".repeat(80));
    println!("Field Comparison");
    println!("{}", "=".repeat(80));
    println!("  Actual fields:    {}", summary.actual_fields);
    println!("  Expected fields:  {}", summary.expected_fields);
    if let Some(expected_count) = layout.expected_field_count {
        let mark = status_mark(summary.expected_fields == expected_count, use_color);
        println!("  Layout count:     {} {}", expected_count, mark);
    }
    println!("  Matching:         {}", summary.matches);
    println!("  Mismatched:       {}", summary.mismatched);
    println!("  Missing:          {}", summary.missing);
    println!("  Extra:            {}", summary.extra);
    println!("  Match percentage: {:.1}%", summary.match_percentage);

    if !summary.ranges.is_empty() {
        println!("\n{}", "-".repeat(80));
        println!("Accuracy by Range");
        println!("{}", "-".repeat(80));
        for range in &summary.ranges {
            println!(
                "  {:<28} ({:3}-{:3}): {:3}/{:3} matches ({:5.1}%)",
                range.label,
                range.first_field,
                range.last_field,
                range.matches,
                range.compared,
                range.percentage
            );
        }
    }

    if !summary.mismatches.is_empty() {
        println!("\n{}", "-".repeat(80));
        println!("Mismatches (first {})", summary.mismatches.len());
        println!("{}", "-".repeat(80));
        for mismatch in &summary.mismatches {
            println!(
                "  Field {:3}: '{}' != '{}'",
                mismatch.field, mismatch.actual, mismatch.expected
            );
        }
        if summary.mismatches_elided > 0 {
            println!("  ... and {} more", summary.mismatches_elided);
        }
    }

    if let Some(shift) = &summary.shift {
        println!(
            "\n  Possible shift: field {} matches expected field {} (offset {:+})",
            shift.first_diff_field,
            shift.first_diff_field as isize + shift.offset,
            shift.offset
        );
        println!("  (heuristic hint only; re-run with the sequence shifted to confirm)");
    }

    println!("{}", "=".repeat(80));
}

fn render_context(
    engine: &FieldDiffEngine,
    actual: &[String],
    expected: &[String],
    index: usize,
    radius: usize,
) {
    println!("\nContext around first difference (field {}):", index + 1);
    println!("{:>6} | {:<30} | {:<30}", "Field", "Actual", "Expected");
    println!("{}", "-".repeat(72));

    for row in engine.context_rows(actual, expected, index, radius) {
        let actual_value = row.actual.as_deref().unwrap_or("(missing)");
        let expected_value = row.expected.as_deref().unwrap_or("(missing)");
        let marker = if row.actual != row.expected { " <--" } else { "" };
        println!(
            "{:>6} | {:<30} | {:<30}{}",
            row.field, actual_value, expected_value, marker
        );
    }
}

fn render_binary_summary(
    engine: &BinaryDiffEngine,
    summary: &BinarySummary,
    actual: &[u8],
    expected: &[u8],
    use_color: bool,
) {
    println!("\n{}", "=".repeat(80));
    println!("Binary Window Comparison");
    println!("{}", "=".repeat(80));
    println!("  Actual size:   {} bytes", summary.actual_len);
    println!("  Expected size: {} bytes", summary.expected_len);
    println!(
        "  Size match:    {}",
        status_mark(summary.len_match, use_color)
    );

    if !summary.windows.is_empty() {
        println!("\n{}", "-".repeat(80));
        println!("Windows");
        println!("{}", "-".repeat(80));
        for window in &summary.windows {
            let status = if window.is_full_match() {
                status_mark(true, use_color)
            } else {
                format!("{:.1}%", window.percentage)
            };
            println!(
                "  {:<36} [{:4}-{:4}]: {}",
                window.label, window.start, window.end, status
            );

            if !window.is_full_match() && window.compared > 0 {
                let end = window.start + window.compared;
                for line in hex_dump(engine, "actual", &actual[window.start..end], window.start) {
                    println!("{line}");
                }
                for line in hex_dump(engine, "expect", &expected[window.start..end], window.start) {
                    println!("{line}");
                }
            }
        }

        println!("{}", "-".repeat(80));
        println!(
            "  Overall window accuracy: {:.1}% ({}/{} bytes)",
            summary.overall_percentage, summary.total_matches, summary.total_compared
        );
        if summary.windows_skipped > 0 {
            println!(
                "  Windows skipped (beyond buffer): {}",
                summary.windows_skipped
            );
        }
    }

    if let Some(structure) = &summary.structure {
        println!("\n{}", "-".repeat(80));
        println!("Record Structure");
        println!("{}", "-".repeat(80));
        match structure.expected_record_count {
            Some(expected) => println!(
                "  Records:     {} (expected: {}) {}",
                structure.record_count,
                expected,
                status_mark(structure.count_match == Some(true), use_color)
            ),
            None => println!("  Records:     {}", structure.record_count),
        }
        println!(
            "  Record size: {} bytes (expected: {}) {}",
            structure.derived_record_size,
            structure.expected_record_size,
            status_mark(structure.size_match, use_color)
        );
    }

    println!("{}", "=".repeat(80));
}

fn hex_dump(engine: &BinaryDiffEngine, side: &str, data: &[u8], base_offset: usize) -> Vec<String> {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "    {side} {}",
                engine.format_hex_line(base_offset + i * 16, chunk)
            )
        })
        .collect()
}
