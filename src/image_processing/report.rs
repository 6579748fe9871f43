/// Per-file processing report
///
/// Renders one table row per input file with its outcome, the written file
/// (or the skip/failure reason) and how long it took.
use prettytable::{format, Cell, Row, Table};

use super::{ProcessingOutcome, ProcessingResult};
use crate::utils::format_duration;

/// Build the report table for a finished batch
pub fn build_report_table(results: &[ProcessingResult]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.set_titles(Row::new(vec![
        Cell::new("#"),
        Cell::new("Input"),
        Cell::new("Result"),
        Cell::new("Output / Reason"),
        Cell::new("Time"),
    ]));

    for (i, result) in results.iter().enumerate() {
        let (status, detail) = match &result.outcome {
            ProcessingOutcome::Converted { output_path } => (
                "converted",
                output_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            ProcessingOutcome::Skipped { reason } => ("skipped", reason.to_string()),
            ProcessingOutcome::Failed { error } => {
                ("failed", truncate(&format!("{:#}", error), 60))
            }
        };

        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(&truncate(&result.file_name(), 40)),
            Cell::new(status),
            Cell::new(&detail),
            Cell::new(&format_duration(result.processing_time)),
        ]));
    }

    table
}

/// Print the report table to stdout
pub fn print_report(results: &[ProcessingResult]) {
    if results.is_empty() {
        return;
    }

    println!();
    println!("REPORT ({} files)", results.len());
    build_report_table(results).printstd();
}

/// Truncate a string to `max_len` characters, marking the cut with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
