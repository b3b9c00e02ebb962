/*!
 * Statistics for a completed split run
 */

use std::time::Duration;

use crate::cli_style::{
    category_table, format_bytes, format_duration, section_header, split_summary_table,
    SplitSummary,
};
use crate::router::CategoryCount;

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct SplitStats {
    /// Input lines seen, blank lines included
    pub lines_read: u64,
    /// Records written across all outputs
    pub records_written: u64,
    /// Blank lines skipped
    pub blank_lines: u64,
    /// Input bytes consumed, terminators included
    pub bytes_read: u64,
    /// Output bytes written, newlines included
    pub bytes_written: u64,
    /// Per-output totals, declaration order with the catch-all last
    pub per_category: Vec<CategoryCount>,
    /// Name of the catch-all output
    pub unknown_category: String,
    pub duration: Duration,
}

impl SplitStats {
    pub fn lines_per_sec(&self) -> f64 {
        rate(self.lines_read as f64, self.duration)
    }

    pub fn bytes_per_sec(&self) -> f64 {
        rate(self.bytes_read as f64, self.duration)
    }

    /// Records written for one category, if it was an output of the run
    pub fn count_for(&self, category: &str) -> Option<u64> {
        self.per_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.records)
    }

    /// Records that matched no declared category
    pub fn unknown_count(&self) -> u64 {
        self.count_for(&self.unknown_category).unwrap_or(0)
    }

    /// Print formatted statistics
    pub fn print(&self) {
        let summary = SplitSummary {
            lines_read: self.lines_read,
            records_written: self.records_written,
            blank_lines: self.blank_lines,
            unmatched: self.unknown_count(),
            input_size: format_bytes(self.bytes_read),
            duration: format_duration(self.duration.as_secs_f64()),
            line_rate: format!("{:.0} lines/s", self.lines_per_sec()),
            byte_rate: format!("{}/s", format_bytes(self.bytes_per_sec() as u64)),
        };

        println!("{}", split_summary_table(&summary));

        section_header("Outputs");
        println!("{}", category_table(&self.per_category, self.records_written));
    }
}

fn rate(amount: f64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        amount / secs
    } else {
        0.0
    }
}
