/*!
 * CLI Style System
 *
 * Styling helpers for the chromsplit binary: themed text, summary tables,
 * and human-readable sizes and durations.
 */

use crate::router::CategoryCount;
use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{style, StyledObject};

// ============================================================================
// THEME COLORS
// ============================================================================

/// Brand colors for consistent styling
pub struct Theme;

impl Theme {
    /// Primary accent color (cyan/blue)
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    /// Success color (green)
    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    /// Warning color (yellow)
    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    /// Error color (red)
    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Muted/secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Header style (bold cyan)
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }
}

/// Unicode icons for visual feedback
pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const ARROW_RIGHT: &'static str = "→";
}

/// Draw a section header with a line
pub fn section_header(title: &str) {
    let line_len = 50 - title.len().min(40);
    println!(
        "\n{} {}",
        Theme::header(title),
        Theme::muted("─".repeat(line_len))
    );
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a key-value table (used for the configuration block)
pub fn stats_table(items: &[(&str, String)]) -> Table {
    let mut table = create_minimal_table();

    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value)
                .fg(Color::White)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Summary data for a finished run
pub struct SplitSummary {
    pub lines_read: u64,
    pub records_written: u64,
    pub blank_lines: u64,
    pub unmatched: u64,
    pub input_size: String,
    pub duration: String,
    pub line_rate: String,
    pub byte_rate: String,
}

/// Create the end-of-run summary table
pub fn split_summary_table(summary: &SplitSummary) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Split Summary")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    table.add_row(vec![
        Cell::new("Lines Read"),
        Cell::new(summary.lines_read.to_string()).fg(Color::White),
    ]);

    table.add_row(vec![
        Cell::new("Records Written"),
        Cell::new(summary.records_written.to_string())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    if summary.blank_lines > 0 {
        table.add_row(vec![
            Cell::new("Blank Lines Skipped"),
            Cell::new(summary.blank_lines.to_string()).fg(Color::DarkGrey),
        ]);
    }

    if summary.unmatched > 0 {
        table.add_row(vec![
            Cell::new("Unmatched Records"),
            Cell::new(summary.unmatched.to_string()).fg(Color::Yellow),
        ]);
    }

    table.add_row(vec![
        Cell::new("Input Size"),
        Cell::new(summary.input_size.as_str()).fg(Color::White),
    ]);

    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(summary.duration.as_str()).fg(Color::White),
    ]);

    table.add_row(vec![
        Cell::new("Throughput"),
        Cell::new(format!("{} ({})", summary.line_rate, summary.byte_rate))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    table
}

/// Create the per-output table; empty outputs are dimmed
pub fn category_table(counts: &[CategoryCount], total_records: u64) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Category", "Records", "Share", "Size"]);

    for count in counts {
        let share = if total_records > 0 {
            format!("{:.1}%", count.records as f64 * 100.0 / total_records as f64)
        } else {
            "-".to_string()
        };
        let color = if count.records == 0 {
            Color::DarkGrey
        } else {
            Color::White
        };

        table.add_row(vec![
            Cell::new(&count.category).fg(Color::Cyan),
            Cell::new(count.records.to_string())
                .fg(color)
                .set_alignment(CellAlignment::Right),
            Cell::new(share).fg(color).set_alignment(CellAlignment::Right),
            Cell::new(format_bytes(count.bytes))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Format bytes into human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f = bytes as f64;
    let base = 1024.0_f64;
    let exp = (bytes_f.ln() / base.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f / base.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.2} {}", value, UNITS[exp])
    }
}

/// Format duration into human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs % 3600.0) / 60.0).floor();
        format!("{}h {}m", hours, mins)
    }
}

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "\n{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
    eprintln!();
}

/// Print a styled warning message
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}

/// Print a styled success message
pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS.to_string()),
        Theme::success(message)
    );
}

/// Print a styled info message
pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO.to_string()), message);
}
