/*!
 * chromsplit - split a JSONL/NDJSON file by the value of one field
 *
 * Streams the input once, line by line, and routes every record to the
 * output file of its category (`<prefix>_<category>.jsonl`):
 * - One output per declared category, created before the scan starts
 * - A catch-all output for records whose field is missing, malformed,
 *   or not a declared category
 * - Blank lines are skipped; every other line lands in exactly one output,
 *   in input order
 * - Outputs are flushed and closed on every exit path
 */

pub mod cancel;
pub mod cli_style;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod processor;
pub mod progress;
pub mod reader;
pub mod router;
pub mod stats;

// Re-export commonly used types
pub use cancel::{install_interrupt_handler, CancelToken};
pub use config::{default_chromosomes, parse_category_list, LogLevel, SplitConfig};
pub use error::{Result, SplitError};
pub use extract::{extract, FieldPath};
pub use processor::{process_file, process_reader};
pub use router::{Router, RouterOptions};
pub use stats::SplitStats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
