/*!
 * Configuration types for chromsplit
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SplitError};

/// Main configuration for a split run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Input JSONL file
    #[serde(default)]
    pub input: PathBuf,

    /// Output file prefix; outputs are named `<prefix>_<category>.jsonl`
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Field path to route on (dotted for nested keys)
    #[serde(default = "default_field")]
    pub field: String,

    /// Declared categories, in display order
    #[serde(default = "default_chromosomes")]
    pub categories: Vec<String>,

    /// Catch-all category for records that match nothing
    #[serde(default = "default_unknown_category")]
    pub unknown_category: String,

    /// Write buffer size per output in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Maximum accepted record length in bytes
    #[serde(default = "default_max_line_size")]
    pub max_line_size: usize,

    /// Log a progress line every N input lines (0 = never)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Show progress bar
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            prefix: default_prefix(),
            field: default_field(),
            categories: default_chromosomes(),
            unknown_category: default_unknown_category(),
            buffer_size: default_buffer_size(),
            max_line_size: default_max_line_size(),
            progress_interval: default_progress_interval(),
            show_progress: true,
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including per-record traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    "output".to_string()
}

fn default_field() -> String {
    "chr".to_string()
}

fn default_unknown_category() -> String {
    "unknown".to_string()
}

fn default_buffer_size() -> usize {
    64 * 1024 // 64 KB
}

fn default_max_line_size() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_progress_interval() -> u64 {
    500_000
}

/// Default category list: chr1..chr22, chrX, chrY, chrM
pub fn default_chromosomes() -> Vec<String> {
    (1..=22)
        .map(|i| format!("chr{}", i))
        .chain(["chrX", "chrY", "chrM"].iter().map(|s| s.to_string()))
        .collect()
}

/// Parse a comma-separated category list.
///
/// Entries are trimmed; empty entries and repeats are dropped, keeping the
/// first occurrence. An empty string yields the default chromosome list.
pub fn parse_category_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return default_chromosomes();
    }

    let mut seen = HashSet::new();
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Output file path for a category: `<prefix>_<category>.jsonl`
pub fn output_path(prefix: &str, category: &str) -> PathBuf {
    PathBuf::from(format!("{}_{}.jsonl", prefix, category))
}

impl SplitConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SplitError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: SplitConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SplitError::Config(format!("TOML serialize error: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| {
            SplitError::Config(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Check values that would make a run meaningless before touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(SplitError::Config("Output prefix must not be empty".into()));
        }
        if self.field.is_empty() {
            return Err(SplitError::Config("Field name must not be empty".into()));
        }
        if self.unknown_category.is_empty() {
            return Err(SplitError::Config(
                "Unknown category name must not be empty".into(),
            ));
        }
        if self.buffer_size == 0 {
            return Err(SplitError::Config("Buffer size must be positive".into()));
        }
        if self.max_line_size == 0 {
            return Err(SplitError::Config("Maximum line size must be positive".into()));
        }
        if self.categories.iter().any(|c| *c == self.unknown_category) {
            return Err(SplitError::Config(format!(
                "Category '{}' collides with the catch-all category",
                self.unknown_category
            )));
        }
        Ok(())
    }
}
