/*!
 * chromsplit CLI - Command Line Interface
 */

use chromsplit::{
    cli_style::{self, print_error, print_info, print_success, section_header, stats_table},
    config::{parse_category_list, LogLevel, SplitConfig},
    error::{Result, SplitError, EXIT_SUCCESS},
    install_interrupt_handler, logging, process_file, CancelToken,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  chromsplit --input input.jsonl --prefix output
  chromsplit -i input.jsonl --prefix output
  chromsplit -i data.jsonl --prefix result --chr-field-name chromosome
  chromsplit -i data.jsonl --chr-names \"chr1,chr2,chrX\"
  chromsplit -i data.jsonl -c \"chr1,chr2,chrX\" --prefix my_output";

#[derive(Parser)]
#[command(name = "chromsplit")]
#[command(version, about = "Split a JSONL/NDJSON file by chromosome (or any field)", long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Input JSONL file path (required unless set in --config)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file prefix [default: output]
    #[arg(long)]
    prefix: Option<String>,

    /// Field to split on; dotted paths reach nested keys [default: chr]
    #[arg(long = "chr-field-name", alias = "field", value_name = "FIELD")]
    field: Option<String>,

    /// Comma-separated category names [default: chr1..chr22,chrX,chrY,chrM]
    #[arg(short = 'c', long = "chr-names", value_name = "LIST")]
    chr_names: Option<String>,

    /// Name of the catch-all output [default: unknown]
    #[arg(long = "unknown-name", value_name = "NAME")]
    unknown_name: Option<String>,

    /// Write buffer per output in KB [default: 64]
    #[arg(long, value_name = "KB")]
    buffer_size: Option<usize>,

    /// Maximum line length in MB [default: 10]
    #[arg(long, value_name = "MB")]
    max_line_size: Option<usize>,

    /// Log progress every N lines, 0 disables [default: 500000]
    #[arg(long, value_name = "LINES")]
    progress_interval: Option<u64>,

    /// Load settings from a TOML file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective settings to a TOML file and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to a file instead of stderr
    #[arg(long = "log", value_name = "FILE")]
    log: Option<PathBuf>,

    /// Verbose logging (same as --log-level debug)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Do not print the configuration and summary tables
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_error(&e.to_string(), e.hint());
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    if let Some(ref path) = cli.write_config {
        config.to_file(path)?;
        print_success(&format!("Configuration written to {}", path.display()));
        return Ok(());
    }

    if config.input.as_os_str().is_empty() {
        return Err(SplitError::Config(
            "Input file is required (--input)".to_string(),
        ));
    }

    if let Err(e) = logging::init_logging(&config) {
        cli_style::print_warning(&format!("Failed to initialize logging: {}", e));
    }

    if !cli.quiet {
        print_configuration(&config);
    }

    let cancel = CancelToken::new();
    if let Err(e) = install_interrupt_handler(&cancel) {
        cli_style::print_warning(&format!("Failed to install interrupt handler: {}", e));
    }

    let stats = process_file(&config, &cancel)?;

    if !cli.quiet {
        println!();
        stats.print();
        print_success(&format!(
            "Split {} records into {} files",
            stats.records_written,
            stats.per_category.len()
        ));
    }

    Ok(())
}

/// Merge the optional config file with command-line overrides
fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let mut config = match cli.config {
        Some(ref path) => SplitConfig::from_file(path)?,
        None => SplitConfig::default(),
    };

    if let Some(ref input) = cli.input {
        config.input = input.clone();
    }
    if let Some(ref prefix) = cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(ref field) = cli.field {
        config.field = field.clone();
    }
    if let Some(ref names) = cli.chr_names {
        config.categories = parse_category_list(names);
    }
    if let Some(ref unknown) = cli.unknown_name {
        config.unknown_category = unknown.clone();
    }
    if let Some(kb) = cli.buffer_size {
        config.buffer_size = kb.saturating_mul(1024);
    }
    if let Some(mb) = cli.max_line_size {
        config.max_line_size = mb.saturating_mul(1024 * 1024);
    }
    if let Some(interval) = cli.progress_interval {
        config.progress_interval = interval;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;
    if cli.no_progress || cli.quiet {
        config.show_progress = false;
    }

    config.validate()?;
    Ok(config)
}

fn print_configuration(config: &SplitConfig) {
    section_header("Configuration");
    let rows = [
        ("Input file", config.input.display().to_string()),
        ("Output prefix", config.prefix.clone()),
        ("Split field", config.field.clone()),
        ("Target categories", config.categories.join(", ")),
        ("Catch-all output", config.unknown_category.clone()),
        (
            "Write buffer",
            cli_style::format_bytes(config.buffer_size as u64),
        ),
        (
            "Max line size",
            cli_style::format_bytes(config.max_line_size as u64),
        ),
    ];
    println!("{}", stats_table(&rows));
    print_info(&format!(
        "Processing: {} -> {}_*.jsonl",
        config.input.display(),
        config.prefix
    ));
}
