/*!
 * Single-pass split of a JSONL file into per-category outputs
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::extract::{extract, FieldPath};
use crate::progress::ProgressReporter;
use crate::reader::LineReader;
use crate::router::{Router, RouterOptions};
use crate::stats::SplitStats;

/// Read buffer for the input file
const INPUT_BUFFER_SIZE: usize = 256 * 1024;

/// Split `config.input` into one file per category.
///
/// The input is checked before any output is created. Outputs are closed
/// on every exit path; on failure the first error is returned.
pub fn process_file(config: &SplitConfig, cancel: &CancelToken) -> Result<SplitStats> {
    config.validate()?;

    let input = config.input.as_path();
    let metadata = std::fs::metadata(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SplitError::InputNotFound(input.to_path_buf()),
        _ => SplitError::Read {
            path: input.to_path_buf(),
            line: 0,
            source: e,
        },
    })?;
    if !metadata.is_file() {
        return Err(SplitError::InvalidInput(input.to_path_buf()));
    }

    let file = File::open(input).map_err(|source| SplitError::Read {
        path: input.to_path_buf(),
        line: 0,
        source,
    })?;
    let reader = BufReader::with_capacity(INPUT_BUFFER_SIZE, file);

    info!(
        "Processing: {} -> {}_*.jsonl",
        input.display(),
        config.prefix
    );

    process_reader(reader, input, metadata.len(), config, cancel)
}

/// Split an already-open input stream.
///
/// `source` names the input in errors; `total_bytes` sizes the progress bar.
pub fn process_reader<R: BufRead>(
    reader: R,
    source: &Path,
    total_bytes: u64,
    config: &SplitConfig,
    cancel: &CancelToken,
) -> Result<SplitStats> {
    config.validate()?;

    let start_time = Instant::now();
    let mut router = Router::new(RouterOptions::from(config));
    router.initialize(&config.categories)?;
    debug!(outputs = router.open_outputs(), "Outputs initialized");

    let mut progress = ProgressReporter::new(total_bytes, config.show_progress);
    let mut lines = LineReader::new(reader, source, config.max_line_size);
    let mut stats = SplitStats::default();

    let result = route_records(
        &mut router,
        &mut lines,
        &mut progress,
        &mut stats,
        config,
        cancel,
        start_time,
    );

    stats.lines_read = lines.line();
    stats.bytes_read = lines.bytes_read();
    stats.per_category = router.counts();
    stats.unknown_category = config.unknown_category.clone();
    stats.bytes_written = stats.per_category.iter().map(|c| c.bytes).sum();

    match result {
        Ok(()) => {
            progress.finish(stats.bytes_read, stats.lines_read);
            router.flush_all()?;
            router.close_all()?;
        }
        Err(e) => {
            progress.abandon();
            warn!(
                category = %e.category(),
                line = stats.lines_read,
                "Aborting run: {}",
                e
            );
            if let Err(close_err) = router.close_all() {
                warn!("Cleanup after failed run: {}", close_err);
            }
            return Err(e);
        }
    }

    stats.duration = start_time.elapsed();
    info!(
        "{} lines finished in {:.2} sec ({:.2} lines/sec)",
        stats.lines_read,
        stats.duration.as_secs_f64(),
        stats.lines_per_sec()
    );

    Ok(stats)
}

fn route_records<R: BufRead>(
    router: &mut Router,
    lines: &mut LineReader<R>,
    progress: &mut ProgressReporter,
    stats: &mut SplitStats,
    config: &SplitConfig,
    cancel: &CancelToken,
    start_time: Instant,
) -> Result<()> {
    let field = FieldPath::parse(&config.field);
    let mut buf = Vec::with_capacity(64 * 1024);

    loop {
        if cancel.is_cancelled() {
            info!(line = lines.line(), "Cancellation requested");
            return Err(SplitError::Cancelled { line: lines.line() });
        }

        if !lines.next_record(&mut buf)? {
            return Ok(());
        }
        let line_num = lines.line();

        if config.progress_interval > 0 && line_num % config.progress_interval == 0 {
            let elapsed = start_time.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                line_num as f64 / elapsed
            } else {
                0.0
            };
            info!("Processed {} lines ({:.0} lines/sec)", line_num, rate);
        }
        progress.update(lines.bytes_read(), line_num);

        if buf.is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        let key = extract(&buf, &field);
        router.dispatch(key.as_deref(), &buf, line_num)?;
        stats.records_written += 1;
    }
}
