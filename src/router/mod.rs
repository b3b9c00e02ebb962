/*!
 * Streaming router: category -> output stream
 *
 * Lifecycle is strictly linear: `initialize` opens every output up front,
 * `write` routes records while running, `close_all` flushes and releases
 * everything. A router is used for one input and never re-initialized.
 */

pub mod output;

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::config::{output_path, SplitConfig};
use crate::error::{Result, SplitError};

pub use output::OutputStream;

/// Values the router needs from the run configuration
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub prefix: String,
    pub unknown_category: String,
    pub buffer_size: usize,
}

impl From<&SplitConfig> for RouterOptions {
    fn from(config: &SplitConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            unknown_category: config.unknown_category.clone(),
            buffer_size: config.buffer_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Run,
    Shutdown,
}

/// Per-category totals, in declaration order with the catch-all last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub records: u64,
    pub bytes: u64,
}

#[derive(Debug)]
pub struct Router {
    options: RouterOptions,
    declared: HashSet<String>,
    order: Vec<String>,
    outputs: HashMap<String, OutputStream>,
    phase: Phase,
}

impl Router {
    pub fn new(options: RouterOptions) -> Self {
        Self {
            options,
            declared: HashSet::new(),
            order: Vec::new(),
            outputs: HashMap::new(),
            phase: Phase::Init,
        }
    }

    /// Create one output per category plus the catch-all.
    ///
    /// On failure every output created so far is flushed and closed before
    /// the error is returned, and the router moves to `Shutdown`.
    pub fn initialize(&mut self, categories: &[String]) -> Result<()> {
        if self.phase != Phase::Init {
            return Err(SplitError::Config(
                "Router can only be initialized once".to_string(),
            ));
        }

        let unknown = self.options.unknown_category.clone();
        let names = categories.iter().chain(std::iter::once(&unknown));

        for name in names {
            if self.outputs.contains_key(name) {
                continue;
            }

            let path = output_path(&self.options.prefix, name);
            match OutputStream::create(name, path.clone(), self.options.buffer_size) {
                Ok(stream) => {
                    debug!(category = %name, path = %path.display(), "Created output");
                    self.outputs.insert(name.clone(), stream);
                    self.order.push(name.clone());
                    if *name != unknown {
                        self.declared.insert(name.clone());
                    }
                }
                Err(source) => {
                    if let Err(e) = self.close_all() {
                        warn!("Cleanup after failed output creation: {}", e);
                    }
                    return Err(SplitError::CreateOutput { path, source });
                }
            }
        }

        self.phase = Phase::Run;
        Ok(())
    }

    /// Pick the destination category for a routing key.
    ///
    /// A key that is absent or not declared goes to the catch-all.
    pub fn route_key<'a>(&'a self, key: Option<&str>) -> &'a str {
        key.and_then(|k| self.declared.get(k))
            .map(String::as_str)
            .unwrap_or(self.options.unknown_category.as_str())
    }

    /// Append `record` plus a newline to the category's output.
    ///
    /// A category without an open output falls back to the catch-all.
    /// `line` is the input line number, used for error context only.
    pub fn write(&mut self, category: &str, record: &[u8], line: u64) -> Result<()> {
        self.ensure_running()?;

        let target = if self.outputs.contains_key(category) {
            category
        } else {
            self.options.unknown_category.as_str()
        };
        write_stream(&mut self.outputs, target, record, line)
    }

    /// Route by key and write in one step (`route_key` followed by `write`)
    pub fn dispatch(&mut self, key: Option<&str>, record: &[u8], line: u64) -> Result<()> {
        self.ensure_running()?;

        let target = match key {
            Some(k) if self.declared.contains(k) => k,
            _ => self.options.unknown_category.as_str(),
        };
        trace!(line, category = target, "Routed record");
        write_stream(&mut self.outputs, target, record, line)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.phase != Phase::Run {
            return Err(SplitError::Config(format!(
                "Router is not accepting records ({:?})",
                self.phase
            )));
        }
        Ok(())
    }

    /// Flush every output without closing. Every output is attempted; the
    /// first failure is returned.
    pub fn flush_all(&mut self) -> Result<()> {
        let mut first_error = None;

        for name in &self.order {
            if let Some(stream) = self.outputs.get_mut(name) {
                if let Err(source) = stream.flush() {
                    warn!(path = %stream.path().display(), "Flush failed: {}", source);
                    first_error.get_or_insert(SplitError::Flush {
                        path: stream.path().to_path_buf(),
                        source,
                    });
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Flush and release every output. Safe to call more than once.
    pub fn close_all(&mut self) -> Result<()> {
        let mut first_error = None;

        for name in &self.order {
            if let Some(stream) = self.outputs.remove(name) {
                let path = stream.path().to_path_buf();
                if let Err(source) = stream.close() {
                    warn!(path = %path.display(), "Close failed: {}", source);
                    first_error.get_or_insert(SplitError::Flush { path, source });
                }
            }
        }

        self.phase = Phase::Shutdown;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Record and byte totals for every output still open
    pub fn counts(&self) -> Vec<CategoryCount> {
        self.order
            .iter()
            .filter_map(|name| self.outputs.get(name))
            .map(|stream| CategoryCount {
                category: stream.category().to_string(),
                records: stream.records(),
                bytes: stream.bytes(),
            })
            .collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of outputs currently holding an open file handle
    pub fn open_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn unknown_category(&self) -> &str {
        &self.options.unknown_category
    }
}

fn write_stream(
    outputs: &mut HashMap<String, OutputStream>,
    category: &str,
    record: &[u8],
    line: u64,
) -> Result<()> {
    let stream = outputs.get_mut(category).ok_or_else(|| {
        SplitError::Config(format!("No output open for category '{}'", category))
    })?;

    stream
        .write_record(record)
        .map_err(|source| SplitError::Write {
            path: stream.path().to_path_buf(),
            line,
            source,
        })
}

impl Drop for Router {
    fn drop(&mut self) {
        if self.outputs.is_empty() {
            return;
        }
        if let Err(e) = self.close_all() {
            warn!("Error closing outputs on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn options(dir: &Path) -> RouterOptions {
        RouterOptions {
            prefix: dir.join("out").to_string_lossy().into_owned(),
            unknown_category: "unknown".to_string(),
            buffer_size: 64,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initialize_creates_every_output() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1", "chr2"])).unwrap();

        assert_eq!(router.phase(), Phase::Run);
        assert_eq!(router.open_outputs(), 3);
        for category in ["chr1", "chr2", "unknown"] {
            let path = dir.path().join(format!("out_{}.jsonl", category));
            assert!(path.exists(), "{} should exist", path.display());
        }
    }

    #[test]
    fn test_duplicate_categories_share_one_output() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1", "chr1"])).unwrap();
        assert_eq!(router.open_outputs(), 2);
    }

    #[test]
    fn test_route_key() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1", "chr2"])).unwrap();

        assert_eq!(router.route_key(Some("chr1")), "chr1");
        assert_eq!(router.route_key(Some("chrZZZ")), "unknown");
        assert_eq!(router.route_key(None), "unknown");
        // The catch-all name is not a declared category
        assert_eq!(router.route_key(Some("unknown")), "unknown");
    }

    #[test]
    fn test_write_and_close() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1"])).unwrap();

        router.write("chr1", br#"{"chr":"chr1"}"#, 1).unwrap();
        router.write("unknown", br#"{"v":3}"#, 2).unwrap();
        router.write("not-open", br#"{"v":4}"#, 3).unwrap();

        let counts = router.counts();
        assert_eq!(counts[0].category, "chr1");
        assert_eq!(counts[0].records, 1);
        assert_eq!(counts[1].category, "unknown");
        assert_eq!(counts[1].records, 2);

        router.close_all().unwrap();
        assert_eq!(router.open_outputs(), 0);
        assert_eq!(router.phase(), Phase::Shutdown);

        let chr1 = std::fs::read_to_string(dir.path().join("out_chr1.jsonl")).unwrap();
        assert_eq!(chr1, "{\"chr\":\"chr1\"}\n");
        let unknown = std::fs::read_to_string(dir.path().join("out_unknown.jsonl")).unwrap();
        assert_eq!(unknown, "{\"v\":3}\n{\"v\":4}\n");
    }

    #[test]
    fn test_dispatch_routes_by_key() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1", "chr2"])).unwrap();

        router.dispatch(Some("chr2"), b"a", 1).unwrap();
        router.dispatch(Some("chr9"), b"b", 2).unwrap();
        router.dispatch(None, b"c", 3).unwrap();
        router.dispatch(Some("chr2"), b"d", 4).unwrap();
        router.close_all().unwrap();

        let chr2 = std::fs::read_to_string(dir.path().join("out_chr2.jsonl")).unwrap();
        assert_eq!(chr2, "a\nd\n");
        let unknown = std::fs::read_to_string(dir.path().join("out_unknown.jsonl")).unwrap();
        assert_eq!(unknown, "b\nc\n");
        let chr1 = std::fs::read_to_string(dir.path().join("out_chr1.jsonl")).unwrap();
        assert!(chr1.is_empty());
    }

    #[test]
    fn test_close_all_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1"])).unwrap();
        router.close_all().unwrap();
        router.close_all().unwrap();
        assert!(router.write("chr1", b"{}", 1).is_err());
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1"])).unwrap();
        assert!(matches!(
            router.initialize(&names(&["chr2"])),
            Err(SplitError::Config(_))
        ));
    }

    #[test]
    fn test_write_before_initialize_is_rejected() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        assert!(router.write("unknown", b"{}", 1).is_err());
    }

    #[test]
    fn test_creation_failure_releases_earlier_outputs() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));

        // "out_missing/chr3.jsonl" lives in a directory that does not exist
        let err = router
            .initialize(&names(&["chr1", "chr2", "missing/chr3", "chr4"]))
            .unwrap_err();

        match err {
            SplitError::CreateOutput { path, .. } => {
                assert!(path.ends_with("out_missing/chr3.jsonl"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(router.open_outputs(), 0);
        assert_eq!(router.phase(), Phase::Shutdown);
        assert!(dir.path().join("out_chr1.jsonl").exists());
        assert!(dir.path().join("out_chr2.jsonl").exists());
        assert!(!dir.path().join("out_chr4.jsonl").exists());
        assert!(!dir.path().join("out_unknown.jsonl").exists());
    }

    #[test]
    fn test_drop_flushes_buffered_records() {
        let dir = tempdir().unwrap();
        {
            let mut router = Router::new(options(dir.path()));
            router.initialize(&names(&["chr1"])).unwrap();
            router.write("chr1", b"{\"chr\":\"chr1\"}", 1).unwrap();
        }
        let chr1 = std::fs::read_to_string(dir.path().join("out_chr1.jsonl")).unwrap();
        assert_eq!(chr1, "{\"chr\":\"chr1\"}\n");
    }

    #[test]
    fn test_flush_all_makes_data_visible() {
        let dir = tempdir().unwrap();
        let mut router = Router::new(options(dir.path()));
        router.initialize(&names(&["chr1"])).unwrap();
        router.write("chr1", b"{}", 1).unwrap();
        router.flush_all().unwrap();

        assert_eq!(router.open_outputs(), 2);
        let chr1 = std::fs::read(dir.path().join("out_chr1.jsonl")).unwrap();
        assert_eq!(chr1, b"{}\n");
    }
}
