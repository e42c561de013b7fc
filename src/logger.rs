use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: Instant,
}

/// Thread-safe ring buffer keeping a copy of the logged entries.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns a snapshot of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

struct GantryLogger {
    buffer: Option<LogBuffer>,
    filter: LevelFilter,
    start: Instant,
}

impl Log for GantryLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.start).as_secs_f64();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{elapsed:.3}s] [{}] {} — {}",
            record.level(),
            record.target(),
            record.args()
        );

        if let Some(ref buffer) = self.buffer {
            buffer.push(LogEntry {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
                timestamp: now,
            });
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Level from `RUST_LOG`, or `default` when unset or unparsable
#[must_use]
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Install the global logger, optionally mirroring entries into `buffer`.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(filter: LevelFilter, buffer: Option<LogBuffer>) -> Result<(), SetLoggerError> {
    let logger = GantryLogger {
        buffer,
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}
