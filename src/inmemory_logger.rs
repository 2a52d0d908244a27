//SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory sink for tests and diagnostics.
//!
//! [`InMemoryLogger`] captures rendered records in a `Mutex<Vec<String>>`
//! instead of writing them anywhere, so a test can assert on exactly what
//! was emitted (and, just as importantly, on what was *not* emitted while a
//! record sat pending against an error).
//!
//! # Example
//!
//! ```rust
//! use deferlog::{InMemoryLogger, logger, set_global_loggers};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemoryLogger::new());
//! set_global_loggers(vec![sink.clone()]);
//!
//! let log = logger("doctest");
//! deferlog::warning!(&log, "suspicious value {}", 42);
//!
//! let logs = sink.drain_logs();
//! assert!(logs.contains("suspicious value 42"));
//! ```

use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::sync::Mutex;

/// A sink that stores rendered log lines in memory.
///
/// Thread-safe; share it across threads with `Arc`. Records are rendered to
/// strings on arrival, so draining observes them in emission order.
#[derive(Debug, Default)]
pub struct InMemoryLogger {
    logs: Mutex<Vec<String>>,
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Drains all captured lines into a single newline-joined string,
    /// clearing the buffer.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        let result = logs.join("\n");
        logs.clear();
        result
    }

    /// Number of captured lines currently buffered.
    pub fn len(&self) -> usize {
        self.logs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes all captured lines to stderr and clears the buffer.
    pub fn drain_to_console(&self) {
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        for log in logs.iter() {
            eprintln!("{}", log);
        }
        logs.clear();
    }
}

impl Logger for InMemoryLogger {
    fn finish_log_record(&self, record: LogRecord) {
        let log_string = record.to_string();
        let mut logs = self.logs.lock().unwrap_or_else(|e| e.into_inner());
        logs.push(log_string);
    }

    fn prepare_to_die(&self) {
        //nothing to flush; the buffer is the destination
    }
}
