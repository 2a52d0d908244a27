//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::log_record::LogRecord;
use crate::logger::Logger;

/**
A reference sink that logs to stderr.

[`StdErrorLogger::colored`] wraps each line in an ANSI color escape chosen
by severity; [`StdErrorLogger::new`] writes plain lines.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StdErrorLogger {
    color: bool,
}

impl Default for StdErrorLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl StdErrorLogger {
    /// A plain, uncolored stderr sink.
    pub const fn new() -> Self {
        Self { color: false }
    }

    /// A stderr sink that colors each line by severity.
    pub const fn colored() -> Self {
        Self { color: true }
    }
}

fn color_sequence(level: Level) -> &'static str {
    match level {
        Level::Debug => "\x1b[2m",
        Level::Info => "",
        Level::Warning => "\x1b[33m",
        Level::Error => "\x1b[31m",
        Level::Critical => "\x1b[1;31m",
    }
}

impl Logger for StdErrorLogger {
    fn finish_log_record(&self, record: LogRecord) {
        use std::io::Write;
        let mut lock = std::io::stderr().lock();
        let color = if self.color {
            color_sequence(record.level())
        } else {
            ""
        };
        lock.write_all(color.as_bytes()).expect("Can't log to stderr");
        for part in record.parts {
            lock.write_all(part.as_bytes())
                .expect("Can't log to stderr");
        }
        if !color.is_empty() {
            lock.write_all(b"\x1b[0m").expect("Can't log to stderr");
        }
        lock.write_all(b"\n").expect("Can't log to stderr");
    }

    fn prepare_to_die(&self) {
        //nothing to do since we are unbuffered
    }
}
