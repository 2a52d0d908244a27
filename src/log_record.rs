//SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink-facing log record type.
//!
//! A [`LogRecord`] is what actually reaches a [`Logger`](crate::Logger): a
//! level plus an ordered list of message parts. Parts are accumulated with
//! [`log`](LogRecord::log) / [`log_owned`](LogRecord::log_owned) and only
//! joined when a sink renders the record, so building a record that ends up
//! filtered or captured costs no concatenation.
//!
//! Records are plain values. The emitting side composes one (severity,
//! caller preamble, message, optional stack trace) and hands it to every
//! registered sink by value; nothing in a record points back into the engine.

use crate::Level;
use std::fmt::{Debug, Display};

/// A log record: a severity plus ordered message parts.
///
/// # Example
///
/// ```rust
/// use deferlog::{Level, LogRecord};
///
/// let mut record = LogRecord::new(Level::Info);
/// record.log("processed ");
/// record.log_owned(format!("{} items", 3));
/// assert_eq!(record.to_string(), "processed 3 items");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    pub(crate) parts: Vec<String>,
    level: Level,
}

impl LogRecord {
    pub fn new(level: Level) -> Self {
        Self {
            parts: Vec::new(),
            level,
        }
    }

    /// Append a borrowed message part.
    pub fn log(&mut self, message: &str) {
        self.parts.push(message.to_string());
    }

    /// Append an already-owned message part.
    ///
    /// Useful for parts that were constructed in the process of logging, so
    /// the allocation is reused rather than copied.
    pub fn log_owned(&mut self, message: String) {
        self.parts.push(message);
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/*
Boilerplate notes for LogRecord:

- Clone/PartialEq/Eq/Hash: derived, records are plain data and sinks may
  want to deduplicate or key on them.
- Copy: no, Vec<String> is heap data.
- Ord: no meaningful ordering between records.
- Display: implemented, joins the parts; this is what sinks print.
- Send is automatic; records move between threads only by value.
*/
