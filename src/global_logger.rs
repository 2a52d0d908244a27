//SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide sink registry.
//!
//! Every emitted [`LogRecord`](crate::LogRecord) is delivered to every sink
//! registered here, whether it was emitted directly, re-emitted by
//! [`log_exception`](crate::log_exception), or flushed by the termination
//! hook. The registry initializes lazily with a single plain
//! [`StdErrorLogger`], so
//! logging works without configuration.
//!
//! Sinks are reference-counted; replacing the registry does not interrupt a
//! sink that an in-flight emission already cloned out.
//!
//! # Examples
//!
//! Add a supplementary sink:
//!
//! ```
//! use deferlog::{InMemoryLogger, add_global_logger, global_loggers};
//! use std::sync::Arc;
//!
//! let before = global_loggers().len();
//! add_global_logger(Arc::new(InMemoryLogger::new()));
//! assert_eq!(global_loggers().len(), before + 1);
//! ```
//!
//! Replace all sinks (the usual pattern in tests):
//!
//! ```
//! use deferlog::{InMemoryLogger, set_global_loggers};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemoryLogger::new());
//! set_global_loggers(vec![sink.clone()]);
//! ```

use crate::logger::Logger;
use crate::stderror_logger::StdErrorLogger;
use std::sync::{Arc, OnceLock, RwLock};

static GLOBAL_LOGGERS: OnceLock<RwLock<Vec<Arc<dyn Logger>>>> = OnceLock::new();

fn registry() -> &'static RwLock<Vec<Arc<dyn Logger>>> {
    GLOBAL_LOGGERS.get_or_init(|| RwLock::new(vec![Arc::new(StdErrorLogger::new())]))
}

/// Returns the current set of global sinks, initializing with a stderr sink
/// if none were configured.
///
/// The returned `Arc`s keep the sinks alive for the duration of the caller's
/// emission even if the registry is concurrently replaced.
pub fn global_loggers() -> Vec<Arc<dyn Logger>> {
    registry()
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Appends a sink to the registry; existing sinks keep receiving records.
pub fn add_global_logger(logger: Arc<dyn Logger>) {
    registry()
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .push(logger);
}

/// Replaces the whole registry. Passing an empty vector silently drops all
/// output, which is rarely what you want outside of tests.
pub fn set_global_loggers(new_loggers: Vec<Arc<dyn Logger>>) {
    *registry().write().unwrap_or_else(|e| e.into_inner()) = new_loggers;
}
