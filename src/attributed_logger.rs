//SPDX-License-Identifier: MIT OR Apache-2.0

//! Named loggers with resolver-based caller attribution.
//!
//! An [`AttributedLogger`] behaves like an ordinary leveled logger with two
//! differences. First, caller attribution comes from the stack resolver and
//! the logger's ignore-set (see [`crate::stack`]) rather than from the
//! immediate caller. Second, while an attachment scope is active on the
//! logger (see [`log_to_exception`](crate::log_to_exception)), emission
//! calls are captured as pending records against an error instead of
//! reaching the sinks.
//!
//! Loggers are cheap to clone (`Arc`-based, like a handle) and are usually
//! obtained from a process-wide registry by name:
//!
//! ```rust
//! use deferlog::{Level, logger};
//!
//! let log = logger("mylib::parser");
//! log.set_level(Level::Debug);
//! deferlog::debug!(&log, "tokenized {} items", 7);
//! assert_eq!(log, logger("mylib::parser"));
//! ```

use crate::global_logger::global_loggers;
use crate::log_record::LogRecord;
use crate::stack::{self, Caller};
use crate::store::{self, PendingRecord};
use crate::{Level, config};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

/// Where an active attachment scope redirects a logger's emission calls.
#[derive(Debug, Clone)]
pub(crate) struct CaptureTarget {
    pub(crate) key: usize,
    pub(crate) alive: Weak<dyn Any + Send + Sync>,
}

#[derive(Debug)]
struct LoggerInner {
    name: String,
    level: AtomicU8,
    ignore: Mutex<HashMap<String, usize>>,
    capture: Mutex<Option<CaptureTarget>>,
}

/// A named, leveled logger whose caller attribution is produced by the
/// stack resolver.
///
/// Cloning is cheap and yields a handle to the same logger; equality and
/// hashing are by identity, not by name.
///
/// The ignore-set is a counted multiset: [`ignore_function`] may be called
/// several times with the same name (nested
/// [`log_at_caller`](crate::log_at_caller) scopes do this) and the name
/// stays ignored until the matching number of [`unignore_function`] calls.
///
/// [`ignore_function`]: AttributedLogger::ignore_function
/// [`unignore_function`]: AttributedLogger::unignore_function
#[derive(Debug, Clone)]
pub struct AttributedLogger {
    inner: Arc<LoggerInner>,
}

impl PartialEq for AttributedLogger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AttributedLogger {}

impl Hash for AttributedLogger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl AttributedLogger {
    /// Creates a detached logger (not registered by name).
    ///
    /// Most code should use [`logger`] instead so that level configuration
    /// by name (see [`crate::config`]) can find the instance.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: name.into(),
                level: AtomicU8::new(Level::Warning.index()),
                ignore: Mutex::new(HashMap::new()),
                capture: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn level(&self) -> Level {
        Level::from_index(self.inner.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.inner.level.store(level.index(), Ordering::Relaxed);
    }

    /// Adds `function` to the ignore-set (counted).
    pub fn ignore_function(&self, function: &str) {
        let mut ignore = self.inner.ignore.lock().unwrap_or_else(|e| e.into_inner());
        *ignore.entry(function.to_string()).or_insert(0) += 1;
    }

    /// Removes one count of `function` from the ignore-set; the name stays
    /// ignored while outer scopes still hold it. No-op if absent.
    pub fn unignore_function(&self, function: &str) {
        let mut ignore = self.inner.ignore.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(count) = ignore.get_mut(function) {
            *count -= 1;
            if *count == 0 {
                ignore.remove(function);
            }
        }
    }

    pub fn is_ignored(&self, function: &str) -> bool {
        self.inner
            .ignore
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(function)
    }

    fn ignore_snapshot(&self) -> HashSet<String> {
        self.inner
            .ignore
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    pub(crate) fn begin_capture(&self, target: CaptureTarget) -> Option<CaptureTarget> {
        self.inner
            .capture
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(target)
    }

    pub(crate) fn end_capture(&self, previous: Option<CaptureTarget>) {
        *self.inner.capture.lock().unwrap_or_else(|e| e.into_inner()) = previous;
    }

    fn capture_target(&self) -> Option<CaptureTarget> {
        self.inner
            .capture
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Emission entry point used by the level methods and the macros.
    ///
    /// With an attachment scope active the message becomes a pending record
    /// against the scope's error, regardless of the logger's threshold (the
    /// severity decision is deferred to whoever emits it). Otherwise the
    /// message goes to the global sinks if `level` passes the threshold.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let capture = self.capture_target();
        if capture.is_none() && level < self.level() {
            return;
        }
        let message = render_message(args);
        let frames = stack::capture_raw_stack();
        let caller = stack::resolve_or_innermost(&frames, &self.ignore_snapshot());
        match capture {
            Some(target) => {
                let record = PendingRecord {
                    logger: self.clone(),
                    message,
                    caller,
                    level,
                    trace: Some(stack::render_trace(&frames)),
                };
                store::put(target.key, target.alive, record);
            }
            None => {
                let record = compose_record(level, self.name(), &caller, &message, None);
                self.dispatch_record(record);
            }
        }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warning, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Critical, args);
    }

    /// Hands a composed record to every global sink, bypassing threshold and
    /// capture. Re-emission of consumed records goes through here so that an
    /// explicit severity override is never second-guessed.
    pub(crate) fn dispatch_record(&self, record: LogRecord) {
        for sink in global_loggers() {
            sink.finish_log_record(record.clone());
        }
    }
}

/// Renders `args` eagerly; a `Display` impl reporting failure degrades to a
/// fixed message so a buggy log call never masks the error it annotates.
pub(crate) fn render_message(args: fmt::Arguments<'_>) -> String {
    let mut message = String::new();
    match fmt::write(&mut message, args) {
        Ok(()) => message,
        Err(fmt::Error) => "log formatting failed".to_string(),
    }
}

/// Composes the sink-facing record: `LEVEL:name.function[line]: message`,
/// with the captured stack trace appended when present.
pub(crate) fn compose_record(
    level: Level,
    logger_name: &str,
    caller: &Caller,
    message: &str,
    trace: Option<&str>,
) -> LogRecord {
    let mut record = LogRecord::new(level);
    record.log_owned(format!(
        "{}:{}.{}[{}]: ",
        level,
        logger_name,
        stack::simple_name(&caller.function),
        caller.line.unwrap_or(0),
    ));
    record.log(message);
    if let Some(trace) = trace {
        if !trace.is_empty() {
            record.log("\n");
            record.log(trace);
        }
    }
    record
}

static REGISTRY: OnceLock<Mutex<HashMap<String, AttributedLogger>>> = OnceLock::new();

/// Returns the process-wide logger registered under `name`, creating it on
/// first use. Repeated calls with the same name return the same instance.
pub fn logger(name: &str) -> AttributedLogger {
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = registry.lock().unwrap_or_else(|e| e.into_inner());
    map.entry(name.to_string())
        .or_insert_with(|| AttributedLogger::new(name))
        .clone()
}

/// The `"root"` logger: the default binding for records created by
/// [`attach`](crate::attach).
pub fn root_logger() -> AttributedLogger {
    logger(config::ROOT_LOGGER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_logger_defaults_to_warning() {
        let log = AttributedLogger::new("fresh");
        assert_eq!(log.level(), Level::Warning);
        log.set_level(Level::Debug);
        assert_eq!(log.level(), Level::Debug);
    }

    #[test]
    fn clones_share_state_and_identity() {
        let log = AttributedLogger::new("handle");
        let other = log.clone();
        other.set_level(Level::Info);
        assert_eq!(log.level(), Level::Info);
        assert_eq!(log, other);
        assert_ne!(log, AttributedLogger::new("handle"));
    }

    #[test]
    fn ignore_set_uses_counted_semantics() {
        let log = AttributedLogger::new("counted");
        log.ignore_function("helper");
        log.ignore_function("helper");
        assert!(log.is_ignored("helper"));

        log.unignore_function("helper");
        assert!(log.is_ignored("helper"), "outer scope still holds the name");
        log.unignore_function("helper");
        assert!(!log.is_ignored("helper"));
    }

    #[test]
    fn unignore_of_absent_name_is_a_noop() {
        let log = AttributedLogger::new("noop");
        log.unignore_function("never_added");
        assert!(!log.is_ignored("never_added"));
    }

    #[test]
    fn registry_returns_the_same_instance_per_name() {
        let a = logger("registry::same");
        let b = logger("registry::same");
        assert_eq!(a, b);
        assert_ne!(a, logger("registry::other"));
    }

    #[test]
    fn render_message_degrades_on_formatting_failure() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        assert_eq!(
            render_message(format_args!("x = {}", Broken)),
            "log formatting failed"
        );
        assert_eq!(render_message(format_args!("x = {}", 3)), "x = 3");
    }

    #[test]
    fn composed_record_carries_preamble_and_trace() {
        let caller = Caller {
            function: "mylib::parse".to_string(),
            file: Some("parse.rs".to_string()),
            line: Some(17),
        };
        let record =
            compose_record(Level::Error, "mylib", &caller, "boom", Some("    app::main\n"));
        let rendered = record.to_string();
        assert!(rendered.starts_with("ERROR:mylib.parse[17]: boom"));
        assert!(rendered.contains("app::main"));
        assert_eq!(record.level(), Level::Error);
    }
}
