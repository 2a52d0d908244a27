//SPDX-License-Identifier: MIT OR Apache-2.0

//! Attaching deferred records to errors, and emitting them explicitly.
//!
//! Two shapes produce the same effect. The direct call:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! let error = Arc::new("config file truncated".to_string());
//! deferlog::attach!(&error, "failed while reading {}", "config.toml");
//! assert_eq!(deferlog::pending_count(&error), 1);
//! # let _ = deferlog::peek_pending(&error);
//! ```
//!
//! And the scoped shape, which redirects a logger's ordinary emission calls
//! into the store while the scope is alive:
//!
//! ```rust
//! use deferlog::{log_to_exception, logger};
//! use std::sync::Arc;
//!
//! let error = Arc::new("upstream refused".to_string());
//! let log = logger("mylib::net");
//! {
//!     let _scope = log_to_exception(&log, &error);
//!     deferlog::warning!(&log, "retrying without compression");
//! }
//! // The warning is pending against `error`, not emitted.
//! assert_eq!(deferlog::pending_count(&error), 1);
//! ```
//!
//! Whoever later catches the error decides what the records are worth:
//! [`log_exception`] re-emits them at `Critical`, [`log_exception_at`] at a
//! severity of the catcher's choosing, and simply dropping the error
//! discards them. An error that instead escapes to the termination hook has
//! its records emitted there (see [`crate::termination`]).
//!
//! Nothing in this module panics or returns an error: attaching a record
//! must never mask the error it annotates.

use crate::attributed_logger::{AttributedLogger, CaptureTarget, render_message, root_logger};
use crate::stack;
use crate::store::{self, PendingRecord};
use crate::Level;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

/// Attaches a record at [`Level::Critical`], the level an annotation should
/// carry if nobody ever downgrades it. Prefer the [`attach!`](crate::attach!)
/// macro for format syntax.
pub fn attach<E>(error: &Arc<E>, args: fmt::Arguments<'_>)
where
    E: Send + Sync + 'static,
{
    attach_at(error, Level::Critical, args);
}

/// Attaches a record at an explicit captured level.
///
/// Resolves the caller, renders the message (degrading on formatting
/// failure), captures a stack trace, and stores the record against
/// `error`'s identity, bound to the root logger. Returns immediately and
/// never fails.
pub fn attach_at<E>(error: &Arc<E>, level: Level, args: fmt::Arguments<'_>)
where
    E: Send + Sync + 'static,
{
    let message = render_message(args);
    let frames = stack::capture_raw_stack();
    let caller = stack::resolve_or_innermost(&frames, &HashSet::new());
    let record = PendingRecord {
        logger: root_logger(),
        message,
        caller,
        level,
        trace: Some(stack::render_trace(&frames)),
    };
    let weak: Weak<E> = Arc::downgrade(error);
    let alive: Weak<dyn Any + Send + Sync> = weak;
    store::put(store::error_key(error), alive, record);
}

/// RAII guard binding a logger to an error; see [`log_to_exception`].
///
/// Dropping the guard releases the interception on every exit path,
/// restoring whatever target (if any) an enclosing scope had installed.
#[must_use = "emission is only captured while the scope is alive"]
#[derive(Debug)]
pub struct AttachmentScope {
    logger: AttributedLogger,
    previous: Option<CaptureTarget>,
}

impl Drop for AttachmentScope {
    fn drop(&mut self) {
        self.logger.end_capture(self.previous.take());
    }
}

/// Opens an attachment scope: while the returned guard lives, emission calls
/// on `logger` are captured as pending records against `error` instead of
/// reaching the sinks. Entry itself does nothing observable.
pub fn log_to_exception<E>(logger: &AttributedLogger, error: &Arc<E>) -> AttachmentScope
where
    E: Send + Sync + 'static,
{
    let weak: Weak<E> = Arc::downgrade(error);
    let alive: Weak<dyn Any + Send + Sync> = weak;
    let previous = logger.begin_capture(CaptureTarget {
        key: store::error_key(error),
        alive,
    });
    AttachmentScope {
        logger: logger.clone(),
        previous,
    }
}

/// Emits all of `error`'s pending records at [`Level::Critical`] with stack
/// traces, the conventional "this error was caught but is still fatal
/// enough to report" shape.
pub fn log_exception<E>(error: &Arc<E>)
where
    E: Send + Sync + 'static,
{
    log_exception_at(error, Level::Critical, true);
}

/// Emits all of `error`'s pending records at `level`, consuming them.
///
/// Each record goes through its bound logger at the *overridden* level, not
/// the level captured at attachment time. Consumption is the removal from
/// the store: a second call emits nothing, and the termination hook can
/// never emit these records again. No-op if nothing is pending.
pub fn log_exception_at<E>(error: &Arc<E>, level: Level, with_stacktrace: bool)
where
    E: Send + Sync + 'static,
{
    for record in store::take_all(error) {
        record.emit_at(level, with_stacktrace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributed_logger::AttributedLogger;
    use crate::store::{peek_pending, pending_count};

    #[test]
    fn attach_defaults_to_critical_and_preserves_order() {
        let error = Arc::new("attach order".to_string());
        attach(&error, format_args!("first {}", 1));
        attach_at(&error, Level::Warning, format_args!("second"));

        let records = peek_pending(&error);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first 1");
        assert_eq!(records[0].level, Level::Critical);
        assert_eq!(records[1].message, "second");
        assert_eq!(records[1].level, Level::Warning);
        assert!(store::take_all(&error).len() == 2);
    }

    #[test]
    fn attach_and_scope_accept_any_error_type() {
        // Attachment is generic over the error; exercise it through a
        // generic helper rather than a concrete call site.
        fn annotate<E: Send + Sync + 'static>(error: &Arc<E>) {
            attach(error, format_args!("generic annotation"));
        }

        let io_error = Arc::new(std::io::Error::other("disk full"));
        annotate(&io_error);
        assert_eq!(pending_count(&io_error), 1);
        assert_eq!(store::take_all(&io_error)[0].message, "generic annotation");

        let unit_error = Arc::new(());
        let log = AttributedLogger::new("generic-scope");
        {
            let _scope = log_to_exception(&log, &unit_error);
            log.critical(format_args!("captured for unit"));
        }
        assert_eq!(store::take_all(&unit_error).len(), 1);
    }

    #[test]
    fn attach_never_propagates_formatting_failure() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let error = Arc::new("formatting".to_string());
        attach(&error, format_args!("value: {}", Broken));

        let records = store::take_all(&error);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "log formatting failed");
    }

    #[test]
    fn scope_captures_instead_of_emitting() {
        let error = Arc::new("captured".to_string());
        let log = AttributedLogger::new("scope-test");
        {
            let _scope = log_to_exception(&log, &error);
            log.debug(format_args!("below threshold, still captured"));
            log.critical(format_args!("critical inside scope"));
        }
        log.critical(format_args!("after scope")); // goes to sinks, not store

        let records = store::take_all(&error);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "below threshold, still captured");
        assert_eq!(records[0].level, Level::Debug);
        assert_eq!(records[1].level, Level::Critical);
    }

    #[test]
    fn nested_scopes_restore_the_outer_target() {
        let outer = Arc::new("outer".to_string());
        let inner = Arc::new("inner".to_string());
        let log = AttributedLogger::new("nested-scope");

        let _outer_scope = log_to_exception(&log, &outer);
        {
            let _inner_scope = log_to_exception(&log, &inner);
            log.error(format_args!("for inner"));
        }
        log.error(format_args!("for outer"));

        assert_eq!(pending_count(&inner), 1);
        assert_eq!(pending_count(&outer), 1);
        assert_eq!(store::take_all(&inner)[0].message, "for inner");
        assert_eq!(store::take_all(&outer)[0].message, "for outer");
    }

    #[test]
    fn untracked_error_emission_is_a_noop() {
        let error = Arc::new("never attached".to_string());
        log_exception(&error);
        log_exception_at(&error, Level::Debug, false);
        assert_eq!(pending_count(&error), 0);
    }
}
