//SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide table of pending records, keyed by error identity.
//!
//! Errors are tracked behind `Arc`: the identity of an error is the identity
//! of its `Arc` allocation, so two errors with equal contents are tracked
//! independently, and cloning the `Arc` does not create a new identity.
//!
//! The table never owns an error. Each entry holds a `Weak` guard; once the
//! last `Arc` to an error is dropped, its entry is invisible to every
//! observer and is swept on the next insertion, so a long-running process
//! that raises and discards many errors does not leak. The weak guard also
//! protects against allocator address reuse: a dead entry is never mistaken
//! for a new error that happens to live at the same address.
//!
//! Removal *is* consumption. [`take_all`] hands the records out exactly
//! once; a record that has left the table can never be emitted again by the
//! termination hook.

use crate::Level;
use crate::attributed_logger::{AttributedLogger, compose_record};
use crate::stack::Caller;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};

/// A fully-formed, not-yet-emitted log entry held against an error.
///
/// All attribution (caller, level, trace) is fixed at attachment time and
/// never recomputed; only the severity may be overridden at emission.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    /// The logger the record was created through; re-emission goes through
    /// the same logger's name and sinks.
    pub logger: AttributedLogger,
    /// Message, rendered eagerly at attachment time.
    pub message: String,
    /// Resolved logical call site of the attachment.
    pub caller: Caller,
    /// Severity captured at attachment time. The termination hook emits at
    /// this level; explicit emission may override it.
    pub level: Level,
    /// Rendered stack trace captured at attachment time, if any.
    pub trace: Option<String>,
}

impl PendingRecord {
    /// Emits the record through its bound logger at `level`, bypassing the
    /// logger's threshold: whoever pulled the record out of the store has
    /// already made the severity decision.
    pub(crate) fn emit_at(&self, level: Level, with_stacktrace: bool) {
        let trace = if with_stacktrace {
            self.trace.as_deref()
        } else {
            None
        };
        let record = compose_record(level, self.logger.name(), &self.caller, &self.message, trace);
        self.logger.dispatch_record(record);
    }
}

struct Entry {
    alive: Weak<dyn Any + Send + Sync>,
    records: Vec<PendingRecord>,
}

static STORE: OnceLock<Mutex<HashMap<usize, Entry>>> = OnceLock::new();

fn table() -> MutexGuard<'static, HashMap<usize, Entry>> {
    STORE
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Identity key of an error: the address of its `Arc` allocation.
pub(crate) fn error_key<E: ?Sized>(error: &Arc<E>) -> usize {
    Arc::as_ptr(error).cast::<()>() as usize
}

/// Appends `record` against `key`, creating the entry if absent. Does not
/// emit. Dead entries are swept first, so a reused address never inherits a
/// previous error's records.
pub(crate) fn put(key: usize, alive: Weak<dyn Any + Send + Sync>, record: PendingRecord) {
    if alive.strong_count() == 0 {
        // The error is already gone; there is nobody left to emit for.
        return;
    }
    let mut map = table();
    map.retain(|_, entry| entry.alive.strong_count() > 0);
    map.entry(key)
        .or_insert_with(|| Entry {
            alive,
            records: Vec::new(),
        })
        .records
        .push(record);
}

pub(crate) fn take_all_by_key(key: usize) -> Vec<PendingRecord> {
    let mut map = table();
    match map.remove(&key) {
        Some(entry) if entry.alive.strong_count() > 0 => entry.records,
        _ => Vec::new(),
    }
}

/// Removes and returns all pending records for `error`, oldest first.
///
/// Idempotent: a second call returns an empty vector. An error with no
/// entry is not a failure, just an empty result.
pub(crate) fn take_all<E>(error: &Arc<E>) -> Vec<PendingRecord>
where
    E: Send + Sync + 'static,
{
    take_all_by_key(error_key(error))
}

/// Non-destructive read of `error`'s pending records, oldest first.
///
/// Diagnostics only; no core flow needs this, but tests do.
pub fn peek_pending<E>(error: &Arc<E>) -> Vec<PendingRecord>
where
    E: Send + Sync + 'static,
{
    let map = table();
    match map.get(&error_key(error)) {
        Some(entry) if entry.alive.strong_count() > 0 => entry.records.clone(),
        _ => Vec::new(),
    }
}

/// Number of records currently pending against `error`.
pub fn pending_count<E>(error: &Arc<E>) -> usize
where
    E: Send + Sync + 'static,
{
    let map = table();
    match map.get(&error_key(error)) {
        Some(entry) if entry.alive.strong_count() > 0 => entry.records.len(),
        _ => 0,
    }
}
