//SPDX-License-Identifier: MIT OR Apache-2.0

//! Emission of pending records when an error terminates the process.
//!
//! An error that nobody catches should still get its attached records out
//! before the default termination report. The hook here is the Rust
//! analogue of a process-wide uncaught-exception handler:
//!
//! 1. Call [`install`] once at startup. Installation is explicit and
//!    idempotent; nothing happens at import time.
//! 2. Code that decides an error is terminal calls [`terminate_with`],
//!    which unwinds carrying the error's identity.
//! 3. The hook emits every still-pending record for that error at its
//!    originally captured level, flushes the sinks, and then defers to the
//!    previously installed panic hook for the default report.
//!
//! An error with no pending records changes nothing observable: the
//! previous hook runs exactly as it would have without this crate.
//!
//! Hosts that terminate through their own path (say, `main` returning
//! `Err`) can call [`emit_pending`] directly instead; it applies the same
//! captured-level emission.

use crate::global_logger::global_loggers;
use crate::store;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

static INSTALLED: AtomicBool = AtomicBool::new(false);
static ACTIVE: AtomicBool = AtomicBool::new(false);

thread_local! {
    // Set by terminate_with immediately before unwinding; the hook runs on
    // the panicking thread and takes it back out.
    static TERMINATING: RefCell<Option<Arc<dyn Any + Send + Sync>>> = const { RefCell::new(None) };
}

/// Installs the termination hook, chaining the previously installed panic
/// hook. Idempotent: installing twice has no additional effect.
pub fn install() {
    ACTIVE.store(true, Ordering::SeqCst);
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if ACTIVE.load(Ordering::SeqCst) {
            emit_for_terminating_error();
        }
        previous(info);
    }));
}

/// Deactivates the hook. The chained panic hook stays in place (there is no
/// safe way to unsplice it), but behaves as if never installed.
pub fn uninstall() {
    ACTIVE.store(false, Ordering::SeqCst);
}

fn emit_for_terminating_error() {
    let Some(error) = TERMINATING.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    let records = store::take_all_by_key(store::error_key(&error));
    if records.is_empty() {
        return;
    }
    for record in records {
        let level = record.level;
        record.emit_at(level, true);
    }
    for sink in global_loggers() {
        sink.prepare_to_die();
    }
}

/// Terminates the current thread of control with `error`, unwinding so the
/// termination hook can emit the error's pending records before the default
/// panic report.
///
/// The error is kept alive through the unwind (the hook must still be able
/// to find its records), and its `Display` rendering becomes the panic
/// message.
pub fn terminate_with<E>(error: Arc<E>) -> !
where
    E: fmt::Display + Send + Sync + 'static,
{
    let summary = error.to_string();
    let error: Arc<dyn Any + Send + Sync> = error;
    TERMINATING.with(|slot| {
        *slot.borrow_mut() = Some(error);
    });
    panic!("uncaught error: {summary}");
}

/// Emits all of `error`'s pending records at their originally captured
/// levels, consuming them. The manual counterpart of the hook, for hosts
/// with their own termination path.
pub fn emit_pending<E>(error: &Arc<E>)
where
    E: Send + Sync + 'static,
{
    for record in store::take_all(error) {
        let level = record.level;
        record.emit_at(level, true);
    }
}
