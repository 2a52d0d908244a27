//SPDX-License-Identifier: MIT OR Apache-2.0

//! The termination hook: pending records of an error that was never caught
//! are emitted, once, before default panic reporting.

use deferlog::{InMemoryLogger, Level, log_exception, set_global_loggers, terminate_with};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

static TEST_LOGGER_GUARD: Mutex<()> = Mutex::new(());

fn install_sink() -> Arc<InMemoryLogger> {
    let sink = Arc::new(InMemoryLogger::new());
    set_global_loggers(vec![sink.clone()]);
    sink
}

#[test]
fn hook_emits_pending_records_then_consumes_them() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    deferlog::termination::install();
    deferlog::termination::install(); // idempotent
    let sink = install_sink();

    let error = Arc::new("fatal misconfiguration".to_string());
    deferlog::attach!(&error, "failed with {}", "x");

    let result = panic::catch_unwind(AssertUnwindSafe({
        let error = error.clone();
        move || terminate_with(error)
    }));
    assert!(result.is_err(), "terminate_with must unwind");

    let logs = sink.drain_logs();
    assert!(logs.contains("CRITICAL"), "got: {logs}");
    assert!(logs.contains("failed with x"), "got: {logs}");

    // The hook consumed the records; nothing is left to emit.
    log_exception(&error);
    assert_eq!(sink.drain_logs(), "");
}

#[test]
fn hook_defers_entirely_when_nothing_is_pending() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    deferlog::termination::install();
    let sink = install_sink();

    let error = Arc::new("clean failure".to_string());
    let result = panic::catch_unwind(AssertUnwindSafe({
        let error = error.clone();
        move || terminate_with(error)
    }));
    assert!(result.is_err());
    assert_eq!(sink.drain_logs(), "");
}

#[test]
fn hook_emits_each_record_at_its_captured_level() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    deferlog::termination::install();
    let sink = install_sink();

    let error = Arc::new("mixed severities".to_string());
    deferlog::attach!(&error, level: Level::Warning, "warned earlier");
    deferlog::attach!(&error, "critical annotation");

    let result = panic::catch_unwind(AssertUnwindSafe({
        let error = error.clone();
        move || terminate_with(error)
    }));
    assert!(result.is_err());

    let logs = sink.drain_logs();
    assert!(logs.contains("WARNING"), "got: {logs}");
    assert!(logs.contains("warned earlier"));
    assert!(logs.contains("CRITICAL"));
    assert!(logs.contains("critical annotation"));
}

#[test]
fn unrelated_panics_pass_through_untouched() {
    let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    deferlog::termination::install();
    let sink = install_sink();

    let error = Arc::new("bystander".to_string());
    deferlog::attach!(&error, "must stay pending");

    let result = panic::catch_unwind(|| panic!("ordinary panic"));
    assert!(result.is_err());

    assert_eq!(sink.drain_logs(), "");
    assert_eq!(deferlog::pending_count(&error), 1);
    log_exception(&error); // cleanup: consume before the error drops
    let _ = sink.drain_logs();
}
