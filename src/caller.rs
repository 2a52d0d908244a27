//SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped "attribute to my caller" construct.
//!
//! A helper that logs on behalf of its caller can open a
//! [`log_at_caller`] scope: the currently executing function's name is added
//! to the logger's ignore-set, so nested log calls resolve one frame
//! further out. The name is removed again when the scope drops, on every
//! exit path, and the counted ignore-set semantics make reentrant or
//! recursive use of the same function safe: the name stays ignored until
//! the outermost scope exits.
//!
//! ```rust
//! use deferlog::{log_at_caller, logger};
//!
//! fn emit_diagnostics(log: &deferlog::AttributedLogger) {
//!     let _scope = log_at_caller(log);
//!     // Attributed to whoever called emit_diagnostics, not to
//!     // emit_diagnostics itself.
//!     deferlog::warning!(log, "state looks inconsistent");
//! }
//!
//! let log = logger("mylib::diag");
//! emit_diagnostics(&log);
//! ```

use crate::attributed_logger::AttributedLogger;
use crate::stack;
use std::collections::HashSet;

/// RAII guard created by [`log_at_caller`]; removes one count of the
/// captured function name from the logger's ignore-set on drop.
#[must_use = "the function is only ignored while the scope is alive"]
#[derive(Debug)]
pub struct CallerScope {
    logger: AttributedLogger,
    function: String,
}

impl CallerScope {
    /// Simple name of the function this scope is ignoring.
    pub fn function(&self) -> &str {
        &self.function
    }
}

impl Drop for CallerScope {
    fn drop(&mut self) {
        self.logger.unignore_function(&self.function);
    }
}

/// Adds the currently executing function (the innermost non-engine frame at
/// the point of this call) to `logger`'s ignore-set until the returned
/// scope drops.
pub fn log_at_caller(logger: &AttributedLogger) -> CallerScope {
    let frames = stack::capture_raw_stack();
    let current = stack::resolve_or_innermost(&frames, &HashSet::new());
    let function = stack::simple_name(&current.function).to_string();
    logger.ignore_function(&function);
    CallerScope {
        logger: logger.clone(),
        function,
    }
}
