//SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller resolution: deciding which stack frame a log message is charged to.
//!
//! Ordinary logging facilities attribute a message to its immediate caller,
//! which for library code is usually some helper three layers below anything
//! the reader recognizes. This module walks the real call stack instead:
//! frames belonging to this crate are skipped unconditionally, frames whose
//! function name appears in a logger's ignore-set are skipped on request, and
//! the first survivor becomes the attributed [`Caller`].
//!
//! Ignore-set matching is by *simple* name (the last `::` segment), not the
//! fully-qualified path. Two unrelated functions that share a name are
//! therefore both skipped; this is a known limitation, kept deliberately so
//! ignore-sets populated from [`log_at_caller`](crate::log_at_caller) keep
//! working when a function moves between modules.

use std::collections::HashSet;
use thiserror::Error;

/// The frame a log message is attributed to.
///
/// Also used for the raw captured stack: a capture is just a `Vec<Caller>`
/// ordered innermost-first. `file` and `line` are absent when debug info is
/// unavailable for the frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    /// Demangled fully-qualified function name.
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// The stack walk was exhausted without finding an attributable frame.
///
/// Never surfaced to callers of the logging API; recovery falls back to the
/// innermost non-engine frame via [`resolve_or_innermost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no stack frame outside the engine and the ignore set")]
pub struct ResolutionError;

/// Symbol prefixes that are never attributable: this crate's own frames and
/// the capture machinery itself.
const ENGINE_PREFIXES: &[&str] = &["deferlog::", "backtrace::"];

fn is_engine_frame(function: &str) -> bool {
    // Trait impls demangle as "<deferlog::x::Y as ...>::method".
    let function = function.strip_prefix('<').unwrap_or(function);
    ENGINE_PREFIXES
        .iter()
        .any(|prefix| function.starts_with(prefix))
}

/// Last `::` segment of a (demangled) function path.
pub fn simple_name(function: &str) -> &str {
    function.rsplit("::").next().unwrap_or(function)
}

/// Captures the current call stack, innermost frame first.
///
/// Frames without a resolvable symbol name are dropped; they cannot be
/// attributed or matched against an ignore-set anyway.
pub fn capture_raw_stack() -> Vec<Caller> {
    let mut frames = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if let Some(name) = symbol.name() {
                frames.push(Caller {
                    function: format!("{name:#}"),
                    file: symbol.filename().map(|p| p.display().to_string()),
                    line: symbol.lineno(),
                });
            }
        });
        true
    });
    frames
}

/// Walks `frames` outward and returns the first attributable frame.
///
/// Engine frames are skipped unconditionally, independent of `ignore`; among
/// the remaining frames, any whose simple name is in `ignore` is skipped.
pub fn resolve(frames: &[Caller], ignore: &HashSet<String>) -> Result<Caller, ResolutionError> {
    frames
        .iter()
        .filter(|frame| !is_engine_frame(&frame.function))
        .find(|frame| !ignore.contains(simple_name(&frame.function)))
        .cloned()
        .ok_or(ResolutionError)
}

/// [`resolve`], with the recovery policy applied: an exhausted walk falls
/// back to the innermost non-engine frame, and a stack with no usable frame
/// at all yields a placeholder caller rather than failing.
pub fn resolve_or_innermost(frames: &[Caller], ignore: &HashSet<String>) -> Caller {
    match resolve(frames, ignore) {
        Ok(caller) => caller,
        Err(ResolutionError) => frames
            .iter()
            .find(|frame| !is_engine_frame(&frame.function))
            .cloned()
            .unwrap_or_else(unknown_caller),
    }
}

fn unknown_caller() -> Caller {
    Caller {
        function: "(unknown function)".to_string(),
        file: None,
        line: None,
    }
}

/// Renders the non-engine portion of a captured stack, one frame per line,
/// for inclusion in an emitted record.
pub(crate) fn render_trace(frames: &[Caller]) -> String {
    let mut out = String::new();
    for frame in frames.iter().filter(|f| !is_engine_frame(&f.function)) {
        out.push_str("    ");
        out.push_str(&frame.function);
        if let Some(file) = &frame.file {
            out.push_str(" (");
            out.push_str(file);
            if let Some(line) = frame.line {
                out.push_str(&format!(":{line}"));
            }
            out.push(')');
        }
        out.push('\n');
    }
    out
}
