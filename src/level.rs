//SPDX-License-Identifier: MIT OR Apache-2.0

/// Severity of a log message.
///
/// Variants are totally ordered from least to most severe; a logger with
/// threshold `Warning` emits `Warning`, `Error` and `Critical` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Detailed output, enabled per-logger via `--debug`
    Debug,
    /// Progress messages, enabled via `--verbose`
    Info,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
    /// Severe enough to survive `--quiet`; default for attached records
    Critical,
}

impl Level {
    pub(crate) fn index(self) -> u8 {
        match self {
            Level::Debug => 0,
            Level::Info => 1,
            Level::Warning => 2,
            Level::Error => 3,
            Level::Critical => 4,
        }
    }

    pub(crate) fn from_index(index: u8) -> Level {
        match index {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warning,
            3 => Level::Error,
            _ => Level::Critical,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}
