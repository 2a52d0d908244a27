//SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site sugar over the method API.
//!
//! The emission macros take a logger expression followed by ordinary
//! `format!` syntax; [`attach!`](crate::attach!) takes an error, an
//! optional `level:` override, and the message.

/// Logs at [`Debug`](crate::Level::Debug) through an
/// [`AttributedLogger`](crate::AttributedLogger).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Debug, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Info, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Warning, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Error, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Critical`](crate::Level::Critical).
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Critical, ::core::format_args!($($arg)+))
    };
}

/// Attaches a pending record to an error.
///
/// ```rust
/// use deferlog::Level;
/// use std::sync::Arc;
///
/// let error = Arc::new("it broke".to_string());
/// deferlog::attach!(&error, "failed with {}", "x");
/// deferlog::attach!(&error, level: Level::Warning, "retried {} times", 3);
/// assert_eq!(deferlog::pending_count(&error), 2);
/// # let _ = deferlog::log_exception_at(&error, Level::Debug, false);
/// ```
#[macro_export]
macro_rules! attach {
    ($error:expr, level: $level:expr, $($arg:tt)+) => {
        $crate::attach_at($error, $level, ::core::format_args!($($arg)+))
    };
    ($error:expr, $($arg:tt)+) => {
        $crate::attach($error, ::core::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::store::take_all;
    use crate::{AttributedLogger, Level};
    use std::sync::Arc;

    #[test]
    fn attach_macro_forms_store_at_the_right_levels() {
        let error = Arc::new("macro error".to_string());
        crate::attach!(&error, "default level {}", 1);
        crate::attach!(&error, level: Level::Info, "explicit level");

        let records = take_all(&error);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "default level 1");
        assert_eq!(records[0].level, Level::Critical);
        assert_eq!(records[1].level, Level::Info);
    }

    #[test]
    fn emission_macros_pick_their_levels() {
        let error = Arc::new("levels".to_string());
        let log = AttributedLogger::new("macro-levels");
        {
            let _scope = crate::log_to_exception(&log, &error);
            crate::debug!(&log, "d");
            crate::info!(&log, "i");
            crate::warning!(&log, "w");
            crate::error!(&log, "e");
            crate::critical!(&log, "c");
        }
        let levels: Vec<Level> = take_all(&error).iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            [
                Level::Debug,
                Level::Info,
                Level::Warning,
                Level::Error,
                Level::Critical
            ]
        );
    }
}
