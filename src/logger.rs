//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::log_record::LogRecord;
use std::fmt::Debug;

/// A log sink.
///
/// Sinks receive fully-composed [`LogRecord`]s; severity filtering, caller
/// attribution and deferred capture all happen before a record reaches a
/// sink. Register sinks process-wide via
/// [`add_global_logger`](crate::add_global_logger) /
/// [`set_global_loggers`](crate::set_global_loggers).
pub trait Logger: Debug + Send + Sync {
    /**
        Submits the log record for output.
    */
    fn finish_log_record(&self, record: LogRecord);

    /**
    The process may imminently exit.  Ensure all buffers are flushed.

    The termination hook calls this on every registered sink after emitting
    an uncaught error's pending records, before default panic reporting.
    */
    fn prepare_to_die(&self);
}

/*
Boilerplate notes.

# Logger

Clone on a sink trait object doesn't make sense; sinks are shared via Arc.
PartialEq/Hash are ambiguous between data equality and provenance, so
neither is required. Send + Sync are supertraits because the global sink
registry hands the same sink to every thread.
*/
