//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# deferlog

deferlog is a logging library for code that doesn't yet know whether its log
messages matter.

# The problem

A library function hits a problem, builds an error, and returns it. Should it
also log? If it logs now, it spams every caller that handles the error
cleanly. If it stays silent, the one caller that *doesn't* handle the error
loses the context that would have explained it. The function is being asked
to make a severity decision that belongs to someone further up the stack.

deferlog splits the decision in two. At raise time, the library *attaches* a
fully-attributed log record to the error value. Later, whoever catches the
error decides what that record is worth: suppress it by dropping the error,
re-emit it at a severity of their choosing, or let it escape, in which case
a process-wide termination hook prints every still-pending record before the
default panic report.

# The API

Errors are tracked behind `Arc` (identity, not value equality: two equal
errors are tracked independently, and the engine never keeps an error alive).

```rust
use deferlog::Level;
use std::sync::Arc;

fn load() -> Result<(), Arc<std::io::Error>> {
    let error = Arc::new(std::io::Error::other("truncated header"));
    deferlog::attach!(&error, "failed while reading {}", "config.toml");
    Err(error)
}

match load() {
    Ok(()) => {}
    Err(error) => {
        // This caller considers the failure routine: emit the attached
        // record at Debug instead of the Critical it was captured at.
        deferlog::log_exception_at(&error, Level::Debug, false);
    }
}
```

The scoped shape redirects a whole block of ordinary log calls into an
error instead:

```rust
use deferlog::{log_to_exception, logger};
use std::sync::Arc;

let error = Arc::new("upstream refused".to_string());
let log = logger("mylib::net");
{
    let _scope = log_to_exception(&log, &error);
    deferlog::warning!(&log, "handshake took {}ms", 870);
}
assert_eq!(deferlog::pending_count(&error), 1);
# deferlog::log_exception_at(&error, deferlog::Level::Debug, false);
```

# Attribution

Every record is attributed to its *logical* call site, resolved by walking
the real stack: frames of this crate are skipped always, and a per-logger
ignore-set skips wrapper frames on request. A helper that logs on behalf of
its caller opens a [`log_at_caller`] scope so nested log calls attribute one
frame further out. See [`stack`] for the exact rules (and the deliberate
simple-name matching limitation).

# Termination

Call [`termination::install`] once at startup. Code that decides an error is
terminal calls [`terminate_with`]; the hook emits the error's pending
records at their captured levels before default panic reporting. Errors with
nothing attached terminate exactly as if deferlog were not present.

# Sinks

Emitted records go to the process-wide sink registry ([`global_loggers`]),
which defaults to stderr. [`InMemoryLogger`] captures output for tests;
`StdErrorLogger::colored()` colors lines by severity.
*/

mod attachment;
mod attributed_logger;
mod caller;
pub mod config;
pub mod global_logger;
mod inmemory_logger;
mod level;
mod log_record;
mod logger;
mod macros;
pub mod stack;
mod stderror_logger;
mod store;
pub mod termination;

pub use attachment::{AttachmentScope, attach, attach_at, log_exception, log_exception_at, log_to_exception};
pub use attributed_logger::{AttributedLogger, logger, root_logger};
pub use caller::{CallerScope, log_at_caller};
pub use config::{LevelFlags, derive_logger_levels};
pub use global_logger::{add_global_logger, global_loggers, set_global_loggers};
pub use inmemory_logger::InMemoryLogger;
pub use level::Level;
pub use log_record::LogRecord;
pub use logger::Logger;
pub use stack::{Caller, ResolutionError};
pub use stderror_logger::StdErrorLogger;
pub use store::{PendingRecord, peek_pending, pending_count};
pub use termination::{emit_pending, terminate_with};
