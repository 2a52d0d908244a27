//SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation from CLI-style verbosity flags to per-logger levels.
//!
//! This is deliberately thin glue: [`derive_logger_levels`] is a pure
//! function from flags to a name→level mapping, and applying the mapping is
//! a separate step so callers can inspect or merge it first. The flag
//! parser itself lives with the host application.

use crate::{Level, logger};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the root logger.
pub const ROOT_LOGGER: &str = "root";

/// Alias accepted in flag lists that refers to the root logger.
pub const ROOT_ALIAS: &str = "__root__";

/// Verbosity flags as a CLI front-end would collect them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFlags {
    /// `--verbose`: show progress output (root logger at `Info`).
    pub verbose: bool,
    /// `--debug a,b,c`: logger names to drop to `Debug`.
    pub debug: BTreeSet<String>,
    /// `--quiet`: only `Critical` messages from the root logger.
    pub quiet: bool,
}

/// Derives per-logger levels from `flags`. Pure and stateless.
///
/// Rules apply in order (verbose, then debug names, then quiet) and a
/// later rule wins when both target the same logger, so
/// `--verbose --quiet` leaves the root logger at `Critical` while
/// `--quiet --debug mylib` still enables debug output for `mylib`.
pub fn derive_logger_levels(flags: &LevelFlags) -> BTreeMap<String, Level> {
    let mut levels = BTreeMap::new();
    if flags.verbose {
        levels.insert(ROOT_LOGGER.to_string(), Level::Info);
    }
    for name in &flags.debug {
        let name = if name == ROOT_ALIAS {
            ROOT_LOGGER
        } else {
            name.as_str()
        };
        levels.insert(name.to_string(), Level::Debug);
    }
    if flags.quiet {
        levels.insert(ROOT_LOGGER.to_string(), Level::Critical);
    }
    levels
}

/// Applies a derived mapping to the logger registry.
pub fn apply_logger_levels(levels: &BTreeMap<String, Level>) {
    for (name, level) in levels {
        logger(name).set_level(*level);
    }
}
