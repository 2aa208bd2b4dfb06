//! Per-run settings shared by the pipeline stages.

use std::fmt;

use log::{Level, LevelFilter};

/// Verbosity of a run, created once from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    level: LevelFilter,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl RunContext {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// `-q` reports errors only; each `-v` adds a level above info.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            LevelFilter::Error
        } else {
            match verbose {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        Self::new(level)
    }

    /// The level the installed logger actually lets through, which
    /// `RUST_LOG` may have moved away from the command-line verbosity.
    pub fn from_logger() -> Self {
        Self::new(log::max_level())
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Emit a progress message if this run is verbose enough for it.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            log::log!(level, "{}", args);
        }
    }
}
