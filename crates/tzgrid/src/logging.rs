//! Logging setup.
//!
//! tzgrid reports through `tracing`. The header summary written by setup and
//! the line written by `print_timezone` are `info` events; everything the
//! lookup engine does per query is at `debug`, flash traffic at `trace`.
//! Log output goes to stderr so that command output on stdout stays clean.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Diagnostic summary lines (info and above).
    #[default]
    Normal,
    /// Per-lookup detail (debug and above).
    Verbose,
    /// Flash reads (trace).
    Trace,
}

impl Verbosity {
    /// Derive verbosity from `-q` and a count of `-v` flags.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    fn directive(self) -> String {
        format!("tzgrid={}", self.to_level_filter())
    }
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. At normal verbosity
/// the output is just the message, like a serial console; higher levels add
/// timestamps and targets.
///
/// ```no_run
/// use tzgrid::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let detailed = verbosity >= Verbosity::Verbose;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(detailed)
        .with_level(detailed);

    let registry = tracing_subscriber::registry().with(env_filter);
    // Ignore the error if a subscriber is already installed
    let _ = if detailed {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    };
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tzgrid=debug")
        .with_test_writer()
        .try_init();
}
