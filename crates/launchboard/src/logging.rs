//! Log output for the CLI and the dashboard server.
//!
//! Two targets matter: `launchboard` (dataset load, dispatch, server lifecycle)
//! and `tower_http` (one span per HTTP request from the router's `TraceLayer`).
//! Both follow the `-v`/`-q` flags unless `RUST_LOG` is set.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets that receive the verbosity level.
const LOG_TARGETS: [&str; 2] = ["launchboard", "tower_http"];

/// How much to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// Startup, dataset load and server address.
    #[default]
    Normal,
    /// `-v` or `server.debug`: every dispatch and request.
    Verbose,
    /// `-vv`: everything.
    Trace,
}

impl Verbosity {
    /// Map the CLI flags to a verbosity. `-q` wins over `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The tracing level for this verbosity.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Raise `Normal` to `Verbose` when the server runs in debug mode.
    ///
    /// Explicit `-q` or `-vv` choices are left alone.
    #[must_use]
    pub fn with_debug(self, debug: bool) -> Self {
        if debug && self == Self::Normal {
            Self::Verbose
        } else {
            self
        }
    }

    /// Filter directive applying this level to the crate and request traces.
    #[must_use]
    pub fn filter_directive(self) -> String {
        let level = self.level();
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. `RUST_LOG` replaces the directive derived
/// from `verbosity`. Later calls are no-ops.
///
/// ```no_run
/// use launchboard::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Normal.with_debug(true));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Route crate warnings into the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("launchboard=warn")
        .with_test_writer()
        .try_init();
}
