//! Logging support for the surface pool.
//!
//! The pool reports through `tracing`. Operational messages go to
//! [`TARGET`], per-period counters to [`STATS_TARGET`]. Applications that
//! already install a subscriber need nothing from this module; [`init`] is a
//! convenience for binaries and tests that don't.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target for operational pool events.
pub const TARGET: &str = "surface_pool";

/// Target for the per-period statistics event.
pub const STATS_TARGET: &str = "surface_pool::stats";

/// Log level for surface pool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Trace-level logging (very verbose)
    Trace = 0,
    /// Debug-level logging
    Debug = 1,
    /// Info-level logging
    Info = 2,
    /// Warning-level logging
    Warn = 3,
    /// Error-level logging
    Error = 4,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from_level(level.into())
    }
}

/// Build the filter for `config`.
///
/// `RUST_LOG` wins when set. Otherwise pool targets log at the configured
/// level, or not at all when logging is disabled.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if config.enabled {
            LevelFilter::from(config.level)
        } else {
            LevelFilter::OFF
        };
        let directive: Directive = format!("{TARGET}={level}")
            .parse()
            .unwrap_or_else(|_| LevelFilter::OFF.into());
        EnvFilter::default().add_directive(directive)
    })
}

/// Install a global fmt subscriber for `config`.
///
/// Returns `false` when logging is disabled or a global subscriber is
/// already installed; an existing subscriber keeps receiving events.
pub fn init(config: &LoggingConfig) -> bool {
    if !config.enabled {
        return false;
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(target: TARGET, level = %config.level, "logging initialized");
    }
    installed
}
