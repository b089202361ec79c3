//! Logging setup for Rampart.
//!
//! Rampart crates log through `tracing` with key/value fields. This crate only
//! decides where those events go: it builds a `tracing-subscriber` registry
//! from a [`LogConfig`] and hands back the non-blocking writer guard.
//!
//! # Environment Variables
//!
//! - `RAMPART_DEBUG=1` - Force debug level
//! - `RAMPART_LOG_LEVEL=trace|debug|info|warn|error` - Set log level
//! - `RAMPART_LOG_FORMAT=json|pretty|compact|plain` - Set output format
//! - `RUST_LOG` - Full `EnvFilter` directive, wins over the level above
//!
//! # Example
//!
//! ```no_run
//! use rampart_log::{LogConfig, LogFormat, LogLevel};
//!
//! let _guard = LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .init();
//!
//! tracing::info!(handler = "UserController::login", "validation enabled");
//! ```

use std::env;
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use tracing_subscriber::util::TryInitError;

// ============================================================================
// Levels and formats
// ============================================================================

/// Minimum level of events that reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ParseLogError(format!("unknown log level '{}'", other))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event (default)
    Json,
    /// Multi-line, human oriented
    Pretty,
    /// Single line, abbreviated
    Compact,
    /// Single line, full
    Plain,
}

impl FromStr for LogFormat {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "plain" | "text" => Ok(LogFormat::Plain),
            other => Err(ParseLogError(format!("unknown log format '{}'", other))),
        }
    }
}

/// Returned when a level or format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLogError(String);

impl fmt::Display for ParseLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseLogError {}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
///
/// ```
/// use rampart_log::{LogConfig, LogFormat, LogLevel};
///
/// let config = LogConfig::new()
///     .level(LogLevel::Warn)
///     .format(LogFormat::Compact)
///     .with_env_filter("rampart_validation=trace");
/// assert_eq!(config.level, LogLevel::Warn);
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Write to stderr instead of stdout
    pub stderr: bool,
    pub targets: bool,
    pub thread_ids: bool,
    /// Explicit filter directive, overrides `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            stderr: false,
            targets: true,
            thread_ids: false,
            env_filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `RAMPART_*` environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let debug = env::var("RAMPART_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let level = env::var("RAMPART_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { LogLevel::Debug } else { LogLevel::Info });

        let format = env::var("RAMPART_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Json);

        Self {
            level,
            format,
            ..Self::default()
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn use_stderr(mut self, enable: bool) -> Self {
        self.stderr = enable;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    /// Set a filter directive such as `"rampart_validation=trace,info"`.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(directive) => {
                EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str())),
        }
    }

    /// Install the global subscriber.
    ///
    /// Keep the returned guard alive for the life of the process; dropping it
    /// flushes buffered lines. If a subscriber is already installed this
    /// leaves it in place and still returns the (unused) guard.
    pub fn init(self) -> WorkerGuard {
        match self.try_init() {
            Ok(guard) => guard,
            Err((guard, _)) => guard,
        }
    }

    /// Install the global subscriber, reporting whether one was already set.
    pub fn try_init(self) -> Result<WorkerGuard, (WorkerGuard, TryInitError)> {
        let (writer, guard) = if self.stderr {
            tracing_appender::non_blocking(io::stderr())
        } else {
            tracing_appender::non_blocking(io::stdout())
        };
        let filter = self.filter();
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            LogFormat::Json => registry
                .with(
                    tfmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    tfmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    tfmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
            LogFormat::Plain => registry
                .with(
                    tfmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init(),
        };

        match result {
            Ok(()) => Ok(guard),
            Err(e) => Err((guard, e)),
        }
    }
}
