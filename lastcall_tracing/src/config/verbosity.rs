use log::LevelFilter as LogLevelFilter;
use serde::Deserialize;
use tracing_core::LevelFilter as TracingLevelFilter;

/// A deserializable verbosity level, convertible both to the `tracing` crate’s
/// [`LevelFilter`](TracingLevelFilter) and to the `log` crate’s
/// [`LevelFilter`](LogLevelFilter).
///
/// A level is “higher” when it is more verbose: [`Trace`](Verbosity::Trace) is
/// higher than [`Error`](Verbosity::Error).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Log **nothing**.
    #[serde(alias = "no", alias = "none")]
    Off,

    /// Log errors only.
    #[serde(alias = "err")]
    Error,

    /// Log warnings and errors.
    #[serde(alias = "warning")]
    Warn,

    /// Log informational messages and above.
    #[default]
    Info,

    /// Log debug messages and above.
    Debug,

    /// Log **everything**.
    Trace,
}

impl Verbosity {
    /// Translates to the `tracing` crate’s [`LevelFilter`](TracingLevelFilter).
    pub fn to_tracing_level_filter(&self) -> TracingLevelFilter {
        match self {
            Self::Off => TracingLevelFilter::OFF,
            Self::Error => TracingLevelFilter::ERROR,
            Self::Warn => TracingLevelFilter::WARN,
            Self::Info => TracingLevelFilter::INFO,
            Self::Debug => TracingLevelFilter::DEBUG,
            Self::Trace => TracingLevelFilter::TRACE,
        }
    }

    /// Translates to the `log` crate’s [`LevelFilter`](LogLevelFilter), used
    /// to pre-filter records crossing the `log` bridge.
    pub fn to_log_level_filter(&self) -> LogLevelFilter {
        match self {
            Self::Off => LogLevelFilter::Off,
            Self::Error => LogLevelFilter::Error,
            Self::Warn => LogLevelFilter::Warn,
            Self::Info => LogLevelFilter::Info,
            Self::Debug => LogLevelFilter::Debug,
            Self::Trace => LogLevelFilter::Trace,
        }
    }
}

impl From<Verbosity> for TracingLevelFilter {
    fn from(value: Verbosity) -> Self {
        value.to_tracing_level_filter()
    }
}

impl From<&Verbosity> for TracingLevelFilter {
    fn from(value: &Verbosity) -> Self {
        value.to_tracing_level_filter()
    }
}

impl From<Verbosity> for LogLevelFilter {
    fn from(value: Verbosity) -> Self {
        value.to_log_level_filter()
    }
}
