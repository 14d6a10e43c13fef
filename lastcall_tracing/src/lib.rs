#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(test, deny(warnings))]

/// Implements the [`TracingConfig`] application configuration section.
mod config;
pub use self::config::TracingConfig;
pub use self::config::deserialize_optional_duration;
pub use self::config::flavor::FormatFlavor;
pub use self::config::manager::LogManagerChoice;
pub use self::config::output::LogOutput;
pub use self::config::verbosity::Verbosity;

/// Implements the custom formatted `tracing` layer.
mod fmt;
pub use self::fmt::make_layer;

/// Finalization of the logging backend.
mod manager;
pub use self::manager::{
    ImmediateLogManager, LogBackend, LogManager, WaitingLogManager, make_manager,
};

/// One-time installation of process-wide logging.
mod bootstrap;
pub use self::bootstrap::{BootstrapError, LOG_WRITER_THREAD_NAME, bootstrap};

/// Partly re-exports the public API of `tracing_*` for convenience.
pub use tracing_core::Subscriber;
pub use tracing_subscriber::Registry;
pub use tracing_subscriber::layer::SubscriberExt;
pub use tracing_subscriber::util::SubscriberInitExt;
