#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(test, deny(warnings))]

/// Implements component-specific facades.
mod facade {
    /// Implements the [`AppConfig`] facade.
    pub mod config;

    /// Implements the [`DotEnv`] facade.
    pub mod dotenv;

    /// Implements the [`Pivot`] directory resolution.
    pub mod pivot;
}

/// Re-exports the [`AppConfig`]-related types.
pub use self::facade::config::assembler::{Assembler, AssemblerChoices};
pub use self::facade::config::{AppConfig, RuntimeConfig, ShutdownConfig};

/// Re-exports the [`DotEnv`] facade.
pub use self::facade::dotenv::DotEnv;

/// Re-exports the [`Pivot`] facade.
pub use self::facade::pivot::Pivot;

/// Implements the [`LaunchError`] type.
mod error;
pub use self::error::LaunchError;

/// Re-exports the public API of `lastcall-core` in the root of this crate for
/// convenience.
pub use lastcall_core::*;

/// Re-exports the public API of `lastcall-tracing` for convenience.
pub use lastcall_tracing as logging;

/// Re-exports the public API of `tokio` for convenience.
pub use tokio;

/// Partly re-exports the public API of `tracing` for convenience.
pub use tracing;

/// Implements the [`Launchpad`] utility for building an [`App`].
mod launchpad;
pub use self::launchpad::Launchpad;
pub use self::launchpad::exit::LOG_FINALIZER_SUFFIX;
pub use self::launchpad::lifecycle::Lifecycle;
pub use self::launchpad::wiring::configuration::ConfigurationWiring;
pub use self::launchpad::wiring::logging::LoggingWiring;
pub use self::launchpad::wiring::preflight::PreflightWiring;
pub use self::launchpad::wiring::runtime::RuntimeWiring;

/// Implements the [`App`] facade.
mod app;
pub use self::app::App;
