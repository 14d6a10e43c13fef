use crate::{AppConfig, LaunchError};
use lastcall_sync::ReleaseGate;
use lastcall_tracing::LogManager;

/// Defines the **logging wiring** stage of a Lastcall application.
///
/// Installs process-wide logging and hands back the [`LogManager`] that the
/// exit sequence finalizes. The default implementation calls
/// [`bootstrap`](lastcall_tracing::bootstrap()) with the `tracing` section of
/// the configuration, so the `tracing.manager` key decides whether finalization
/// waits for the release gate.
///
/// A custom wiring that installs its own subscriber can return a
/// [`WaitingLogManager`](lastcall_tracing::WaitingLogManager) over a
/// [detached](lastcall_tracing::LogBackend::detached) backend to keep the exit
/// sequence intact.
pub trait LoggingWiring {
    /// Runs the logging wiring stage.
    fn run(&self, config: &AppConfig, gate: &ReleaseGate) -> Result<Box<dyn LogManager>, LaunchError> {
        Ok(lastcall_tracing::bootstrap(config.tracing(), gate)?)
    }
}

/// The default `LoggingWiring` implementation.
pub(crate) struct DefaultLoggingWiring;

impl LoggingWiring for DefaultLoggingWiring {}
