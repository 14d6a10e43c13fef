use crate::AppConfig;
use tokio::runtime::Runtime;
use tracing::info;

/// Defines the **preflight wiring** stage of a Lastcall application.
///
/// This represents the final step in the startup sequence, executed immediately
/// before the application's main asynchronous logic begins. Logging is up by
/// now.
///
/// ## Customization example
///
/// ```
/// use lastcall::{App, AppConfig, Lifecycle, PreflightWiring};
/// use tokio::runtime::Runtime;
///
/// fn main() -> Result<(), lastcall::LaunchError> {
///     App::launchpad(|_: Lifecycle| async {})
///         .with_preflight_wiring(QuietPreflightWiring)
///         .boot()
/// }
///
/// struct QuietPreflightWiring;
///
/// impl PreflightWiring for QuietPreflightWiring {
///     fn announce_startup(&self, _config: &AppConfig, _runtime: &Runtime) {
///         // Don’t announce startup
///     }
/// }
/// ```
pub trait PreflightWiring {
    /// Runs the preflight wiring stage.
    fn run(&self, config: &AppConfig, runtime: &Runtime) {
        self.announce_startup(config, runtime);
    }

    /// Announces that the application has started.
    fn announce_startup(&self, config: &AppConfig, runtime: &Runtime) {
        info!(
            workers = runtime.metrics().num_workers(),
            manager = ?config.tracing().manager(),
            "Starting {}",
            config.name(),
        );
    }
}

/// The default `PreflightWiring` implementation.
pub(crate) struct DefaultPreflightWiring;

impl PreflightWiring for DefaultPreflightWiring {}
