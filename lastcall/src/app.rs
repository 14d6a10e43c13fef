use crate::{LaunchError, Launchpad, Lifecycle};

/// The primary entry point for launching a Lastcall application.
///
/// Use [`App::boot`] for a quick start with default settings, or
/// [`App::launchpad`] to customize the startup process.
pub struct App;

impl App {
    /// Starts a Lastcall application with default settings.
    ///
    /// Creates a default [`Launchpad`], runs the startup process, executes the
    /// future returned by `main`, and handles the orderly exit.
    ///
    /// ## Example
    ///
    /// ```
    /// use lastcall::{App, Lifecycle, TeardownError};
    ///
    /// fn main() -> Result<(), lastcall::LaunchError> {
    ///     App::boot(async_main)
    /// }
    ///
    /// async fn async_main(lifecycle: Lifecycle) {
    ///     lifecycle
    ///         .coordinate(|_interrupt| {
    ///             lastcall::tracing::info!("Still logging while tearing down");
    ///             Ok::<(), TeardownError>(())
    ///         })
    ///         .expect("the exit sequence has not started yet");
    ///
    ///     lastcall::tracing::info!("Executing the main logic");
    /// }
    /// ```
    pub fn boot<Main, MainFuture>(main: Main) -> Result<(), LaunchError>
    where
        Main: FnOnce(Lifecycle) -> MainFuture,
        MainFuture: Future<Output = ()>,
    {
        Self::launchpad(main).boot()
    }

    /// Creates a `Launchpad` for custom application startup.
    ///
    /// ## Example
    ///
    /// ```
    /// use lastcall::{App, Lifecycle};
    ///
    /// fn main() -> Result<(), lastcall::LaunchError> {
    ///     App::launchpad(async_main)
    ///         .with_config_dir("settings")
    ///         .with_env_prefix("BILLING")
    ///         .boot()
    /// }
    ///
    /// async fn async_main(lifecycle: Lifecycle) {
    ///     assert_eq!(lifecycle.config().name(), "app");
    /// }
    /// ```
    pub fn launchpad<Main, MainFuture>(main: Main) -> Launchpad<Main>
    where
        Main: FnOnce(Lifecycle) -> MainFuture,
        MainFuture: Future<Output = ()>,
    {
        Launchpad::new(main)
    }
}
