use std::fmt::{Display, Formatter};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

// The process-wide termination token
static TOKEN: OnceLock<CancellationToken> = OnceLock::new();

// Why the context was terminated (first cause wins)
static CAUSE: OnceLock<TerminationCause> = OnceLock::new();

/// Facade over the process-wide termination context.
///
/// The context starts alive and can be [terminated](AppContext::terminate)
/// exactly once; repeated terminations have no additional effect. Terminating
/// the context is what starts the orderly shutdown of a Lastcall application:
/// the launchpad stops waiting on the main logic and proceeds to run the
/// shutdown hooks.
///
/// Operating system signals are process-global by nature, which is why this is
/// a facade over static state rather than a value to pass around.
///
/// ## Example
///
/// ```rust
/// use lastcall_core::{AppContext, TerminationCause};
///
/// #[tokio::main]
/// async fn main() {
///     let watcher = tokio::spawn(async {
///         AppContext::terminated().await;
///         AppContext::cause()
///     });
///
///     AppContext::terminate(TerminationCause::Requested);
///
///     assert_eq!(watcher.await.unwrap(), Some(TerminationCause::Requested));
/// }
/// ```
pub struct AppContext;

/// The reason the [`AppContext`] was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationCause {
    /// The application's main logic ran to completion.
    Completed,

    /// Application code asked for termination.
    Requested,

    /// An OS shutdown signal was intercepted.
    Signal,
}

impl Display for TerminationCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Completed => "main logic completed",
            Self::Requested => "termination requested",
            Self::Signal => "shutdown signal",
        })
    }
}

impl AppContext {
    fn token() -> &'static CancellationToken {
        TOKEN.get_or_init(CancellationToken::new)
    }

    /// Waits until the context is terminated. Completes immediately if it
    /// already is.
    pub async fn terminated() {
        Self::token().cancelled().await;
    }

    /// Terminates the context for the given `cause`. Only the first call has
    /// an effect; the cause it records is the one [reported](AppContext::cause).
    pub fn terminate(cause: TerminationCause) {
        if CAUSE.set(cause).is_ok() {
            info!(%cause, "Terminating application context");
        }

        Self::token().cancel();
    }

    /// Reports why the context was terminated, or [`None`] while it is alive.
    pub fn cause() -> Option<TerminationCause> {
        CAUSE.get().copied()
    }

    /// Reports whether the context has been terminated as of this moment.
    pub fn is_terminated() -> bool {
        Self::token().is_cancelled()
    }

    /// Reports whether the context is still alive as of this moment.
    pub fn is_alive() -> bool {
        !Self::is_terminated()
    }

    /// Starts listening for OS shutdown signals, which **replaces** the
    /// default signal behavior of the whole process:
    ///
    /// - the first `SIGINT` or `SIGTERM` (`ctrl_c` off Unix) terminates this
    ///   context with [`TerminationCause::Signal`];
    /// - a repeated signal exits the process immediately with status `1`.
    ///   This is the way out of a shutdown that hangs, e.g. on a logging gate
    ///   that is never released.
    ///
    /// Repeated calls have no additional effect. The returned future completes
    /// once listening has started. Must be called within a Tokio runtime.
    pub async fn auto_terminate() {
        static CALLED: AtomicBool = AtomicBool::new(false);

        if CALLED.swap(true, Ordering::Relaxed) {
            return;
        }

        tokio::spawn(Self::listen_for_shutdown_signals());

        // Let the listener register its signal handlers
        tokio::task::yield_now().await;
    }

    async fn listen_for_shutdown_signals() {
        if let Err(error) = Self::wait_for_shutdown_signal().await {
            error!(%error, "Cannot listen for shutdown signals");
            return;
        }

        info!("Shutdown signal intercepted");
        Self::terminate(TerminationCause::Signal);

        if let Err(error) = Self::wait_for_shutdown_signal().await {
            error!(%error, "Cannot listen for repeated shutdown signals");
            return;
        }

        warn!("Repeated shutdown signal intercepted; exiting");
        std::process::exit(1);
    }

    #[cfg(unix)]
    async fn wait_for_shutdown_signal() -> std::io::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            biased;
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }

        Ok(())
    }

    #[cfg(not(unix))]
    async fn wait_for_shutdown_signal() -> std::io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}
