use crate::manager::{LogBackend, LogManager, make_manager};
use crate::{LogOutput, TracingConfig, make_layer};
use lastcall_sync::ReleaseGate;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::debug;
use tracing_appender::non_blocking::NonBlockingBuilder;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Name of the thread that drains the buffered log writer.
pub const LOG_WRITER_THREAD_NAME: &str = "log-writer";

static BOOTSTRAPPED: AtomicBool = AtomicBool::new(false);

/// Installs process-wide logging and returns the [`LogManager`] that finalizes
/// it at exit.
///
/// This does, in order:
///
/// 1. Bridges the `log` facade into `tracing` through [`LogTracer`], so that
///    dependencies logging via `log` end up in the same output.
/// 2. Builds the buffered, non-blocking writer over the configured
///    [output](TracingConfig::output).
/// 3. Installs the global subscriber: a [`Registry`](crate::Registry) with the
///    [formatted layer](make_layer).
/// 4. Picks the manager named by [`TracingConfig::manager`], handing it the
///    given gate.
///
/// Logging can be bootstrapped only once per process: later calls fail with
/// [`BootstrapError::AlreadyBootstrapped`].
pub fn bootstrap(
    config: &TracingConfig,
    gate: &ReleaseGate,
) -> Result<Box<dyn LogManager>, BootstrapError> {
    if BOOTSTRAPPED.swap(true, Ordering::AcqRel) {
        return Err(BootstrapError::AlreadyBootstrapped);
    }

    LogTracer::init_with_filter(config.verbosity().to_log_level_filter())?;

    let builder = NonBlockingBuilder::default()
        .buffered_lines_limit(config.buffered_lines())
        .lossy(config.lossy())
        .thread_name(LOG_WRITER_THREAD_NAME);
    let (writer, guard) = match config.output() {
        LogOutput::Stdout => builder.finish(std::io::stdout()),
        LogOutput::Stderr => builder.finish(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(make_layer(config, writer))
        .try_init()?;

    debug!(
        manager = ?config.manager(),
        output = ?config.output(),
        "Logging bootstrapped",
    );

    Ok(make_manager(
        config.manager(),
        LogBackend::new(guard),
        gate,
        config.finalize_timeout(),
    ))
}

/// Represents the ways [`bootstrap`] can fail.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Logging was already bootstrapped in this process.
    #[error("logging was already bootstrapped")]
    AlreadyBootstrapped,

    /// Another `log` backend is already installed.
    #[error("failed to bridge the `log` facade: {0}")]
    Bridge(#[from] log::SetLoggerError),

    /// Another global `tracing` subscriber is already installed.
    #[error("failed to install the global subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}
