use crate::AppConfig;
use lastcall_core::{ReleaseGate, ShutdownHooks, create_named_single_thread_factory};
use lastcall_tracing::LogManager;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suffix of the name of the thread that finalizes logging.
pub const LOG_FINALIZER_SUFFIX: &str = "-LogFinalizer";

/// The orderly exit of a booted application.
pub(crate) struct ExitSequence {
    config: Arc<AppConfig>,
    hooks: ShutdownHooks,
    gate: ReleaseGate,
    log_manager: Arc<dyn LogManager>,
}

impl ExitSequence {
    pub(crate) fn new(
        config: Arc<AppConfig>,
        hooks: ShutdownHooks,
        gate: ReleaseGate,
        log_manager: Box<dyn LogManager>,
    ) -> Self {
        Self {
            config,
            hooks,
            gate,
            log_manager: Arc::from(log_manager),
        }
    }

    /// Runs the hooks and finalizes logging concurrently. Logging outlives
    /// every hook as long as the log manager waits on the gate.
    pub(crate) fn run(self) {
        let run = self.hooks.start();

        let finalizer_name = format!("{}{LOG_FINALIZER_SUFFIX}", self.config.name());
        let finalizer = {
            let log_manager = Arc::clone(&self.log_manager);
            create_named_single_thread_factory(&finalizer_name).spawn(move || log_manager.finalize())
        };
        let finalizer = match finalizer {
            Ok(handle) => Some(handle),
            Err(error) => {
                warn!(%error, "Cannot spawn {}; finalizing logging last", finalizer_name);
                None
            }
        };

        if let Some(grace) = self.config.shutdown().hook_grace() {
            if !run.wait_timeout(grace) {
                warn!(
                    grace = %humantime::format_duration(grace),
                    "Shutdown hooks overran their grace period",
                );
                self.hooks.interrupt();
            }
        }

        let completed = run.join();
        info!(completed, "Exiting {}", self.config.name());

        // Every coordinator has released by now; release for the case of none
        if !self.gate.is_released() {
            debug!("No shutdown coordinator released the gate");
            self.gate.release();
        }

        match finalizer {
            Some(handle) => {
                // Logging is finalized or finalizing: nowhere to report a panic
                let _ = handle.join();
            }
            None => self.log_manager.finalize(),
        }
    }
}
