use crate::LogManagerChoice;
use lastcall_sync::ReleaseGate;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Tears the logging backend down at process exit.
///
/// Finalizing flushes every buffered line. Nothing can be logged reliably
/// afterwards, so whatever shuts the application down should finish its own
/// logging first: that is what the [waiting](WaitingLogManager) manager
/// enforces.
pub trait LogManager: Send + Sync {
    /// Finalizes the logging backend. Calling this more than once is a no-op.
    fn finalize(&self);

    /// Reports whether the logging backend has been finalized.
    fn is_finalized(&self) -> bool;
}

/// Owns the [`WorkerGuard`] of the buffered log writer. Closing the backend
/// drops the guard, which flushes the buffered lines and stops the writer
/// thread.
#[derive(Debug, Default)]
pub struct LogBackend {
    guard: Mutex<Option<WorkerGuard>>,
    closed: AtomicBool,
}

impl LogBackend {
    /// Wraps the given guard.
    pub fn new(guard: WorkerGuard) -> Self {
        Self {
            guard: Mutex::new(Some(guard)),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a backend with nothing to flush.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Flushes and closes the backend. Returns `true` only for the call that
    /// actually closed it.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }

        let guard = self.guard.lock().take();
        drop(guard);

        true
    }

    /// Reports whether the backend is closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Finalizes the logging backend as soon as asked.
#[derive(Debug)]
pub struct ImmediateLogManager {
    backend: LogBackend,
}

impl ImmediateLogManager {
    /// Wraps the given backend.
    pub fn new(backend: LogBackend) -> Self {
        Self { backend }
    }
}

impl LogManager for ImmediateLogManager {
    fn finalize(&self) {
        if self.backend.is_closed() {
            return;
        }

        debug!("Finalizing logging");
        self.backend.close();
    }

    fn is_finalized(&self) -> bool {
        self.backend.is_closed()
    }
}

/// Finalizes the logging backend only after the [`ReleaseGate`] opens.
///
/// This lets shutdown teardown keep logging while the exit sequence is already
/// under way. The wait is unbounded unless a timeout is given, so a gate that
/// is never released blocks the finalizing thread forever.
#[derive(Debug)]
pub struct WaitingLogManager {
    backend: LogBackend,
    gate: ReleaseGate,
    timeout: Option<Duration>,
}

impl WaitingLogManager {
    /// Waits on the given gate, without a time limit.
    pub fn new(backend: LogBackend, gate: ReleaseGate) -> Self {
        Self {
            backend,
            gate,
            timeout: None,
        }
    }

    /// Bounds the wait on the gate. When the bound elapses, finalization logs a
    /// warning and proceeds.
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }

    /// Exposes the gate this manager waits on.
    pub fn gate(&self) -> &ReleaseGate {
        &self.gate
    }
}

impl LogManager for WaitingLogManager {
    fn finalize(&self) {
        if self.backend.is_closed() {
            return;
        }

        match self.timeout {
            None => self.gate.wait(),
            Some(timeout) => {
                if !self.gate.wait_timeout(timeout) {
                    warn!(
                        alert = true,
                        timeout = %humantime::format_duration(timeout),
                        "Release gate stayed closed; finalizing logging anyway",
                    );
                }
            }
        }

        debug!("Finalizing logging");
        self.backend.close();
    }

    fn is_finalized(&self) -> bool {
        self.backend.is_closed()
    }
}

/// Picks the [`LogManager`] for the given choice.
pub fn make_manager(
    choice: LogManagerChoice,
    backend: LogBackend,
    gate: &ReleaseGate,
    timeout: Option<Duration>,
) -> Box<dyn LogManager> {
    match choice {
        LogManagerChoice::Waiting => {
            Box::new(WaitingLogManager::new(backend, gate.clone()).with_timeout(timeout))
        }
        LogManagerChoice::Immediate => Box::new(ImmediateLogManager::new(backend)),
    }
}
