use crate::{HookError, Interrupt, ShutdownHooks, TeardownError};
use lastcall_sync::ReleaseGate;
use scopeguard::defer;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

/// Suffix appended to the application identifier to name the shutdown hook
/// (and its thread).
pub const SHUTDOWN_HOOK_SUFFIX: &str = "-Shutdown";

/// Runs an application's teardown logic at process termination, and then
/// releases the [`ReleaseGate`] that holds back the logging backend's
/// finalization.
///
/// Constructing a coordinator registers a hook named
/// `<application identifier>-Shutdown` with the given [`ShutdownHooks`]. When
/// the hooks are started, the teardown runs on that hook's thread, exactly
/// once. Whatever happens in the teardown, the gate is released afterwards:
///
/// - returning `Ok(())` completes normally;
/// - returning [`TeardownError::Interrupted`] is cooperative cancellation: it
///   is not treated as a failure, and the hook's [`Interrupt`] is left raised
///   so that whoever supervises the hook can see that cancellation happened;
/// - returning [`TeardownError::Failed`], or panicking, is logged and
///   swallowed.
///
/// ## Example
///
/// ```
/// use lastcall_core::{ShutdownCoordinator, ShutdownHooks, TeardownOutcome};
/// use lastcall_sync::ReleaseGate;
///
/// let hooks = ShutdownHooks::new();
/// let gate = ReleaseGate::new();
///
/// let coordinator = ShutdownCoordinator::new("billing", &hooks, &gate, |interrupt| {
///     interrupt.check()?;
///     // Flush, close, say goodbye…
///     Ok(())
/// })
/// .unwrap();
///
/// assert_eq!(coordinator.hook_name(), "billing-Shutdown");
///
/// // Process termination
/// hooks.start().join();
///
/// assert_eq!(coordinator.outcome(), Some(TeardownOutcome::Completed));
/// assert!(gate.is_released());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    hook_name: Arc<str>,
    outcome: Arc<OnceLock<TeardownOutcome>>,
}

/// How a coordinated teardown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeardownOutcome {
    /// The teardown returned successfully.
    Completed,

    /// The teardown stopped early on cooperative cancellation.
    Interrupted,

    /// The teardown returned an error.
    Failed,

    /// The teardown panicked.
    Panicked,
}

impl ShutdownCoordinator {
    /// Registers `teardown` to run when the given `hooks` are started, under a
    /// hook named `<app_id>-Shutdown`, and to release `gate` afterwards.
    ///
    /// Fails only if the hooks have already been started, in which case the
    /// teardown will never run and the gate is left untouched.
    pub fn new<F>(
        app_id: impl AsRef<str>,
        hooks: &ShutdownHooks,
        gate: &ReleaseGate,
        teardown: F,
    ) -> Result<Self, HookError>
    where
        F: FnOnce(&Interrupt) -> Result<(), TeardownError> + Send + 'static,
    {
        let hook_name: Arc<str> = Arc::from(format!("{}{SHUTDOWN_HOOK_SUFFIX}", app_id.as_ref()));
        let outcome = Arc::new(OnceLock::new());

        let action = {
            let hook_name = hook_name.clone();
            let outcome = outcome.clone();
            let gate = gate.clone();
            move |interrupt: Interrupt| {
                let result = on_terminate(&hook_name, teardown, &interrupt, &gate);
                let _ = outcome.set(result);
            }
        };

        hooks.register(&hook_name, action)?;

        Ok(Self { hook_name, outcome })
    }

    /// Reports the name of the registered hook (and of the thread it runs on).
    pub fn hook_name(&self) -> &str {
        &self.hook_name
    }

    /// Reports how the teardown ended, or [`None`] if it has not run yet.
    pub fn outcome(&self) -> Option<TeardownOutcome> {
        self.outcome.get().copied()
    }
}

/// Runs the teardown and releases the gate on every way out.
fn on_terminate<F>(
    hook_name: &str,
    teardown: F,
    interrupt: &Interrupt,
    gate: &ReleaseGate,
) -> TeardownOutcome
where
    F: FnOnce(&Interrupt) -> Result<(), TeardownError>,
{
    defer! {
        if gate.release() {
            info!(hook = hook_name, "Released the logging gate");
        }
    }

    match catch_unwind(AssertUnwindSafe(|| teardown(interrupt))) {
        Ok(Ok(())) => TeardownOutcome::Completed,
        Ok(Err(TeardownError::Interrupted)) => {
            // Keep the flag raised for whoever supervises this thread
            interrupt.raise();
            info!(hook = hook_name, "Teardown interrupted");
            TeardownOutcome::Interrupted
        }
        Ok(Err(failure)) => {
            error!(hook = hook_name, error = %failure, "Teardown failed");
            TeardownOutcome::Failed
        }
        Err(payload) => {
            error!(
                hook = hook_name,
                alert = true,
                panic = panic_message(payload.as_ref()),
                "Teardown panicked",
            );
            TeardownOutcome::Panicked
        }
    }
}

/// Extracts a printable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct DiskFull;

    impl Display for DiskFull {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("disk full")
        }
    }

    impl std::error::Error for DiskFull {}

    #[test]
    fn completed() {
        // Given
        let gate = ReleaseGate::new();
        let interrupt = Interrupt::new();

        // When
        let outcome = on_terminate("app-Shutdown", |_| Ok(()), &interrupt, &gate);

        // Then
        assert_eq!(outcome, TeardownOutcome::Completed);
        assert!(gate.is_released());
        assert!(!interrupt.is_raised());
    }

    #[test]
    fn interrupted_keeps_flag_raised() {
        // Given
        let gate = ReleaseGate::new();
        let interrupt = Interrupt::new();

        // When
        let outcome = on_terminate(
            "app-Shutdown",
            |_| Err(TeardownError::Interrupted),
            &interrupt,
            &gate,
        );

        // Then
        assert_eq!(outcome, TeardownOutcome::Interrupted);
        assert!(interrupt.is_raised());
        assert!(gate.is_released());
    }

    #[test]
    fn failed_still_releases() {
        // Given
        let gate = ReleaseGate::new();
        let interrupt = Interrupt::new();

        // When
        let outcome = on_terminate(
            "app-Shutdown",
            |_| Err(TeardownError::failed(DiskFull)),
            &interrupt,
            &gate,
        );

        // Then
        assert_eq!(outcome, TeardownOutcome::Failed);
        assert!(gate.is_released());
    }

    #[test]
    fn panicked_still_releases() {
        // Given
        let gate = ReleaseGate::new();
        let interrupt = Interrupt::new();

        // When
        let outcome = on_terminate(
            "app-Shutdown",
            |_| panic!("teardown exploded"),
            &interrupt,
            &gate,
        );

        // Then
        assert_eq!(outcome, TeardownOutcome::Panicked);
        assert!(gate.is_released());
    }

    #[test]
    fn already_released_gate_is_left_alone() {
        // Given
        let gate = ReleaseGate::new();
        gate.release();

        // When
        let outcome = on_terminate("app-Shutdown", |_| Ok(()), &Interrupt::new(), &gate);

        // Then
        assert_eq!(outcome, TeardownOutcome::Completed);
        assert!(gate.is_released());
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic payload");
    }

    #[test]
    fn registration_after_start_fails() {
        // Given
        let hooks = ShutdownHooks::new();
        let gate = ReleaseGate::new();
        hooks.start().join();

        // When
        let result = ShutdownCoordinator::new("late", &hooks, &gate, |_| Ok(()));

        // Then
        assert!(matches!(
            result,
            Err(HookError::ShutdownInProgress { ref name }) if name == "late-Shutdown"
        ));
        assert!(!gate.is_released());
    }
}
