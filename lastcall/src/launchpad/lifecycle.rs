use crate::AppConfig;
use lastcall_core::{
    HookError, Interrupt, ReleaseGate, ShutdownCoordinator, ShutdownHooks, TeardownError,
};
use std::sync::Arc;

/// The application’s handle on its own lifecycle, handed to the main logic by
/// the [`Launchpad`](crate::Launchpad).
///
/// Cloning is cheap: all clones share the same configuration, hooks, and gate.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    config: Arc<AppConfig>,
    hooks: ShutdownHooks,
    gate: ReleaseGate,
}

impl Lifecycle {
    pub(crate) fn new(config: Arc<AppConfig>, hooks: ShutdownHooks, gate: ReleaseGate) -> Self {
        Self {
            config,
            hooks,
            gate,
        }
    }

    /// Returns the application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the shutdown hooks started by the exit sequence.
    pub fn hooks(&self) -> &ShutdownHooks {
        &self.hooks
    }

    /// Returns the gate that logging finalization waits on.
    pub fn gate(&self) -> &ReleaseGate {
        &self.gate
    }

    /// Registers `teardown` to run on the `<app>-Shutdown` thread during the
    /// exit sequence, while logging is still up. Logging is finalized only
    /// after the teardown ends, however it ends.
    pub fn coordinate<F>(&self, teardown: F) -> Result<ShutdownCoordinator, HookError>
    where
        F: FnOnce(&Interrupt) -> Result<(), TeardownError> + Send + 'static,
    {
        ShutdownCoordinator::new(self.config.name(), &self.hooks, &self.gate, teardown)
    }
}
