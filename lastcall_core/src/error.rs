use std::error::Error;
use thiserror::Error;

/// The ways a teardown closure may end other than by succeeding.
#[derive(Debug, Error)]
pub enum TeardownError {
    /// The teardown noticed its [`Interrupt`](crate::Interrupt) and stopped
    /// early. This is cooperative cancellation, not a failure.
    #[error("teardown was interrupted")]
    Interrupted,

    /// The teardown failed for any other reason.
    #[error("teardown failed: {0}")]
    Failed(#[source] Box<dyn Error + Send + Sync>),
}

impl TeardownError {
    /// Wraps an arbitrary error into [`TeardownError::Failed`].
    pub fn failed(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Failed(error.into())
    }
}

/// Errors raised when registering with [`ShutdownHooks`](crate::ShutdownHooks).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The hooks have already been started; late registrations would never run.
    #[error("cannot register shutdown hook '{name}': shutdown is already in progress")]
    ShutdownInProgress {
        /// Name of the rejected hook.
        name: String,
    },
}
