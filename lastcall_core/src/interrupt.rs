use crate::TeardownError;
use tokio_util::sync::CancellationToken;

/// A cooperative cancellation flag handed to every shutdown hook.
///
/// Raising an [`Interrupt`] does not stop anything by force: it is a request
/// that the hook is expected to notice (by [checking](Interrupt::check) or
/// [awaiting](Interrupt::raised) it) and honor by wrapping up early. Once
/// raised, an interrupt stays raised.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    token: CancellationToken,
}

impl Interrupt {
    /// Returns a fresh, lowered interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives an interrupt that is raised whenever this one is, but that can
    /// also be raised on its own.
    pub(crate) fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Raises this interrupt. Repeated calls have no additional effect.
    pub fn raise(&self) {
        self.token.cancel();
    }

    /// Reports whether this interrupt has been raised.
    pub fn is_raised(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits asynchronously until this interrupt is raised.
    pub async fn raised(&self) {
        self.token.cancelled().await;
    }

    /// Returns [`TeardownError::Interrupted`] if this interrupt is raised,
    /// which makes it convenient to bail out of a teardown with `?`.
    pub fn check(&self) -> Result<(), TeardownError> {
        if self.is_raised() {
            return Err(TeardownError::Interrupted);
        }

        Ok(())
    }
}
