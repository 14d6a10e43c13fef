use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// A one-shot barrier that stays closed until it is [released](ReleaseGate::release),
/// and stays open forever after that.
///
/// A [`ReleaseGate`] is a cheap handle: clones share the same state. Any number
/// of threads may [block](ReleaseGate::wait) on it, any number of asynchronous
/// tasks may [await](ReleaseGate::opened) it, and any number of callers may
/// release it. Only the first release has an effect.
///
/// ## Liveness
///
/// [`wait`](ReleaseGate::wait) has no timeout. If nobody ever releases the
/// gate, every thread blocked on it stays blocked for the rest of the process.
/// Use [`wait_timeout`](ReleaseGate::wait_timeout) where that is unacceptable.
///
/// ## Example
///
/// ```
/// use lastcall_sync::ReleaseGate;
/// use std::thread;
///
/// let gate = ReleaseGate::new();
///
/// let waiter = {
///     let gate = gate.clone();
///     thread::spawn(move || {
///         // Blocks until released
///         gate.wait();
///         "done"
///     })
/// };
///
/// // The first release performs the transition
/// assert!(gate.release());
///
/// // Any further release is absorbed
/// assert!(!gate.release());
///
/// assert_eq!(waiter.join().unwrap(), "done");
/// ```
///
/// ## Asynchronous example
///
/// ```
/// use lastcall_sync::ReleaseGate;
///
/// # tokio_test::block_on(async {
/// let gate = ReleaseGate::new();
/// let opened = gate.clone();
///
/// gate.release();
///
/// // Resolves immediately, since the gate is already released
/// opened.opened().await;
/// # })
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReleaseGate {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<GateState>,
    released: Condvar,
    token: CancellationToken,
}

/// The two states a [`ReleaseGate`] can be in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GateState {
    /// Not yet released: waiters block.
    #[default]
    Waiting,

    /// Released: waiters return immediately. Final.
    Released,
}

impl ReleaseGate {
    /// Returns a brand new gate in the [`Waiting`](GateState::Waiting) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Permanently releases this gate, waking every blocked thread and every
    /// waiting task.
    ///
    /// Returns `true` if this call performed the transition, and `false` if
    /// the gate had already been released (in which case nothing happens).
    pub fn release(&self) -> bool {
        {
            let mut state = self.inner.state.lock();

            if *state == GateState::Released {
                return false;
            }

            *state = GateState::Released;
        }

        self.inner.released.notify_all();
        self.inner.token.cancel();

        true
    }

    /// Blocks the current thread until this gate is released. Returns
    /// immediately if it already is.
    pub fn wait(&self) {
        let mut state = self.inner.state.lock();

        while *state == GateState::Waiting {
            self.inner.released.wait(&mut state);
        }
    }

    /// Blocks the current thread until this gate is released, or until the
    /// given `timeout` elapses, whichever comes first.
    ///
    /// Returns `true` if the gate is released. A `timeout` too large to
    /// express as a deadline, such as [`Duration::MAX`], waits without a limit.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut state = self.inner.state.lock();

        while *state == GateState::Waiting {
            if self
                .inner
                .released
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
        }

        *state == GateState::Released
    }

    /// Waits asynchronously until this gate is released. Resolves immediately
    /// if it already is.
    pub async fn opened(&self) {
        self.inner.token.cancelled().await;
    }

    /// Reports the current [state](GateState) of this gate.
    pub fn state(&self) -> GateState {
        *self.inner.state.lock()
    }

    /// Reports whether this gate has been released.
    pub fn is_released(&self) -> bool {
        self.state() == GateState::Released
    }
}
