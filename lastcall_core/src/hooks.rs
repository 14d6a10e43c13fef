use self::run::HooksRun;
use crate::{HookError, Interrupt};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

pub mod run;

/// The process's orderly-termination mechanism: a registry of named hooks that
/// are [started](ShutdownHooks::start) together once the process begins to shut
/// down.
///
/// Each hook runs on its own thread, named after the hook. Hooks run
/// concurrently with each other and in no particular order. Every hook runs at
/// most once: starting takes all pending hooks out of the registry, and the
/// registry refuses new hooks from then on.
///
/// A [`ShutdownHooks`] is a cheap handle: clones share the same registry.
///
/// ## Example
///
/// ```
/// use lastcall_core::ShutdownHooks;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let hooks = ShutdownHooks::new();
/// let flushed = Arc::new(AtomicBool::new(false));
///
/// let marker = flushed.clone();
/// hooks
///     .register("cache-Shutdown", move |_interrupt| {
///         marker.store(true, Ordering::SeqCst);
///     })
///     .unwrap();
///
/// // Later, when the process terminates
/// hooks.start().join();
///
/// assert!(flushed.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShutdownHooks {
    inner: Arc<HooksInner>,
}

#[derive(Debug, Default)]
struct HooksInner {
    state: Mutex<HooksState>,
    interrupt: Interrupt,
}

#[derive(Debug, Default)]
struct HooksState {
    pending: Vec<ShutdownHook>,
    started: bool,
}

/// A named unit of work registered with [`ShutdownHooks`].
pub(crate) struct ShutdownHook {
    pub(crate) name: Arc<str>,
    pub(crate) action: Box<dyn FnOnce(Interrupt) + Send>,
}

impl std::fmt::Debug for ShutdownHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ShutdownHooks {
    /// Returns an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook with the given `name` (used as its thread name; needs
    /// not be unique). The `action` receives the hook's [`Interrupt`].
    ///
    /// Fails with [`HookError::ShutdownInProgress`] once the hooks have been
    /// [started](ShutdownHooks::start). There is no way to deregister a hook.
    pub fn register<F>(&self, name: impl AsRef<str>, action: F) -> Result<(), HookError>
    where
        F: FnOnce(Interrupt) + Send + 'static,
    {
        let name = name.as_ref();
        let mut state = self.inner.state.lock();

        if state.started {
            return Err(HookError::ShutdownInProgress {
                name: name.to_string(),
            });
        }

        state.pending.push(ShutdownHook {
            name: Arc::from(name),
            action: Box::new(action),
        });

        Ok(())
    }

    /// Starts every registered hook on its own named thread, and returns a
    /// [`HooksRun`] handle for waiting on them.
    ///
    /// Only the first call finds any hooks: later calls return an empty run.
    pub fn start(&self) -> HooksRun {
        // Take pending hooks and close the registry in one step
        let hooks = {
            let mut state = self.inner.state.lock();
            state.started = true;
            std::mem::take(&mut state.pending)
        };

        if !hooks.is_empty() {
            info!("Starting {} shutdown hook(s)", hooks.len());
        }

        HooksRun::launch(hooks, &self.inner.interrupt)
    }

    /// Raises the [`Interrupt`] of every hook, including hooks that have not
    /// started running yet. Hooks are expected to wrap up cooperatively.
    pub fn interrupt(&self) {
        warn!("Interrupting shutdown hooks");

        self.inner.interrupt.raise();
    }

    /// Reports whether the hooks have been [started](ShutdownHooks::start).
    pub fn is_started(&self) -> bool {
        self.inner.state.lock().started
    }

    /// Reports how many hooks are registered and not yet started.
    pub fn pending(&self) -> usize {
        self.inner.state.lock().pending.len()
    }
}
