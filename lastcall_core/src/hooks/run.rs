use crate::hooks::ShutdownHook;
use crate::{Interrupt, NamedThreadFactory};
use lastcall_sync::ReleaseGate;
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};

/// A batch of [shutdown hooks](crate::ShutdownHooks) that has been started.
///
/// The run keeps every hook's [`Interrupt`], so that cancellation stays
/// observable after the hooks return: see [`HooksRun::interrupted`].
///
/// Dropping a [`HooksRun`] does not stop the hooks: their threads are merely
/// detached.
#[derive(Debug)]
pub struct HooksRun {
    threads: Vec<(Arc<str>, JoinHandle<()>)>,
    interrupts: Vec<(Arc<str>, Interrupt)>,
    inline_panics: usize,
    count: usize,
    done: ReleaseGate,
}

type Task = Box<dyn FnOnce() + Send>;

impl HooksRun {
    /// Starts every given hook on a thread named after it.
    pub(crate) fn launch(hooks: Vec<ShutdownHook>, parent: &Interrupt) -> Self {
        let count = hooks.len();
        let done = ReleaseGate::new();
        let remaining = Arc::new(AtomicUsize::new(count));
        let mut threads = Vec::with_capacity(count);
        let mut interrupts = Vec::with_capacity(count);
        let mut inline_panics = 0;

        if count == 0 {
            done.release();
        }

        for hook in hooks {
            let name = hook.name;
            let interrupt = parent.child();
            interrupts.push((name.clone(), interrupt.clone()));
            let completion = Completion {
                remaining: remaining.clone(),
                done: done.clone(),
            };

            let task: Task = {
                let name = name.clone();
                Box::new(move || {
                    let _completion = completion;
                    info!(hook = name.as_ref(), "Running shutdown hook");
                    (hook.action)(interrupt);
                    info!(hook = name.as_ref(), "Shutdown hook finished");
                })
            };

            // The slot lets the task run inline if its thread cannot be spawned
            let slot = Arc::new(Mutex::new(Some(task)));
            let thread_slot = slot.clone();
            let spawned = NamedThreadFactory::fixed(&name).spawn(move || {
                let task = thread_slot.lock().take();
                if let Some(task) = task {
                    task();
                }
            });

            match spawned {
                Ok(handle) => threads.push((name, handle)),
                Err(spawn_error) => {
                    error!(
                        hook = name.as_ref(),
                        error = %spawn_error,
                        "Failed to spawn shutdown hook thread; running it inline",
                    );
                    let task = slot.lock().take();
                    if let Some(task) = task {
                        if !run_inline(&name, task) {
                            inline_panics += 1;
                        }
                    }
                }
            }
        }

        Self {
            threads,
            interrupts,
            inline_panics,
            count,
            done,
        }
    }

    /// Reports how many hooks were started.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Reports whether no hooks were started at all.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reports whether every started hook has finished.
    pub fn is_finished(&self) -> bool {
        self.done.is_released()
    }

    /// Blocks until every started hook has finished.
    pub fn wait(&self) {
        self.done.wait();
    }

    /// Blocks until every started hook has finished or `timeout` elapses.
    /// Returns `true` if all hooks have finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.done.wait_timeout(timeout)
    }

    /// Reports the names of the hooks whose [`Interrupt`] is raised: either
    /// the registry [interrupted](crate::ShutdownHooks::interrupt) them, or
    /// the hook itself stopped on cooperative cancellation.
    pub fn interrupted(&self) -> Vec<&str> {
        self.interrupts
            .iter()
            .filter(|(_, interrupt)| interrupt.is_raised())
            .map(|(name, _)| name.as_ref())
            .collect()
    }

    /// Joins every hook thread, and returns how many hooks finished without
    /// panicking. Interrupted hooks are reported, and count as finished.
    pub fn join(self) -> usize {
        for name in self.interrupted() {
            warn!(hook = name, "Shutdown hook was interrupted");
        }

        let inline = self.count - self.threads.len();
        let mut finished = inline - self.inline_panics;

        for (name, handle) in self.threads {
            match handle.join() {
                Ok(()) => finished += 1,
                Err(_) => error!(hook = name.as_ref(), alert = true, "Shutdown hook panicked"),
            }
        }

        finished
    }
}

/// Runs a hook's task on the current thread. A panic is logged and contained,
/// as it would be on the hook's own thread. Returns `false` if the task
/// panicked.
fn run_inline(name: &str, task: Task) -> bool {
    match catch_unwind(AssertUnwindSafe(task)) {
        Ok(()) => true,
        Err(_) => {
            error!(hook = name, alert = true, "Shutdown hook panicked");
            false
        }
    }
}

/// Counts a hook as finished when dropped, whether the hook returned, panicked,
/// or never ran.
struct Completion {
    remaining: Arc<AtomicUsize>,
    done: ReleaseGate,
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.done.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_panic_is_contained() {
        // Given
        let done = ReleaseGate::new();
        let completion = Completion {
            remaining: Arc::new(AtomicUsize::new(1)),
            done: done.clone(),
        };
        let task: Task = Box::new(move || {
            let _completion = completion;
            panic!("inline hook went wrong");
        });

        // When
        let finished = run_inline("broken", task);

        // Then
        assert!(!finished);
        assert!(done.is_released());
    }

    #[test]
    fn inline_success_is_reported() {
        // Given
        let task: Task = Box::new(|| {});

        // When
        let finished = run_inline("fine", task);

        // Then
        assert!(finished);
    }
}
