#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(test, deny(warnings))]

/// Process-wide termination context.
mod context;
pub use self::context::{AppContext, TerminationCause};

/// Teardown and registration errors.
mod error;
pub use self::error::{HookError, TeardownError};

/// Cooperative cancellation of shutdown hooks.
mod interrupt;
pub use self::interrupt::Interrupt;

/// Shutdown hook registry.
mod hooks;
pub use self::hooks::ShutdownHooks;
pub use self::hooks::run::HooksRun;

/// Shutdown coordinator.
mod coordinator;
pub use self::coordinator::{SHUTDOWN_HOOK_SUFFIX, ShutdownCoordinator, TeardownOutcome};

/// Named thread factories.
mod thread;
pub use self::thread::{
    NUMBER_PLACEHOLDER, NamedThreadFactory, ThreadNameSpec, UnstartedThread,
    create_named_single_thread_factory, create_named_thread_factory,
};

/// Re-exports the gate for convenience.
pub use lastcall_sync::{GateState, ReleaseGate};
