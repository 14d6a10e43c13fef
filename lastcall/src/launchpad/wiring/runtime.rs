use crate::{AppConfig, LaunchError};
use lastcall_core::{NamedThreadFactory, create_named_thread_factory};
use tokio::runtime::{Builder, Runtime};

/// Defines the **runtime wiring** stage of a Lastcall application.
///
/// Builds the multi-threaded Tokio [`Runtime`] that drives the application’s
/// main logic. Worker threads are named by a [`NamedThreadFactory`] built from
/// the `runtime.thread_name` pattern (`<app>-worker-%d` by default), so that
/// they are recognizable in logs and thread dumps.
pub trait RuntimeWiring {
    /// Runs the runtime wiring stage.
    fn run(&self, config: &AppConfig) -> Result<Runtime, LaunchError> {
        Ok(self.make_builder(config).build()?)
    }

    /// Creates the runtime builder.
    fn make_builder(&self, config: &AppConfig) -> Builder {
        let factory = self.make_thread_factory(config);
        let mut builder = Builder::new_multi_thread();

        builder
            .enable_all()
            .thread_name_fn(move || factory.next_name());

        if let Some(worker_threads) = config.runtime().worker_threads() {
            builder.worker_threads(worker_threads.get());
        }

        builder
    }

    /// Creates the factory that names the runtime’s threads.
    fn make_thread_factory(&self, config: &AppConfig) -> NamedThreadFactory {
        create_named_thread_factory(config.runtime().thread_name(config.name()))
    }
}

/// The default `RuntimeWiring` implementation.
pub(crate) struct DefaultRuntimeWiring;

impl RuntimeWiring for DefaultRuntimeWiring {}
