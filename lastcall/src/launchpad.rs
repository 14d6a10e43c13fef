use crate::launchpad::exit::ExitSequence;
use crate::launchpad::wiring::configuration::DefaultConfigurationWiring;
use crate::launchpad::wiring::logging::DefaultLoggingWiring;
use crate::launchpad::wiring::preflight::DefaultPreflightWiring;
use crate::launchpad::wiring::runtime::DefaultRuntimeWiring;
use crate::{
    AssemblerChoices, ConfigurationWiring, LaunchError, Lifecycle, LoggingWiring,
    PreflightWiring, RuntimeWiring,
};
use lastcall_core::{AppContext, ReleaseGate, ShutdownHooks, TerminationCause};
use std::sync::Arc;
use tokio::select;

pub mod exit;
pub mod lifecycle;

pub mod wiring {
    pub mod configuration;
    pub mod logging;
    pub mod preflight;
    pub mod runtime;
}

/// Configures and launches a Lastcall application.
///
/// The `Launchpad` uses a builder pattern to customize the application's startup
/// process before running its main asynchronous logic. The startup process is
/// divided into distinct **wiring stages**, each with a specific responsibility.
///
/// ## Wiring stages
///
/// 1.  **Configuration wiring:** Gathers all external inputs (`.env` files,
///     configuration files, environment variables) to assemble the immutable
///     [`AppConfig`].
///
/// 2.  **Logging wiring:** Installs process-wide logging and picks the
///     [`LogManager`] that finalizes it, handing it the release gate.
///
/// 3.  **Runtime wiring:** Constructs the Tokio [`Runtime`] with named worker
///     threads.
///
/// 4.  **Preflight wiring:** Performs final setup tasks before the main logic
///     begins.
///
/// ## Exit sequence
///
/// The main logic runs until it completes or the [`AppContext`] is terminated
/// (e.g. by a shutdown signal). Then the launchpad:
///
/// 1. starts the shutdown hooks, each on its own named thread;
/// 2. finalizes logging on the `<app>-LogFinalizer` thread, which by default
///    waits for the release gate;
/// 3. [interrupts](lastcall_core::ShutdownHooks::interrupt) the hooks if they
///    overrun `shutdown.hook_grace`;
/// 4. joins the hooks, releases the gate if no coordinator did, and joins the
///    finalizer.
///
/// [`AppConfig`]: crate::AppConfig
/// [`LogManager`]: lastcall_tracing::LogManager
/// [`Runtime`]: tokio::runtime::Runtime
pub struct Launchpad<Main> {
    /// The application’s main asynchronous logic.
    main: Main,

    /// Customizable choices for assembling configuration.
    configuration_choices: AssemblerChoices,

    /// The **configuration** wiring.
    configuration_wiring: Box<dyn ConfigurationWiring>,

    /// The **logging** wiring.
    logging_wiring: Box<dyn LoggingWiring>,

    /// The **runtime** wiring.
    runtime_wiring: Box<dyn RuntimeWiring>,

    /// The **preflight** wiring.
    preflight_wiring: Box<dyn PreflightWiring>,
}

impl<Main, MainFuture> Launchpad<Main>
where
    Main: FnOnce(Lifecycle) -> MainFuture,
    MainFuture: Future<Output = ()>,
{
    /// Creates a new `Launchpad` with default wiring.
    ///
    /// The `main` function receives the application’s [`Lifecycle`] and
    /// returns the future that defines the application's main logic.
    pub fn new(main: Main) -> Self {
        Self {
            main,
            configuration_choices: AssemblerChoices::default(),
            configuration_wiring: Box::new(DefaultConfigurationWiring),
            logging_wiring: Box::new(DefaultLoggingWiring),
            runtime_wiring: Box::new(DefaultRuntimeWiring),
            preflight_wiring: Box::new(DefaultPreflightWiring),
        }
    }

    /// Specifies a custom name for the configuration directory.
    ///
    /// Defaults to `"config"`.
    pub fn with_config_dir(self, name: impl Into<String>) -> Self {
        Self {
            configuration_choices: AssemblerChoices {
                dir_name: name.into(),
                ..self.configuration_choices
            },
            ..self
        }
    }

    /// Specifies a custom base name for the configuration file.
    ///
    /// Defaults to `"app"`.
    pub fn with_config_file(self, name: impl Into<String>) -> Self {
        Self {
            configuration_choices: AssemblerChoices {
                file_name: name.into(),
                ..self.configuration_choices
            },
            ..self
        }
    }

    /// Enables or disables configuration overrides from environment variables.
    ///
    /// Defaults to `true`.
    pub fn with_env(self, enabled: bool) -> Self {
        Self {
            configuration_choices: AssemblerChoices {
                env_enabled: enabled,
                ..self.configuration_choices
            },
            ..self
        }
    }

    /// Specifies the prefix for environment variables used as overrides.
    ///
    /// For example, with the default prefix `"APP"`, an environment variable
    /// `APP_NAME` would override the `name` key in your configuration files.
    ///
    /// Defaults to `"APP"`.
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            configuration_choices: AssemblerChoices {
                env_prefix: prefix.into(),
                ..self.configuration_choices
            },
            ..self
        }
    }

    /// Specifies the separator of nested keys in environment variable names.
    ///
    /// Defaults to `"__"`: `APP_TRACING__MANAGER` overrides `tracing.manager`.
    pub fn with_env_separator(self, separator: impl Into<String>) -> Self {
        Self {
            configuration_choices: AssemblerChoices {
                env_separator: separator.into(),
                ..self.configuration_choices
            },
            ..self
        }
    }

    /// Replaces the default **configuration** wiring with a custom implementation.
    pub fn with_configuration_wiring<W>(self, configuration_wiring: W) -> Self
    where
        W: ConfigurationWiring + 'static,
    {
        let configuration_wiring = Box::new(configuration_wiring);

        Self {
            configuration_wiring,
            ..self
        }
    }

    /// Replaces the default **logging** wiring with a custom implementation.
    pub fn with_logging_wiring<W>(self, logging_wiring: W) -> Self
    where
        W: LoggingWiring + 'static,
    {
        let logging_wiring = Box::new(logging_wiring);

        Self {
            logging_wiring,
            ..self
        }
    }

    /// Replaces the default **runtime** wiring with a custom implementation.
    pub fn with_runtime_wiring<W>(self, runtime_wiring: W) -> Self
    where
        W: RuntimeWiring + 'static,
    {
        let runtime_wiring = Box::new(runtime_wiring);

        Self {
            runtime_wiring,
            ..self
        }
    }

    /// Replaces the default **preflight** wiring with a custom implementation.
    pub fn with_preflight_wiring<W>(self, preflight_wiring: W) -> Self
    where
        W: PreflightWiring + 'static,
    {
        let preflight_wiring = Box::new(preflight_wiring);

        Self {
            preflight_wiring,
            ..self
        }
    }

    /// Executes the wiring stages, runs the application, and then runs the
    /// exit sequence.
    ///
    /// Fails only during startup: once the main logic has started, every
    /// failure is logged instead.
    pub fn boot(self) -> Result<(), LaunchError> {
        let config = Arc::new(self.configuration_wiring.run(&self.configuration_choices)?);

        let gate = ReleaseGate::new();
        let log_manager = self.logging_wiring.run(&config, &gate)?;

        let runtime = self.runtime_wiring.run(&config)?;
        self.preflight_wiring.run(&config, &runtime);

        let hooks = ShutdownHooks::new();
        let lifecycle = Lifecycle::new(Arc::clone(&config), hooks.clone(), gate.clone());

        runtime.block_on(Self::run_main(self.main, lifecycle));

        ExitSequence::new(config, hooks, gate, log_manager).run();

        Ok(())
    }

    /// Runs the main logic while keeping an eye on the [`AppContext`], then
    /// makes sure the context ends up terminated.
    async fn run_main(main: Main, lifecycle: Lifecycle) {
        AppContext::auto_terminate().await;

        select! {
            biased;
            _ = AppContext::terminated() => {},
            _ = main(lifecycle) => {},
        }

        AppContext::terminate(TerminationCause::Completed);
    }
}
