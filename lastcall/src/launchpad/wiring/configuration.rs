use crate::{AppConfig, Assembler, AssemblerChoices, DotEnv, LaunchError};
use config::ConfigBuilder;
use config::builder::DefaultState;

/// Defines the **configuration wiring** stage of a Lastcall application.
///
/// This trait is responsible for the first phase of startup: preparing the
/// environment and assembling the immutable [`AppConfig`].
///
/// ## Customization example
///
/// ```
/// use lastcall::{App, ConfigurationWiring};
///
/// fn main() -> Result<(), lastcall::LaunchError> {
///     App::launchpad(|lifecycle: lastcall::Lifecycle| async move {
///         assert_eq!(lifecycle.config().name(), "custom-name");
///     })
///     .with_configuration_wiring(CustomConfigurationWiring)
///     .boot()
/// }
///
/// struct CustomConfigurationWiring;
///
/// impl ConfigurationWiring for CustomConfigurationWiring {
///     fn prepare_environment(&self) {
///         // Set an environment variable manually
///         unsafe { std::env::set_var("APP_NAME", "custom-name") }
///     }
/// }
/// ```
pub trait ConfigurationWiring {
    /// Runs the configuration wiring stage. It is not typically necessary to
    /// override this method directly.
    fn run(&self, choices: &AssemblerChoices) -> Result<AppConfig, LaunchError> {
        self.prepare_environment();

        let builder = self.make_config_builder(choices)?;

        self.build_config(builder)
    }

    /// Prepares the process environment before configuration loading.
    ///
    /// The default implementation calls [`DotEnv::tap`].
    fn prepare_environment(&self) {
        DotEnv::tap();
    }

    /// Creates the `ConfigBuilder` used to source configuration.
    fn make_config_builder(
        &self,
        choices: &AssemblerChoices,
    ) -> Result<ConfigBuilder<DefaultState>, LaunchError> {
        Ok(Assembler::make_builder(choices)?)
    }

    /// Builds the `ConfigBuilder` into the [`AppConfig`].
    fn build_config(&self, builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, LaunchError> {
        Ok(AppConfig::from_builder(builder)?)
    }
}

/// The default `ConfigurationWiring` implementation.
pub(crate) struct DefaultConfigurationWiring;

impl ConfigurationWiring for DefaultConfigurationWiring {}
