use config::builder::DefaultState;
use config::{Config as ProxyConfig, ConfigBuilder, ConfigError};
use lastcall_tracing::TracingConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroUsize;
use std::time::Duration;

pub mod assembler;

/// Represents the application’s externalized configuration.
///
/// The configuration is assembled once, during
/// [configuration wiring](crate::ConfigurationWiring), from optional files in
/// the configuration directory and from `APP_*` environment variables, and is
/// immutable afterwards. Every section is optional.
///
/// ```toml
/// name = "billing"
///
/// [tracing]
/// verbosity = "debug"
/// manager = "waiting"
/// finalize_timeout = "30s"
///
/// [runtime]
/// worker_threads = 4
/// thread_name = "billing-worker-%d"
///
/// [shutdown]
/// hook_grace = "10s"
/// ```
///
/// Custom sections are available through [`AppConfig::section`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    name: String,
    tracing: TracingConfig,
    runtime: RuntimeConfig,
    shutdown: ShutdownConfig,
    #[serde(skip)]
    proxy: ProxyConfig,
}

/// The `runtime` section of the [`AppConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    #[serde(alias = "workers")]
    worker_threads: Option<NonZeroUsize>,
    #[serde(alias = "thread_name_pattern")]
    thread_name: Option<String>,
}

/// The `shutdown` section of the [`AppConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    #[serde(
        alias = "grace",
        deserialize_with = "lastcall_tracing::deserialize_optional_duration"
    )]
    hook_grace: Option<Duration>,
}

impl AppConfig {
    /// Builds the given config builder and deserializes the result.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Self::from_proxy(builder.build()?)
    }

    /// Deserializes the given proxy configuration, keeping it around for
    /// [custom sections](AppConfig::section).
    pub fn from_proxy(proxy: ProxyConfig) -> Result<Self, ConfigError> {
        let config = proxy.clone().try_deserialize::<Self>()?;

        Ok(Self { proxy, ..config })
    }

    /// Deserializes a custom section of the configuration by its `key`.
    ///
    /// If the key is not found in the configuration, `T::default()` is
    /// returned.
    pub fn section<T>(&self, key: impl AsRef<str>) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        self.proxy
            .get(key.as_ref())
            .or_else(|error| match error {
                ConfigError::NotFound(_) => Ok(T::default()),
                _ => Err(error),
            })
    }
}

impl AppConfig {
    /// Returns the name of the application. Defaults to `"app"`.
    ///
    /// The name prefixes the names of the threads the application starts: the
    /// shutdown hook (`<name>-Shutdown`), the log finalizer
    /// (`<name>-LogFinalizer`), and the runtime workers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configuration for logging.
    pub fn tracing(&self) -> &TracingConfig {
        &self.tracing
    }

    /// Returns the configuration for the asynchronous runtime.
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    /// Returns the configuration for the exit sequence.
    pub fn shutdown(&self) -> &ShutdownConfig {
        &self.shutdown
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name().to_string(),
            tracing: TracingConfig::default(),
            runtime: RuntimeConfig::default(),
            shutdown: ShutdownConfig::default(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl AppConfig {
    fn default_name() -> &'static str {
        "app"
    }
}

impl RuntimeConfig {
    /// Returns the number of runtime worker threads, if configured. Otherwise,
    /// the runtime picks one per CPU core. Zero is rejected when the
    /// configuration is read.
    pub fn worker_threads(&self) -> Option<NonZeroUsize> {
        self.worker_threads
    }

    /// Returns the thread name pattern for runtime workers: the configured one,
    /// or `<app_name>-worker-%d`.
    pub fn thread_name(&self, app_name: &str) -> String {
        match self.thread_name.as_deref() {
            Some(pattern) => pattern.to_string(),
            None => format!("{app_name}-worker-{}", lastcall_core::NUMBER_PLACEHOLDER),
        }
    }
}

impl ShutdownConfig {
    /// Returns how long the exit sequence lets shutdown hooks run before
    /// [interrupting](lastcall_core::ShutdownHooks::interrupt) them. [`None`]
    /// means hooks are never interrupted.
    pub fn hook_grace(&self) -> Option<Duration> {
        self.hook_grace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use lastcall_tracing::{LogManagerChoice, Verbosity};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn from_toml(input: &str) -> AppConfig {
        let builder = ProxyConfig::builder().add_source(File::from_str(input, FileFormat::Toml));

        AppConfig::from_builder(builder).unwrap()
    }

    #[test]
    fn from_empty() {
        // When
        let config = from_toml("");

        // Then
        assert_eq!(config.name(), "app");
        assert_eq!(config.tracing(), &TracingConfig::default());
        assert_eq!(config.runtime(), &RuntimeConfig::default());
        assert_eq!(config.shutdown(), &ShutdownConfig::default());
        assert_eq!(config.runtime().thread_name(config.name()), "app-worker-%d");
    }

    #[test]
    fn from_full() {
        // Given
        let input = r#"
name = "billing"

[tracing]
level = "warn"
manager = "immediate"

[runtime]
worker_threads = 3
thread_name = "pool-%d-thread"

[shutdown]
hook_grace = "2s 500ms"
"#;

        // When
        let config = from_toml(input);

        // Then
        assert_eq!(config.name(), "billing");
        assert_eq!(config.tracing().verbosity(), Verbosity::Warn);
        assert_eq!(config.tracing().manager(), LogManagerChoice::Immediate);
        assert_eq!(config.runtime().worker_threads(), NonZeroUsize::new(3));
        assert_eq!(config.runtime().thread_name(config.name()), "pool-%d-thread");
        assert_eq!(
            config.shutdown().hook_grace(),
            Some(Duration::from_millis(2500)),
        );
    }

    #[test]
    fn custom_section() {
        // Given
        let config = from_toml(
            r#"
[features]
alpha = 1
beta = 2
"#,
        );

        // When
        let present = config.section::<BTreeMap<String, u32>>("features").unwrap();
        let missing = config.section::<BTreeMap<String, u32>>("absent").unwrap();

        // Then
        assert_eq!(present, BTreeMap::from([("alpha".into(), 1), ("beta".into(), 2)]));
        assert!(missing.is_empty());
    }

    #[test]
    fn rejects_zero_worker_threads() {
        // Given
        let builder = ProxyConfig::builder()
            .add_source(File::from_str("[runtime]\nworker_threads = 0", FileFormat::Toml));

        // When
        let result = AppConfig::from_builder(builder);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_grace() {
        // Given
        let builder = ProxyConfig::builder()
            .add_source(File::from_str("[shutdown]\nhook_grace = \"later\"", FileFormat::Toml));

        // When
        let result = AppConfig::from_builder(builder);

        // Then
        assert!(result.is_err());
    }
}
