use config::ConfigError;
use lastcall_tracing::BootstrapError;
use thiserror::Error;

/// Represents the ways a [`Launchpad`](crate::Launchpad) can fail to boot an
/// application.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The configuration could not be assembled or deserialized.
    #[error("failed to resolve the application configuration: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be bootstrapped.
    #[error(transparent)]
    Logging(#[from] BootstrapError),

    /// The runtime could not be built, or the file system refused to cooperate.
    #[error("I/O failure during launch: {0}")]
    Io(#[from] std::io::Error),
}
