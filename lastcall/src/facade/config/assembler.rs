use crate::Pivot;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::io;
use std::path::PathBuf;

/// A small facade for assembling the opinionated version of [`ConfigBuilder`].
pub struct Assembler;

/// A simple preference collection accepted by the [`Assembler`] facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerChoices {
    /// The configuration directory. Relative paths are resolved against the
    /// [pivot directory](Pivot).
    pub dir_name: String,
    /// The base name of the configuration file inside the directory. The
    /// extension (`toml`, `yaml`, `yml`, ...) is detected.
    pub file_name: String,
    /// Whether to add the [`Environment`] source to the [`ConfigBuilder`].
    pub env_enabled: bool,
    /// The prefix of environment variables, e.g. the `APP` of `APP_NAME`.
    pub env_prefix: String,
    /// The separator of nested keys in environment variables, e.g. the `__`
    /// of `APP_TRACING__MANAGER`.
    pub env_separator: String,
}

impl Default for AssemblerChoices {
    fn default() -> Self {
        Self {
            dir_name: "config".to_string(),
            file_name: "app".to_string(),
            env_enabled: true,
            env_prefix: "APP".to_string(),
            env_separator: "__".to_string(),
        }
    }
}

impl Assembler {
    /// Creates the opinionated [`ConfigBuilder`]: an optional configuration
    /// file, overridden by environment variables (if enabled).
    pub fn make_builder(choices: &AssemblerChoices) -> io::Result<ConfigBuilder<DefaultState>> {
        let file_stem = Self::resolve_config_dir(choices)?.join(&choices.file_name);

        let mut builder = ConfigBuilder::<DefaultState>::default()
            .add_source(File::with_name(&file_stem.to_string_lossy()).required(false));

        if choices.env_enabled {
            builder = builder.add_source(
                Environment::with_prefix(&choices.env_prefix)
                    .prefix_separator("_")
                    .separator(&choices.env_separator)
                    .try_parsing(true),
            );
        }

        Ok(builder)
    }

    /// Names the environment variable that overrides the configuration
    /// directory: `APP_CONFIG_DIR` for the default prefix.
    pub fn config_dir_variable(choices: &AssemblerChoices) -> String {
        format!("{}_CONFIG_DIR", choices.env_prefix)
    }

    /// Resolves the configuration directory. The
    /// [override variable](Assembler::config_dir_variable), if set, takes
    /// precedence over `dir_name`.
    fn resolve_config_dir(choices: &AssemblerChoices) -> io::Result<PathBuf> {
        let dir = std::env::var_os(Self::config_dir_variable(choices))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&choices.dir_name));

        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(Pivot::resolve()?.join(dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppConfig;
    use lastcall_tracing::LogManagerChoice;
    use pretty_assertions::assert_eq;
    use scopeguard::defer;

    #[test]
    fn reads_file_and_environment() {
        // Given
        let dir = std::env::temp_dir().join(format!("lastcall-assembler-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("service.toml"),
            "name = \"from-file\"\n[tracing]\nmanager = \"waiting\"\n",
        )
        .unwrap();
        unsafe { std::env::set_var("LASTCALL_TEST_TRACING__MANAGER", "immediate") }
        defer! {
            let _ = std::fs::remove_dir_all(&dir);
            unsafe { std::env::remove_var("LASTCALL_TEST_TRACING__MANAGER") }
        }
        let choices = AssemblerChoices {
            dir_name: dir.to_string_lossy().into_owned(),
            file_name: "service".to_string(),
            env_prefix: "LASTCALL_TEST".to_string(),
            ..AssemblerChoices::default()
        };

        // When
        let config = AppConfig::from_builder(Assembler::make_builder(&choices).unwrap()).unwrap();

        // Then
        assert_eq!(config.name(), "from-file");
        assert_eq!(config.tracing().manager(), LogManagerChoice::Immediate);
    }

    #[test]
    fn config_dir_follows_prefix() {
        // Given
        let dir = std::env::temp_dir().join(format!("lastcall-config-dir-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("app.toml"), "name = \"from-override\"\n").unwrap();
        unsafe { std::env::set_var("LASTCALL_DIR_TEST_CONFIG_DIR", &dir) }
        defer! {
            let _ = std::fs::remove_dir_all(&dir);
            unsafe { std::env::remove_var("LASTCALL_DIR_TEST_CONFIG_DIR") }
        }
        let choices = AssemblerChoices {
            dir_name: "no-such-config-dir".to_string(),
            env_enabled: false,
            env_prefix: "LASTCALL_DIR_TEST".to_string(),
            ..AssemblerChoices::default()
        };

        // When
        let config = AppConfig::from_builder(Assembler::make_builder(&choices).unwrap()).unwrap();

        // Then
        assert_eq!(
            Assembler::config_dir_variable(&AssemblerChoices::default()),
            "APP_CONFIG_DIR",
        );
        assert_eq!(config.name(), "from-override");
    }

    #[test]
    fn missing_file_is_fine() {
        // Given
        let choices = AssemblerChoices {
            dir_name: "no-such-config-dir".to_string(),
            env_enabled: false,
            ..AssemblerChoices::default()
        };

        // When
        let config = AppConfig::from_builder(Assembler::make_builder(&choices).unwrap()).unwrap();

        // Then
        assert_eq!(config.name(), "app");
    }
}
