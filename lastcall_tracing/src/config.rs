use crate::{FormatFlavor, LogManagerChoice, LogOutput, Verbosity};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::time::Duration;

pub mod flavor;
pub mod manager;
pub mod output;
pub mod verbosity;

/// The logging section of the application configuration.
///
/// Covers the [formatted layer](tracing_subscriber::fmt::Layer) (what each
/// line shows and at which verbosity), the buffered writer behind it, and the
/// way logging is finalized at exit.
///
/// Every key is optional. Thread names are shown by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    #[serde(alias = "level")]
    verbosity: Verbosity,
    #[serde(alias = "flavour")]
    flavor: FormatFlavor,
    #[serde(alias = "colour", alias = "show_color", alias = "show_colour")]
    color: bool,
    #[serde(alias = "with_timestamp")]
    show_timestamp: bool,
    #[serde(alias = "with_target")]
    show_target: bool,
    #[serde(alias = "with_file")]
    show_file: bool,
    #[serde(alias = "show_line", alias = "with_line_number")]
    show_line_number: bool,
    #[serde(alias = "with_level")]
    show_level: bool,
    #[serde(alias = "with_thread_id")]
    show_thread_id: bool,
    #[serde(alias = "with_thread_name")]
    show_thread_name: bool,
    #[cfg(feature = "json")]
    #[serde(alias = "flat_json")]
    flatten_json: bool,
    #[serde(alias = "target_verbosity")]
    targets: BTreeMap<String, Verbosity>,
    #[serde(alias = "writer")]
    output: LogOutput,
    #[serde(alias = "buffer_lines")]
    buffered_lines: usize,
    lossy: bool,
    #[serde(alias = "log_manager")]
    manager: LogManagerChoice,
    #[serde(deserialize_with = "deserialize_optional_duration")]
    finalize_timeout: Option<Duration>,
}

impl TracingConfig {
    /// Merges an extra per-target [`Verbosity`] level into this config.
    pub fn with_target(
        mut self,
        target: impl Into<String>,
        verbosity: impl Into<Verbosity>,
    ) -> Self {
        self.targets.insert(target.into(), verbosity.into());

        self
    }

    /// Replaces the root [`Verbosity`] level of this config.
    pub fn with_verbosity(self, verbosity: Verbosity) -> Self {
        Self { verbosity, ..self }
    }

    /// Replaces the [log manager choice](LogManagerChoice) of this config.
    pub fn with_manager(self, manager: LogManagerChoice) -> Self {
        Self { manager, ..self }
    }

    /// Replaces the finalization timeout of this config.
    pub fn with_finalize_timeout(self, finalize_timeout: Option<Duration>) -> Self {
        Self {
            finalize_timeout,
            ..self
        }
    }
}

impl TracingConfig {
    /// Reports the root [verbosity level](Verbosity).
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Reports the [formatting flavor](FormatFlavor).
    pub fn flavor(&self) -> FormatFlavor {
        self.flavor
    }

    /// Reports whether the output is
    /// [colored](tracing_subscriber::fmt::Layer::with_ansi).
    pub fn color(&self) -> bool {
        self.color
    }

    /// Reports whether the timestamp is shown.
    pub fn show_timestamp(&self) -> bool {
        self.show_timestamp
    }

    /// Reports whether the [target](tracing_subscriber::fmt::Layer::with_target)
    /// is shown.
    pub fn show_target(&self) -> bool {
        self.show_target
    }

    /// Reports whether the source file is shown.
    pub fn show_file(&self) -> bool {
        self.show_file
    }

    /// Reports whether the source line number is shown.
    pub fn show_line_number(&self) -> bool {
        self.show_line_number
    }

    /// Reports whether the level is shown.
    pub fn show_level(&self) -> bool {
        self.show_level
    }

    /// Reports whether the thread ID is shown.
    pub fn show_thread_id(&self) -> bool {
        self.show_thread_id
    }

    /// Reports whether the thread name is shown.
    pub fn show_thread_name(&self) -> bool {
        self.show_thread_name
    }

    /// Reports whether JSON output is flattened.
    #[cfg(feature = "json")]
    pub fn flatten_json(&self) -> bool {
        self.flatten_json
    }

    /// Reports the per-target verbosity overrides.
    pub fn targets(&self) -> &BTreeMap<String, Verbosity> {
        &self.targets
    }

    /// Reports the [stream](LogOutput) the buffered writer writes to.
    pub fn output(&self) -> LogOutput {
        self.output
    }

    /// Reports how many lines the buffered writer holds before it blocks (or
    /// drops lines, if [lossy](TracingConfig::lossy)).
    pub fn buffered_lines(&self) -> usize {
        self.buffered_lines
    }

    /// Reports whether the buffered writer drops lines when full instead of
    /// blocking the logging thread.
    pub fn lossy(&self) -> bool {
        self.lossy
    }

    /// Reports which [log manager](LogManagerChoice) finalizes logging.
    pub fn manager(&self) -> LogManagerChoice {
        self.manager
    }

    /// Reports how long a [waiting](LogManagerChoice::Waiting) finalization
    /// waits for the release gate. [`None`] means forever.
    pub fn finalize_timeout(&self) -> Option<Duration> {
        self.finalize_timeout
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            flavor: FormatFlavor::default(),
            color: true,
            show_timestamp: true,
            show_target: true,
            show_file: false,
            show_line_number: false,
            show_level: true,
            show_thread_id: false,
            show_thread_name: true,
            #[cfg(feature = "json")]
            flatten_json: true,
            targets: BTreeMap::default(),
            output: LogOutput::default(),
            buffered_lines: Self::DEFAULT_BUFFERED_LINES,
            lossy: false,
            manager: LogManagerChoice::default(),
            finalize_timeout: None,
        }
    }
}

impl TracingConfig {
    const DEFAULT_BUFFERED_LINES: usize = 128_000;
}

impl AsRef<TracingConfig> for TracingConfig {
    fn as_ref(&self) -> &TracingConfig {
        self
    }
}

/// Parses an optional human-friendly duration, such as `"5s"` or `"1m 30s"`.
///
/// Meant for `#[serde(deserialize_with = "...")]` on `Option<Duration>` fields
/// of configuration sections.
pub fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| humantime::parse_duration(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use crate::{FormatFlavor, LogManagerChoice, LogOutput, TracingConfig, Verbosity};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn from_empty() {
        // Given
        let input = "{}";
        let expected_output = TracingConfig::default();

        // When
        let actual_output = serde_yml::from_str::<TracingConfig>(input).unwrap();

        // Then
        assert_eq!(expected_output, actual_output);
    }

    #[test]
    fn from_map_sparse() {
        // Given
        let input = r#"
level: off
manager: immediate
"#;
        let expected_output = TracingConfig {
            verbosity: Verbosity::Off,
            manager: LogManagerChoice::Immediate,
            ..TracingConfig::default()
        };

        // When
        let actual_output = serde_yml::from_str::<TracingConfig>(input).unwrap();

        // Then
        assert_eq!(expected_output, actual_output);
    }

    #[test]
    fn from_map_full() {
        // Given
        let input = r#"
verbosity: warn
flavor: pretty
show_color: false
show_timestamp: false
show_target: false
show_file: true
show_line_number: true
show_level: false
show_thread_id: true
show_thread_name: false
targets:
    crate_a: off
    crate_b::module: error
output: stderr
buffered_lines: 64
lossy: true
manager: waiting
finalize_timeout: 1m 30s
"#;
        let expected_output = TracingConfig {
            verbosity: Verbosity::Warn,
            flavor: FormatFlavor::Pretty,
            color: false,
            show_timestamp: false,
            show_target: false,
            show_file: true,
            show_line_number: true,
            show_level: false,
            show_thread_id: true,
            show_thread_name: false,
            #[cfg(feature = "json")]
            flatten_json: true,
            targets: BTreeMap::from([
                ("crate_a".to_string(), Verbosity::Off),
                ("crate_b::module".to_string(), Verbosity::Error),
            ]),
            output: LogOutput::Stderr,
            buffered_lines: 64,
            lossy: true,
            manager: LogManagerChoice::Waiting,
            finalize_timeout: Some(Duration::from_secs(90)),
        };

        // When
        let actual_output = serde_yml::from_str::<TracingConfig>(input).unwrap();

        // Then
        assert_eq!(expected_output, actual_output);
    }

    #[test]
    fn rejects_malformed_timeout() {
        // Given
        let input = "finalize_timeout: soon";

        // When
        let result = serde_yml::from_str::<TracingConfig>(input);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn builders() {
        // When
        let config = TracingConfig::default()
            .with_verbosity(Verbosity::Debug)
            .with_target("noisy", Verbosity::Error)
            .with_manager(LogManagerChoice::Immediate)
            .with_finalize_timeout(Some(Duration::from_secs(2)));

        // Then
        assert_eq!(config.verbosity(), Verbosity::Debug);
        assert_eq!(config.targets().get("noisy"), Some(&Verbosity::Error));
        assert_eq!(config.manager(), LogManagerChoice::Immediate);
        assert_eq!(config.finalize_timeout(), Some(Duration::from_secs(2)));
    }
}
