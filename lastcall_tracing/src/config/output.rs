use serde::Deserialize;

/// The stream the buffered log writer writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    #[serde(alias = "out")]
    Stdout,

    /// Standard error.
    #[serde(alias = "err")]
    Stderr,
}
