use serde::Deserialize;

/// Selects the [event formatter](tracing_subscriber::fmt::format::Format) of
/// the formatted layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFlavor {
    /// The default [`Full`](tracing_subscriber::fmt::format::Full) formatting.
    #[default]
    Full,

    /// The [`Compact`](tracing_subscriber::fmt::format::Compact) formatting.
    Compact,

    /// The multi-line [`Pretty`](tracing_subscriber::fmt::format::Pretty) formatting.
    Pretty,

    /// The [`Json`](tracing_subscriber::fmt::format::Json) formatting.
    #[cfg(feature = "json")]
    Json,
}
