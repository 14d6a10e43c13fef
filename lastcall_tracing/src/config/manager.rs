use serde::Deserialize;

/// Selects how the logging backend is finalized at process exit.
///
/// Read once, during [`bootstrap`](crate::bootstrap()), from the `manager` key of
/// [`TracingConfig`](crate::TracingConfig).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogManagerChoice {
    /// Finalization waits for the release gate: see
    /// [`WaitingLogManager`](crate::WaitingLogManager).
    #[default]
    #[serde(alias = "gated")]
    Waiting,

    /// Finalization happens right away: see
    /// [`ImmediateLogManager`](crate::ImmediateLogManager).
    #[serde(alias = "direct")]
    Immediate,
}
