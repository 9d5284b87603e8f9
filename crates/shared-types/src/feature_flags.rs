use serde::{Deserialize, Serialize};

/// Feature flags controlling optional behaviour.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Every field defaults to `false` so that a
/// missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Export traces and logs over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Offer the provider's sign-up screen next to sign-in.
    #[serde(default)]
    pub sign_up: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}
