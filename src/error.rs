//! Error types for Daybrief.
//!
//! The taxonomy mirrors the failure policy of the workflow: configuration
//! and initialization errors propagate (the one fatal class), gateway and
//! collaborator errors are caught at the agent boundary and degraded, and
//! workflow-stage errors are caught once at the orchestrator level.

/// Top-level error type for the system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Text-generation gateway errors.
///
/// These never cross the `Gateway` boundary — the gateway logs them and
/// returns an empty result instead.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// External-collaborator errors (mail, calendar, documents, chat).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Access token expired or invalid")]
    AuthExpired,
}

/// Workflow-orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Workflow cannot run from state {state:?}")]
    InvalidState {
        state: crate::workflow::WorkflowState,
    },

    #[error("Stage '{stage}' failed: {reason}")]
    Stage {
        stage: &'static str,
        reason: String,
    },
}

/// Result type alias for the system.
pub type Result<T> = std::result::Result<T, Error>;
