//! Error types for the merchant portal.
//!
//! Field-level validation failures are not errors — they become page data
//! and are re-rendered next to the offending field. Everything here
//! propagates to the central error handler instead.

/// Top-level error type for the portal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Outbound API call errors. Every variant carries the service tag, the
/// human-readable call description, and the correlation id so a failed
/// call can be traced end to end.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Calling {service} failed: {reason} ({description}, correlation id {correlation_id})")]
    Transport {
        service: &'static str,
        description: &'static str,
        correlation_id: String,
        reason: String,
    },

    #[error(
        "{service} responded with status {status} ({description}, correlation id {correlation_id})"
    )]
    UnexpectedStatus {
        service: &'static str,
        description: &'static str,
        correlation_id: String,
        status: u16,
    },

    #[error(
        "Failed to decode {service} response: {reason} ({description}, correlation id {correlation_id})"
    )]
    MalformedBody {
        service: &'static str,
        description: &'static str,
        correlation_id: String,
        reason: String,
    },

    #[error("Invalid {model} payload: {reason}")]
    InvalidPayload {
        model: &'static str,
        reason: String,
    },
}

impl ClientError {
    /// The correlation id of the failed call, if the error carries one.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Transport { correlation_id, .. }
            | Self::UnexpectedStatus { correlation_id, .. }
            | Self::MalformedBody { correlation_id, .. } => Some(correlation_id),
            Self::InvalidPayload { .. } => None,
        }
    }
}

/// Onboarding setup-progress errors.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Stripe setup progress is not available on request")]
    ProgressNotAvailable,

    #[error("{task} details have already been provided")]
    AlreadyProvided { task: &'static str },
}

/// Result type alias for the portal.
pub type Result<T> = std::result::Result<T, Error>;
