use thiserror::Error;

/// Errors raised by the Vault logical API client.
///
/// SECURITY: Error messages must NEVER contain the Vault token.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Token rejected or lacking policy for the path
    #[error("permission denied ({status}): {message}")]
    Auth { status: u16, message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not a Vault secret envelope
    #[error("invalid response from '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}
