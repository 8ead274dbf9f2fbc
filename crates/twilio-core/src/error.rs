//! Error types for twilio-core.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building core values.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A mandatory credential field was empty.
    #[error("missing credential field: {0}")]
    MissingCredential(&'static str),
}
