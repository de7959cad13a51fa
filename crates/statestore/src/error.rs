use thiserror::Error;

/// Errors that can occur when interacting with the state store.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// The store could not be reached. Retryable by the caller.
    #[error("state store '{store}' unavailable: {message}")]
    Unavailable { store: String, message: String },
}

impl StateStoreError {
    /// Creates an unavailable error for the named store.
    pub fn unavailable(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            store: store.into(),
            message: message.into(),
        }
    }
}

/// Result type for state store operations.
pub type Result<T> = std::result::Result<T, StateStoreError>;
