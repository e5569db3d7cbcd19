//! Error types for message composition.

/// Result type alias for message operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message composition errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Text does not contain a usable `user@domain` mailbox.
    #[error("Invalid email address: {0:?}")]
    InvalidAddress(String),
}

impl Error {
    pub(crate) fn invalid_address(text: impl Into<String>) -> Self {
        Self::InvalidAddress(text.into())
    }
}
