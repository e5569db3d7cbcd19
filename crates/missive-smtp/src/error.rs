//! Error types for SMTP delivery.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server returned error response.
    #[error("SMTP error {code}: {message}")]
    SmtpError {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Protocol error (unexpected or malformed response).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The message could not be turned into an envelope.
    #[error(transparent)]
    Message(#[from] missive_mime::Error),

    /// Envelope address that cannot be sent on the wire.
    #[error("Invalid envelope address: {0:?}")]
    InvalidAddress(String),

    /// No envelope recipients.
    #[error("No recipients specified")]
    NoRecipients,

    /// Credentials would be sent in clear text to a remote host.
    #[error("Refusing to send credentials over an unencrypted connection")]
    InsecureAuth,

    /// Message too large for the server.
    #[error("Message of {size} bytes exceeds server limit of {limit} bytes")]
    MessageTooLarge {
        /// Rendered message size.
        size: usize,
        /// Limit advertised by the server.
        limit: usize,
    },

    /// Feature not supported by server.
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// Connect or I/O deadline elapsed.
    #[error("Timed out during {0}")]
    Timeout(&'static str),
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp_error(code: u16, message: impl Into<String>) -> Self {
        Self::SmtpError {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 400 && *code < 500)
    }
}
