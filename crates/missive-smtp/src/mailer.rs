//! High-level message sending.

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::transport::{Envelope, SmtpTransport, Transport};
use missive_mime::Message;
use tracing::{debug, warn};

/// Sends [`Message`]s to one SMTP server.
///
/// The mailer turns a message into an envelope and rendered bytes, then hands
/// both to its [`Transport`]. Transport failures are returned unchanged.
#[derive(Debug, Clone)]
pub struct Mailer<T = SmtpTransport> {
    config: Config,
    transport: T,
}

impl Mailer {
    /// Creates a mailer for `host:port` using direct SMTP delivery.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_transport(Config::new(host, port), SmtpTransport)
    }
}

impl<T: Transport> Mailer<T> {
    /// Creates a mailer with an explicit configuration and transport.
    #[must_use]
    pub const fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// Enables `AUTH PLAIN` with the given credentials.
    pub fn set_auth(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.config.credentials = Some(Credentials::new(username, password));
    }

    /// Returns the connection settings.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the connection settings for modification.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a message.
    ///
    /// The envelope sender comes from the `From` header and the envelope
    /// recipients from `To`, `Cc` and `Bcc`. Recipient values that do not
    /// parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Message`] if `From` does not parse, or whatever
    /// the transport reports.
    pub async fn send(&self, message: &Message) -> Result<()> {
        let sender = message.sender()?;

        let report = message.recipient_report();
        if report.dropped > 0 {
            warn!(dropped = report.dropped, "Skipping unparsable recipients");
        }

        let envelope = Envelope {
            from: sender.address(),
            recipients: report.addresses.iter().map(missive_mime::Address::address).collect(),
        };
        let content = message.render();
        debug!(
            from = %envelope.from,
            recipients = envelope.recipients.len(),
            bytes = content.len(),
            "Sending message"
        );

        self.transport.deliver(&self.config, &envelope, &content).await
    }
}
