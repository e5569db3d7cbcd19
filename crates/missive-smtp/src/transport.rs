//! Message transports.
//!
//! A [`Transport`] receives a finished byte buffer plus the envelope and is
//! responsible for getting it to the server. [`SmtpTransport`] speaks SMTP
//! directly; tests and alternative delivery paths can supply their own.

use crate::config::{Config, Security};
use crate::connection::{Session, SmtpStream, connect, connect_tls};
use crate::error::{Error, Result};
use std::future::Future;
use tokio::time::timeout;
use tracing::{debug, info};

/// Envelope addresses for a single delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Envelope sender (`MAIL FROM`), a bare `user@domain`.
    pub from: String,
    /// Envelope recipients (`RCPT TO`), bare `user@domain` values.
    pub recipients: Vec<String>,
}

impl Envelope {
    /// Checks that the envelope can be sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRecipients`] if there are no recipients, or
    /// [`Error::InvalidAddress`] if an address contains CR or LF.
    pub fn validate(&self) -> Result<()> {
        if self.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }
        for address in std::iter::once(&self.from).chain(&self.recipients) {
            if address.contains(['\r', '\n']) {
                return Err(Error::InvalidAddress(address.clone()));
            }
        }
        Ok(())
    }
}

/// Delivers rendered messages.
pub trait Transport {
    /// Delivers `content` to the envelope recipients using `config`.
    ///
    /// Failures are returned unchanged; nothing is retried.
    fn deliver(
        &self,
        config: &Config,
        envelope: &Envelope,
        content: &[u8],
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Direct SMTP delivery over TCP, with STARTTLS or implicit TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransport;

impl Transport for SmtpTransport {
    async fn deliver(&self, config: &Config, envelope: &Envelope, content: &[u8]) -> Result<()> {
        envelope.validate()?;

        info!(server = %config.address(), security = ?config.security, "Connecting to SMTP server");
        let connecting = async {
            match config.security {
                Security::Implicit => connect_tls(&config.host, config.port).await,
                Security::None | Security::Opportunistic | Security::StartTls => {
                    connect(&config.host, config.port).await
                }
            }
        };
        let stream = timeout(config.connect_timeout, connecting)
            .await
            .map_err(|_| Error::Timeout("connect"))??;

        let mut session = Session::open(stream, config.io_timeout).await?;
        session.ehlo(&config.client_hostname).await?;
        let mut session = negotiate_tls(session, config).await?;

        if let Some(credentials) = &config.credentials {
            let offers_plain = session
                .server_info()
                .auth_mechanisms()
                .iter()
                .any(|mechanism| mechanism.eq_ignore_ascii_case("PLAIN"));
            if !offers_plain {
                return Err(Error::NotSupported("AUTH PLAIN".into()));
            }
            if !session.is_tls() && !is_localhost(&config.host) {
                return Err(Error::InsecureAuth);
            }
            session.auth_plain(credentials).await?;
        }

        if let Some(limit) = session.server_info().max_message_size() {
            if content.len() > limit {
                return Err(Error::MessageTooLarge {
                    size: content.len(),
                    limit,
                });
            }
        }

        session.mail_from(&envelope.from).await?;
        for recipient in &envelope.recipients {
            session.rcpt_to(recipient).await?;
        }
        session.data(content).await?;
        session.quit().await?;

        info!(
            server = %config.address(),
            recipients = envelope.recipients.len(),
            bytes = content.len(),
            "Message delivered"
        );
        Ok(())
    }
}

/// Applies the configured STARTTLS policy to a freshly greeted session.
async fn negotiate_tls(session: Session<SmtpStream>, config: &Config) -> Result<Session<SmtpStream>> {
    let offered = session.server_info().supports_starttls();
    let upgrade = match config.security {
        Security::StartTls if !offered => return Err(Error::NotSupported("STARTTLS".into())),
        Security::StartTls => true,
        Security::Opportunistic => offered,
        Security::None | Security::Implicit => false,
    };
    if !upgrade {
        debug!(offered, "Continuing without STARTTLS");
        return Ok(session);
    }

    let mut session = session.starttls(&config.host).await?;
    session.ehlo(&config.client_hostname).await?;
    Ok(session)
}

/// Hosts where credentials may travel unencrypted.
fn is_localhost(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
}
