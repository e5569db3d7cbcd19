//! A single SMTP session over any byte stream.

use super::{ServerInfo, SmtpStream};
use crate::command::{Command, encode_data};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::reply::{Reply, ReplyCode, is_last_reply_line, parse_reply};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, trace};

/// Maximum reply line length accepted from the server.
const MAX_LINE_LENGTH: usize = 4096;

/// SMTP client session.
///
/// Every read and write is bounded by the session's I/O timeout.
#[derive(Debug)]
pub struct Session<S> {
    reader: BufReader<S>,
    server_info: ServerInfo,
    io_timeout: Duration,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server is not ready.
    pub async fn open(stream: S, io_timeout: Duration) -> Result<Self> {
        let mut session = Self {
            reader: BufReader::new(stream),
            server_info: ServerInfo::default(),
            io_timeout,
        };

        let greeting = session
            .read_reply()
            .await?
            .expect_code(ReplyCode::SERVICE_READY)?;
        session.server_info.greeting = greeting.text();
        debug!(greeting = %session.server_info.greeting, "SMTP server ready");

        Ok(session)
    }

    /// Returns what the server has announced so far.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Sends EHLO and records the advertised extensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the EHLO command fails.
    pub async fn ehlo(&mut self, client_hostname: &str) -> Result<()> {
        let reply = self
            .command(&Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?
            .expect_success()?;
        self.server_info.set_extensions(&reply);
        Ok(())
    }

    /// Authenticates with `AUTH PLAIN` and an initial response.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(&mut self, credentials: &Credentials) -> Result<()> {
        let response = format!("\0{}\0{}", credentials.username, credentials.password);
        let initial_response = STANDARD.encode(response.as_bytes());

        self.command(&Command::AuthPlain { initial_response })
            .await?
            .expect_code(ReplyCode::AUTH_SUCCESS)?;
        debug!(username = %credentials.username, "Authenticated");
        Ok(())
    }

    /// Starts a mail transaction for the envelope sender.
    ///
    /// # Errors
    ///
    /// Returns an error if the MAIL FROM command fails.
    pub async fn mail_from(&mut self, from: &str) -> Result<()> {
        let eight_bit = self.server_info.supports("8BITMIME");
        self.command(&Command::MailFrom {
            from: from.to_string(),
            eight_bit,
        })
        .await?
        .expect_success()?;
        Ok(())
    }

    /// Adds an envelope recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(&mut self, to: &str) -> Result<()> {
        self.command(&Command::RcptTo { to: to.to_string() })
            .await?
            .expect_success()?;
        Ok(())
    }

    /// Sends the message content and completes the transaction.
    ///
    /// Line endings are normalised to CRLF, lines starting with `.` are
    /// dot-stuffed, and the terminating `.` line is added.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses DATA or rejects the message.
    pub async fn data(&mut self, content: &[u8]) -> Result<()> {
        self.command(&Command::Data)
            .await?
            .expect_code(ReplyCode::START_DATA)?;
        self.write(&encode_data(content)).await?;
        self.read_reply().await?.expect_success()?;
        Ok(())
    }

    /// Sends QUIT and closes the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.command(&Command::Quit).await?;
        if reply.code != ReplyCode::CLOSING {
            reply.expect_success()?;
        }
        Ok(())
    }

    /// Returns the underlying stream. Unread buffered input is discarded.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    async fn command(&mut self, cmd: &Command) -> Result<Reply> {
        trace!(verb = cmd.verb(), "SMTP command");
        self.write(&cmd.serialize()).await?;
        self.read_reply().await
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.reader.get_mut();
        timeout(self.io_timeout, stream.write_all(data))
            .await
            .map_err(|_| Error::Timeout("write"))??;
        timeout(self.io_timeout, stream.flush())
            .await
            .map_err(|_| Error::Timeout("write"))??;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = timeout(self.io_timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| Error::Timeout("read"))??;

        if n == 0 {
            return Err(Error::Protocol("Connection closed by server".into()));
        }
        if line.len() > MAX_LINE_LENGTH {
            return Err(Error::Protocol(format!(
                "Reply line too long: {} bytes",
                line.len()
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            let is_last = is_last_reply_line(&line);
            lines.push(line);
            if is_last {
                break;
            }
        }

        let reply = parse_reply(&lines)?;
        trace!(code = reply.code.as_u16(), "SMTP reply");
        Ok(reply)
    }
}

impl Session<SmtpStream> {
    /// Returns true once the session is encrypted.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.reader.get_ref().is_tls()
    }

    /// Upgrades the session with STARTTLS.
    ///
    /// Extensions are cleared; send EHLO again afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses or the TLS handshake fails.
    pub async fn starttls(mut self, hostname: &str) -> Result<Self> {
        self.command(&Command::StartTls)
            .await?
            .expect_code(ReplyCode::SERVICE_READY)?;

        let io_timeout = self.io_timeout;
        let greeting = std::mem::take(&mut self.server_info.greeting);
        let stream = timeout(io_timeout, self.into_inner().upgrade_to_tls(hostname))
            .await
            .map_err(|_| Error::Timeout("TLS handshake"))??;
        debug!(hostname, "Upgraded to TLS");

        Ok(Self {
            reader: BufReader::new(stream),
            server_info: ServerInfo {
                greeting,
                ..ServerInfo::default()
            },
            io_timeout,
        })
    }
}
