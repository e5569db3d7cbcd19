//! SMTP commands.

/// SMTP command sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - Extended greeting
    Ehlo {
        /// Client hostname
        hostname: String,
    },
    /// STARTTLS - Upgrade to TLS
    StartTls,
    /// AUTH PLAIN with a base64 initial response
    AuthPlain {
        /// Encoded `\0username\0password`
        initial_response: String,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Envelope sender
        from: String,
        /// Append `BODY=8BITMIME`
        eight_bit: bool,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Envelope recipient
        to: String,
    },
    /// DATA - Begin message data
    Data,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Serializes the command, including the trailing CRLF.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::AuthPlain { initial_response } => format!("AUTH PLAIN {initial_response}"),
            Self::MailFrom { from, eight_bit } => {
                if *eight_bit {
                    format!("MAIL FROM:<{from}> BODY=8BITMIME")
                } else {
                    format!("MAIL FROM:<{from}>")
                }
            }
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns the command verb for logging. Never includes credentials.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Ehlo { .. } => "EHLO",
            Self::StartTls => "STARTTLS",
            Self::AuthPlain { .. } => "AUTH",
            Self::MailFrom { .. } => "MAIL",
            Self::RcptTo { .. } => "RCPT",
            Self::Data => "DATA",
            Self::Quit => "QUIT",
        }
    }
}

/// Normalises message content to CRLF lines, dot-stuffs it, and appends the
/// terminating `.` line.
#[must_use]
pub fn encode_data(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + content.len() / 64 + 5);

    if !content.is_empty() {
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        for line in body.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.first() == Some(&b'.') {
                out.push(b'.');
            }
            out.extend_from_slice(line);
            out.extend_from_slice(b"\r\n");
        }
    }

    out.extend_from_slice(b".\r\n");
    out
}
