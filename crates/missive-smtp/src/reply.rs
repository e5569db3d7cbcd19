//! SMTP replies and their parsing.

use crate::error::{Error, Result};

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// 220 Service ready.
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel.
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication successful.
    pub const AUTH_SUCCESS: Self = Self(235);
    /// 250 Requested mail action okay, completed.
    pub const OK: Self = Self(250);
    /// 354 Start mail input.
    pub const START_DATA: Self = Self(354);

    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

/// SMTP reply from server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g., 250).
    pub code: ReplyCode,
    /// Reply text, one entry per line.
    pub lines: Vec<String>,
}

impl Reply {
    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns the full message as a single string.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Converts the reply into an error unless it carries `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SmtpError`] with the server's code and text.
    pub fn expect_code(self, expected: ReplyCode) -> Result<Self> {
        if self.code == expected {
            Ok(self)
        } else {
            Err(Error::smtp_error(self.code.as_u16(), self.text()))
        }
    }

    /// Converts the reply into an error unless it is a 2xx reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SmtpError`] with the server's code and text.
    pub fn expect_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::smtp_error(self.code.as_u16(), self.text()))
        }
    }
}

/// Parses an SMTP reply from response lines (without line terminators).
///
/// SMTP replies can be single-line or multi-line:
/// - Single: `250 OK`
/// - Multi: `250-First line`, `250-Second line`, `250 Last line`
///
/// # Errors
///
/// Returns an error if the reply is malformed or the codes disagree.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let Some(first) = lines.first() else {
        return Err(Error::Protocol("Empty reply".into()));
    };

    let code = parse_code(first)?;
    let mut text = Vec::with_capacity(lines.len());
    for line in lines {
        if parse_code(line)? != code {
            return Err(Error::Protocol(format!(
                "Reply code changed mid-reply: {line}"
            )));
        }
        text.push(line.get(4..).unwrap_or_default().to_string());
    }

    Ok(Reply {
        code: ReplyCode::new(code),
        lines: text,
    })
}

fn parse_code(line: &str) -> Result<u16> {
    let digits = line
        .get(..3)
        .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| Error::Protocol(format!("Invalid reply line: {line}")))?;
    if !matches!(line.as_bytes().get(3), None | Some(b' ' | b'-')) {
        return Err(Error::Protocol(format!("Invalid reply line: {line}")));
    }
    digits
        .parse()
        .map_err(|_| Error::Protocol(format!("Invalid reply code: {digits}")))
}

/// Checks if a line is the last line of a reply.
///
/// Continuation lines use `-` after the code; the last line uses a space or
/// nothing at all.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.as_bytes().get(3) != Some(&b'-')
}
