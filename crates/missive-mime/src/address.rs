//! Mailbox addresses in the informal `Name <user@domain>` form.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A mailbox: username, domain and an optional display name.
///
/// The domain is always trimmed and lower-cased. Values are immutable once
/// built, either by [`Address::parse`] or by [`Address::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Address {
    username: String,
    domain: String,
    display_name: String,
}

impl Address {
    /// Creates an address without a display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the username is empty or contains
    /// whitespace, `@`, `<` or `>`.
    pub fn new(username: impl Into<String>, domain: impl AsRef<str>) -> Result<Self> {
        let username = username.into();
        let domain = domain.as_ref();
        if username.is_empty()
            || username
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '@' | '<' | '>'))
        {
            return Err(Error::invalid_address(format!("{username}@{domain}")));
        }

        Ok(Self {
            username,
            domain: normalize_domain(domain),
            display_name: String::new(),
        })
    }

    /// Returns a copy of this address carrying the given display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Parses an address from `Name <user@domain>`, `"Name" <user@domain>`
    /// or bare `user@domain` text.
    ///
    /// This is a lenient heuristic rather than an RFC 5322 grammar. Only the
    /// last whitespace-separated token before the final `@` becomes the
    /// username, so `Jane jane@example.com` parses as `jane@example.com` with
    /// no display name. With several `@` characters only the last two pieces
    /// are used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if there is no `@`, or if nothing
    /// but whitespace precedes the final `@`.
    pub fn parse(text: &str) -> Result<Self> {
        let (display_name, mailbox) = split_display_name(text);

        let pieces: Vec<&str> = mailbox.split('@').collect();
        let [.., local, domain] = pieces.as_slice() else {
            return Err(Error::invalid_address(text));
        };

        let username = local
            .split_whitespace()
            .last()
            .ok_or_else(|| Error::invalid_address(text))?;

        Ok(Self {
            username: username.to_string(),
            domain: normalize_domain(domain),
            display_name: display_name.to_string(),
        })
    }

    /// Returns the username (local part).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the lower-cased domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the display name, empty when absent.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the bare mailbox, `username@domain`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}@{}", self.username, self.domain)
    }
}

/// Splits `Name <mailbox>` into the unquoted name and the bracketed mailbox.
fn split_display_name(text: &str) -> (&str, &str) {
    let Some(left) = text.find('<') else {
        return ("", text);
    };
    let Some(len) = text[left + 1..].find('>') else {
        return ("", text);
    };

    let name = text[..left].trim();
    let name = name.strip_prefix('"').unwrap_or(name);
    let name = name.strip_suffix('"').unwrap_or(name);
    (name, &text[left + 1..left + 1 + len])
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}@{}", self.username, self.domain)
        } else {
            write!(
                f,
                "{} <{}@{}>",
                self.display_name, self.username, self.domain
            )
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}
