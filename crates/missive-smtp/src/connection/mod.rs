//! SMTP connections and sessions.

mod session;
mod stream;

pub use session::Session;
pub use stream::{SmtpStream, connect, connect_tls};

use crate::reply::Reply;
use std::collections::HashMap;

/// Server capabilities from the greeting and EHLO response.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Greeting text (usually the server hostname and banner).
    pub greeting: String,
    /// Advertised extensions, keyword (upper-case) to parameters.
    pub extensions: HashMap<String, String>,
}

impl ServerInfo {
    /// Replaces the extensions with those listed in an EHLO reply.
    ///
    /// The first reply line is the server's greeting and is skipped.
    pub(crate) fn set_extensions(&mut self, ehlo: &Reply) {
        self.extensions = ehlo
            .lines
            .iter()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (keyword, params) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
                (keyword.to_ascii_uppercase(), params.trim().to_string())
            })
            .collect();
    }

    /// Checks if the server supports an extension keyword.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> bool {
        self.extensions.contains_key(&keyword.to_ascii_uppercase())
    }

    /// Checks if STARTTLS is supported.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports("STARTTLS")
    }

    /// Returns the maximum message size, if advertised. `SIZE 0` means no limit.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        self.extensions
            .get("SIZE")
            .and_then(|size| size.parse().ok())
            .filter(|&size| size > 0)
    }

    /// Returns supported authentication mechanisms.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<&str> {
        self.extensions
            .get("AUTH")
            .map(|mechanisms| mechanisms.split_whitespace().collect())
            .unwrap_or_default()
    }
}
