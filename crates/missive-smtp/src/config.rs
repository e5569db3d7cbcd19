//! Connection configuration types.

use std::fmt;
use std::time::Duration;

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption. **Not recommended for production.**
    None,
    /// Plaintext connect, upgraded with STARTTLS when the server offers it.
    #[default]
    Opportunistic,
    /// Plaintext connect, STARTTLS required.
    StartTls,
    /// TLS from the start (port 465).
    Implicit,
}

impl Security {
    /// Returns the default port for this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::Opportunistic | Self::StartTls => 587,
            Self::Implicit => 465,
        }
    }
}

/// Username and password for `AUTH PLAIN`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Authentication identity.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// SMTP connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Credentials for `AUTH PLAIN`, if any.
    pub credentials: Option<Credentials>,
    /// Name sent with `EHLO`.
    pub client_hostname: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read/write timeout.
    pub io_timeout: Duration,
}

impl Config {
    /// Creates a configuration for `host:port` with opportunistic STARTTLS
    /// and no credentials.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::builder(host).port(port).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(host)
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for connection configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    security: Security,
    credentials: Option<Credentials>,
    client_hostname: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl ConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            security: Security::default(),
            credentials: None,
            client_hostname: "localhost".to_string(),
            connect_timeout: Duration::from_secs(30),
            io_timeout: Duration::from_secs(60),
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the security mode.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Enables `AUTH PLAIN` with the given credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Sets the name announced in `EHLO`.
    #[must_use]
    pub fn client_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.client_hostname = hostname.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the I/O timeout.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            host: self.host,
            port: self.port.unwrap_or_else(|| self.security.default_port()),
            security: self.security,
            credentials: self.credentials,
            client_hostname: self.client_hostname,
            connect_timeout: self.connect_timeout,
            io_timeout: self.io_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::builder("smtp.example.com").build();
        assert_eq!(config.port, 587);
        assert_eq!(config.security, Security::Opportunistic);
        assert!(config.credentials.is_none());
        assert_eq!(config.client_hostname, "localhost");
        assert_eq!(config.address(), "smtp.example.com:587");
    }

    #[test]
    fn test_port_follows_security() {
        let config = Config::builder("mx.example.com")
            .security(Security::Implicit)
            .build();
        assert_eq!(config.port, 465);

        let config = Config::builder("mx.example.com")
            .security(Security::None)
            .build();
        assert_eq!(config.port, 25);
    }

    #[test]
    fn test_explicit_port_wins() {
        let config = Config::new("mx.example.com", 2525);
        assert_eq!(config.port, 2525);
        assert_eq!(config.security, Security::Opportunistic);
    }

    #[test]
    fn test_builder_settings() {
        let config = Config::builder("mx.example.com")
            .credentials("user", "pass")
            .client_hostname("client.example.org")
            .connect_timeout(Duration::from_secs(5))
            .io_timeout(Duration::from_secs(7))
            .build();

        assert_eq!(config.credentials, Some(Credentials::new("user", "pass")));
        assert_eq!(config.client_hostname, "client.example.org");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.io_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}
