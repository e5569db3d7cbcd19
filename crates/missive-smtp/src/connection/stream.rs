//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(TcpStream),
    /// TLS-encrypted connection.
    Tls(Box<tokio_rustls::client::TlsStream<TcpStream>>),
}

impl SmtpStream {
    /// Returns true once the stream is encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    /// Upgrades a TCP stream to TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is already encrypted or the TLS
    /// handshake fails.
    pub async fn upgrade_to_tls(self, hostname: &str) -> Result<Self> {
        let tcp_stream = match self {
            Self::Tcp(stream) => stream,
            Self::Tls(_) => return Err(Error::Protocol("Already using TLS".into())),
        };

        wrap_tls(tcp_stream, hostname).await
    }
}

impl AsyncRead for SmtpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(&mut **stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for SmtpStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(&mut **stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(&mut **stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(&mut **stream).poll_shutdown(cx),
        }
    }
}

/// Connects to an SMTP server over plain TCP.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn connect(hostname: &str, port: u16) -> Result<SmtpStream> {
    let stream = TcpStream::connect((hostname, port)).await?;
    Ok(SmtpStream::Tcp(stream))
}

/// Connects to an SMTP server over TLS (implicit TLS on port 465).
///
/// # Errors
///
/// Returns an error if the connection or TLS handshake fails.
pub async fn connect_tls(hostname: &str, port: u16) -> Result<SmtpStream> {
    let tcp_stream = TcpStream::connect((hostname, port)).await?;
    wrap_tls(tcp_stream, hostname).await
}

async fn wrap_tls(tcp_stream: TcpStream, hostname: &str) -> Result<SmtpStream> {
    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|_| Error::Protocol(format!("Invalid hostname: {hostname}")))?;

    let tls_stream = create_tls_connector()
        .connect(server_name, tcp_stream)
        .await?;
    Ok(SmtpStream::Tls(Box::new(tls_stream)))
}

/// Creates a TLS connector with the bundled web PKI roots.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
