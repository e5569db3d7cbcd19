//! # missive-smtp
//!
//! SMTP delivery for messages composed with [`missive_mime`].
//!
//! ## Features
//!
//! - **Mailer**: derives the envelope from a [`missive_mime::Message`],
//!   renders it and hands both to a [`Transport`]
//! - **SMTP transport**: EHLO, STARTTLS, AUTH PLAIN, MAIL FROM, RCPT TO, DATA
//! - **TLS**: implicit TLS (port 465), required or opportunistic STARTTLS
//! - **Extensions**: 8BITMIME, SIZE
//!
//! ## Quick Start
//!
//! ```no_run
//! use missive_mime::{Address, Message};
//! use missive_smtp::Mailer;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let sender = Address::parse("Jane Doe <jane@example.com>")?;
//! let mut message = Message::new(&sender);
//! message.add_to(&"bob@example.com".parse()?);
//! message.set_subject("Lunch");
//! message.write_text("Noon at the usual place?");
//!
//! let mut mailer = Mailer::new("smtp.example.com", 587);
//! mailer.set_auth("jane@example.com", "app-password");
//! mailer.send(&message).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Session flow
//!
//! ```text
//! connect ─→ 220 ─→ EHLO ─→ [STARTTLS ─→ EHLO] ─→ [AUTH PLAIN]
//!         ─→ MAIL FROM ─→ RCPT TO (each) ─→ DATA ─→ QUIT
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command serialization and DATA encoding
//! - [`config`]: Connection settings
//! - [`connection`]: Streams and the session driver
//! - [`reply`]: Reply parsing
//! - [`transport`]: The delivery seam and direct SMTP delivery

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod config;
pub mod connection;
pub mod reply;
pub mod transport;

mod error;
mod mailer;

pub use config::{Config, ConfigBuilder, Credentials, Security};
pub use connection::{ServerInfo, Session, SmtpStream};
pub use error::{Error, Result};
pub use mailer::Mailer;
pub use reply::{Reply, ReplyCode};
pub use transport::{Envelope, SmtpTransport, Transport};
