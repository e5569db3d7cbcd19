//! # missive-mime
//!
//! Email message composition and MIME rendering.
//!
//! ## Features
//!
//! - **Addresses**: lenient `Name <user@domain>` parsing and formatting
//! - **Messages**: ordered multi-valued headers, a text part, a lazily
//!   created HTML alternative, and arbitrary extra parts
//! - **Rendering**: single-part, `multipart/alternative` or `multipart/mixed`
//!   framing with CRLF line endings; `Bcc` is never rendered
//!
//! ## Quick Start
//!
//! ```
//! use missive_mime::{Address, Message};
//!
//! let sender = Address::parse("Jane Doe <jane@example.com>")?;
//! let mut message = Message::new(&sender);
//! message.add_to(&"bob@example.com".parse()?);
//! message.set_subject("Lunch");
//! message.write_text("Noon at the usual place?");
//! message.write_html("<p>Noon at the <em>usual</em> place?</p>");
//!
//! let bytes = message.render();
//! assert!(bytes.starts_with(b"From: Jane Doe <jane@example.com>\r\n"));
//! # Ok::<(), missive_mime::Error>(())
//! ```
//!
//! ## Reproducible output
//!
//! [`Message::render`] draws a random boundary each time. Pass a
//! [`SequentialBoundary`] (or any [`BoundarySource`]) to
//! [`Message::render_with`] for stable bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod boundary;
mod error;
mod header;
mod message;
mod render;

pub mod content_type;

pub use address::Address;
pub use boundary::{BoundarySource, RandomBoundary, SequentialBoundary};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, RecipientList};
pub use render::{Framing, PRIORITY_HEADERS};
