#![allow(clippy::doc_markdown, clippy::uninlined_format_args)]
//! Example: compose a message and send it over SMTP
//!
//! ## Running
//!
//! ```bash
//! export SMTP_USERNAME="you@example.com"   # optional
//! export SMTP_PASSWORD="app-password"      # optional
//! RUST_LOG=missive_smtp=debug cargo run --package missive-smtp --example send_message -- \
//!     smtp.example.com 587 "You <you@example.com>" friend@example.org
//! ```
//!
//! A local debugging server works too:
//!
//! ```bash
//! python -m aiosmtpd -n -l localhost:2525
//! cargo run --package missive-smtp --example send_message -- localhost 2525 me@localhost you@localhost
//! ```

use missive_mime::{Address, Message};
use missive_smtp::Mailer;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [host, port, from, recipients @ ..] = args.as_slice() else {
        eprintln!("usage: send_message <host> <port> <from> <to>...");
        std::process::exit(2);
    };
    if recipients.is_empty() {
        eprintln!("At least one recipient is required");
        std::process::exit(2);
    }

    let sender = Address::parse(from)?;
    let mut message = Message::new(&sender);
    for recipient in recipients {
        message.add_to(&Address::parse(recipient)?);
    }
    message.set_subject("Hello from missive");
    message.write_text("This message has a plain text body\r\nand an HTML alternative.\r\n");
    message.write_html("<p>This message has a plain text body<br>and an <b>HTML</b> alternative.</p>\r\n");

    let mut mailer = Mailer::new(host.as_str(), port.parse()?);
    if let (Ok(username), Ok(password)) = (env::var("SMTP_USERNAME"), env::var("SMTP_PASSWORD")) {
        mailer.set_auth(username, password);
    }

    println!("Sending to {} via {}...", recipients.join(", "), mailer.config().address());
    mailer.send(&message).await?;
    println!("✓ Sent");

    Ok(())
}
