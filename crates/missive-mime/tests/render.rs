//! Rendering scenarios for complete messages.

#![allow(clippy::unwrap_used)]

use missive_mime::{Address, Framing, Message, SequentialBoundary};

fn address(text: &str) -> Address {
    Address::parse(text).unwrap()
}

fn new_message() -> Message {
    Message::new(&address("Alice <alice@example.com>"))
}

fn header_block(rendered: &[u8]) -> &str {
    let text = std::str::from_utf8(rendered).unwrap();
    text.split_once("\r\n\r\n").unwrap().0
}

fn header_value<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    block
        .split("\r\n")
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(": "))
}

#[test]
fn plain_text_message_uses_part_content_type_and_verbatim_body() {
    let mut message = new_message();
    message.add_to(&address("bob@example.com"));
    message.write_text("Hi Bob,\r\n\r\n.leading dot stays as written\r\n");

    let rendered = message.render();
    let block = header_block(&rendered);
    assert_eq!(
        header_value(block, "Content-Type"),
        Some("text/plain; charset=\"UTF-8\"")
    );
    assert!(rendered.ends_with(b"\r\n\r\nHi Bob,\r\n\r\n.leading dot stays as written\r\n"));
}

#[test]
fn text_and_html_render_as_alternative_with_two_sections() {
    let mut message = new_message();
    message.write_text("plain");
    message.write_html("<p>rich</p>");

    let rendered = String::from_utf8(message.render()).unwrap();
    let block = header_block(rendered.as_bytes());
    let content_type = header_value(block, "Content-Type").unwrap();
    let boundary = content_type
        .strip_prefix("multipart/alternative; boundary=\"")
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap();

    let delimiter = format!("--{boundary}\r\n");
    let closing = format!("--{boundary}--\r\n");
    assert_eq!(rendered.matches(&delimiter).count(), 2);
    assert!(rendered.ends_with(&closing));
}

#[test]
fn attachments_render_as_mixed() {
    let mut message = new_message();
    message.write_text("see attached");
    message.new_part("application/pdf").append(b"%PDF-1.4");
    message.new_part("image/png").append(b"\x89PNG");

    assert_eq!(message.framing(), Framing::Mixed);
    let rendered = message.render();
    let content_type = header_value(header_block(&rendered), "Content-Type").unwrap();
    assert!(content_type.starts_with("multipart/mixed; boundary=\""));
}

#[test]
fn bcc_only_recipients_never_rendered() {
    let mut message = new_message();
    message.add_bcc(&address("Secret <secret@example.com>"));
    message.add_bcc(&address("covert@example.com"));

    let rendered = String::from_utf8(message.render()).unwrap();
    assert!(!rendered.contains("secret@example.com"));
    assert!(!rendered.contains("covert@example.com"));
    assert!(header_value(header_block(rendered.as_bytes()), "To").is_none());
    assert_eq!(message.recipients().len(), 2);
}

#[test]
fn recipients_skip_malformed_entries() {
    let mut message = new_message();
    message.add_to(&address("valid@example.com"));
    message.add_header("To", "malformed");

    let recipients = message.recipients();
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].address(), "valid@example.com");
}

#[test]
fn repeated_renders_agree_apart_from_boundary() {
    let mut message = new_message();
    message.add_to(&address("bob@example.com"));
    message.add_cc(&address("carol@example.com"));
    message.set_subject("Status");
    message.set_header("X-Priority", "3");
    message.write_text("text");
    message.write_html("<p>html</p>");

    let first = message.render();
    let second = message.render();

    let fixed = |rendered: &[u8]| {
        let block = header_block(rendered);
        ["From", "To", "Cc", "Subject", "MIME-Version", "Date", "X-Priority"]
            .map(|name| header_value(block, name).map(str::to_string))
    };
    assert_eq!(fixed(&first), fixed(&second));
    assert_ne!(first, second);
}

#[test]
fn seeded_boundaries_make_renders_identical() {
    let mut message = new_message();
    message.write_text("text");
    message.new_part("text/csv").append(b"a,b\r\n1,2\r\n");

    let first = message.render_with(&mut SequentialBoundary::new("seed-"));
    let second = message.render_with(&mut SequentialBoundary::new("seed-"));
    assert_eq!(first, second);
    assert!(
        String::from_utf8(first)
            .unwrap()
            .contains("Content-Type: multipart/mixed; boundary=\"seed-0000\"\r\n")
    );
}

#[test]
fn header_priority_order() {
    let mut message = new_message();
    message.set_header("X-Custom", "1");
    message.set_subject("S");
    message.add_cc(&address("cc@example.com"));
    message.add_to(&address("to@example.com"));

    let rendered = message.render();
    let names: Vec<&str> = header_block(&rendered)
        .split("\r\n")
        .filter_map(|line| line.split_once(": ").map(|(name, _)| name))
        .collect();
    assert_eq!(
        names,
        [
            "From",
            "To",
            "Cc",
            "Subject",
            "MIME-Version",
            "Date",
            "Content-Type",
            "X-Custom"
        ]
    );
}
