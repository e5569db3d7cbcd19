//! Message and body part model.

use crate::address::Address;
use crate::content_type::{TEXT_HTML_UTF8, TEXT_PLAIN_UTF8, is_html};
use crate::error::Result;
use crate::header::Headers;
use chrono::{DateTime, FixedOffset, Local};
use std::io;
use tracing::{debug, warn};

/// `Date` header format, e.g. `Mon, 2 Jan 2006 15:04:05 -0700`.
const DATE_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S %z";

/// Headers whose values are envelope recipients, in enumeration order.
const RECIPIENT_HEADERS: [&str; 3] = ["To", "Cc", "Bcc"];

/// A single body segment: headers plus raw body bytes.
///
/// The `Content-Type` header is fixed when the part is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    headers: Headers,
    body: Vec<u8>,
}

impl Part {
    fn new(content_type: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", content_type);
        Self {
            headers,
            body: Vec::new(),
        }
    }

    /// Returns the part headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw `Content-Type` value given at creation.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.headers.get("Content-Type").unwrap_or_default()
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Sets an extra part header such as `Content-Disposition`.
    ///
    /// `Content-Type` cannot be changed after creation; such calls are ignored.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.eq_ignore_ascii_case("Content-Type") {
            warn!(content_type = self.content_type(), "part Content-Type is immutable");
            return;
        }
        self.headers.set(name, value);
    }

    /// Appends bytes to the body.
    pub fn append(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }
}

impl io::Write for Part {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result of resolving the `To`, `Cc` and `Bcc` headers into addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientList {
    /// Successfully parsed recipients: `To`, then `Cc`, then `Bcc`.
    pub addresses: Vec<Address>,
    /// Number of header values that could not be parsed and were skipped.
    pub dropped: usize,
}

/// An email message under construction.
///
/// A message always holds at least one part. The first part is the
/// `text/plain` part created by [`Message::new`] and stays first for the
/// lifetime of the message.
///
/// A `Message` is not synchronised. Use one message per send, or clone it.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Headers,
    parts: Vec<Part>,
}

impl Message {
    /// Creates a message from `sender`, dated now.
    #[must_use]
    pub fn new(sender: &Address) -> Self {
        Self::with_date(sender, Local::now().fixed_offset())
    }

    /// Creates a message from `sender` with an explicit `Date`.
    #[must_use]
    pub fn with_date(sender: &Address, date: DateTime<FixedOffset>) -> Self {
        let mut headers = Headers::new();
        headers.set("From", sender.to_string());
        headers.set("Date", date.format(DATE_FORMAT).to_string());
        headers.set("MIME-Version", "1.0");

        Self {
            headers,
            parts: vec![Part::new(TEXT_PLAIN_UTF8)],
        }
    }

    /// Returns the message headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Gets the first value of a message header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Sets a header, replacing existing values.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Appends a header value. `From` is single-valued and is replaced instead.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.eq_ignore_ascii_case("From") {
            self.headers.set(name, value);
        } else {
            self.headers.add(name, value);
        }
    }

    /// Adds a `To` recipient.
    pub fn add_to(&mut self, address: &Address) {
        self.headers.add("To", address.to_string());
    }

    /// Adds a `Cc` recipient.
    pub fn add_cc(&mut self, address: &Address) {
        self.headers.add("Cc", address.to_string());
    }

    /// Adds a `Bcc` recipient. `Bcc` is never rendered.
    pub fn add_bcc(&mut self, address: &Address) {
        self.headers.add("Bcc", address.to_string());
    }

    /// Sets the subject, replacing any previous one.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.headers.set("Subject", subject);
    }

    /// Returns all parts in order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Appends an empty part with the given content type and returns it.
    pub fn new_part(&mut self, content_type: impl Into<String>) -> &mut Part {
        let index = self.parts.len();
        self.parts.push(Part::new(content_type));
        &mut self.parts[index]
    }

    /// Returns the text part (always the first part).
    pub fn text_part(&mut self) -> &mut Part {
        &mut self.parts[0]
    }

    /// Returns the first `text/html` part, creating one at the end if none exists.
    pub fn html_part(&mut self) -> &mut Part {
        match self
            .parts
            .iter()
            .position(|part| is_html(part.content_type()))
        {
            Some(index) => &mut self.parts[index],
            None => self.new_part(TEXT_HTML_UTF8),
        }
    }

    /// Appends bytes to the most recently created part.
    pub fn append(&mut self, data: &[u8]) {
        let last = self.parts.len() - 1;
        self.parts[last].append(data);
    }

    /// Appends text to the text part.
    pub fn write_text(&mut self, text: &str) {
        self.text_part().append(text.as_bytes());
    }

    /// Appends markup to the HTML part, creating it if needed.
    pub fn write_html(&mut self, html: &str) {
        self.html_part().append(html.as_bytes());
    }

    /// Parses the `From` header back into an address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAddress`] if `From` is missing or malformed.
    pub fn sender(&self) -> Result<Address> {
        Address::parse(self.header("From").unwrap_or_default())
    }

    /// Returns the envelope recipients parsed from `To`, `Cc` and `Bcc`.
    ///
    /// Values that fail to parse are skipped; see [`Message::recipient_report`]
    /// for how many were dropped.
    #[must_use]
    pub fn recipients(&self) -> Vec<Address> {
        self.recipient_report().addresses
    }

    /// Resolves the recipient headers, counting values that failed to parse.
    #[must_use]
    pub fn recipient_report(&self) -> RecipientList {
        let mut list = RecipientList::default();
        for name in RECIPIENT_HEADERS {
            for value in self.headers.get_all(name) {
                match Address::parse(value) {
                    Ok(address) => list.addresses.push(address),
                    Err(e) => {
                        debug!(header = name, %e, "Dropping unparsable recipient");
                        list.dropped += 1;
                    }
                }
            }
        }
        list
    }
}

impl io::Write for Message {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn sender() -> Address {
        Address::parse("Sender <sender@example.com>").unwrap()
    }

    fn fixed_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2006-01-02T15:04:05-07:00").unwrap()
    }

    #[test]
    fn test_new_message_headers() {
        let message = Message::with_date(&sender(), fixed_date());
        assert_eq!(message.header("From"), Some("Sender <sender@example.com>"));
        assert_eq!(message.header("Date"), Some("Mon, 2 Jan 2006 15:04:05 -0700"));
        assert_eq!(message.header("MIME-Version"), Some("1.0"));
        assert_eq!(message.parts().len(), 1);
        assert_eq!(message.parts()[0].content_type(), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_new_uses_current_date() {
        let message = Message::new(&sender());
        assert!(message.header("Date").is_some());
    }

    #[test]
    fn test_recipients_are_multi_valued() {
        let mut message = Message::new(&sender());
        message.add_to(&Address::parse("a@example.com").unwrap());
        message.add_to(&Address::parse("B <b@example.com>").unwrap());
        message.add_cc(&Address::parse("c@example.com").unwrap());
        message.add_bcc(&Address::parse("d@example.com").unwrap());

        assert_eq!(
            message.headers().get_all("To"),
            ["a@example.com", "B <b@example.com>"]
        );
        assert_eq!(message.headers().get_all("Cc"), ["c@example.com"]);
        assert_eq!(message.headers().get_all("Bcc"), ["d@example.com"]);
    }

    #[test]
    fn test_recipients_order() {
        let mut message = Message::new(&sender());
        message.add_bcc(&Address::parse("bcc@example.com").unwrap());
        message.add_cc(&Address::parse("cc@example.com").unwrap());
        message.add_to(&Address::parse("to1@example.com").unwrap());
        message.add_to(&Address::parse("to2@example.com").unwrap());

        let recipients: Vec<String> = message
            .recipients()
            .iter()
            .map(Address::address)
            .collect();
        assert_eq!(
            recipients,
            [
                "to1@example.com",
                "to2@example.com",
                "cc@example.com",
                "bcc@example.com"
            ]
        );
    }

    #[test]
    fn test_recipients_drop_malformed() {
        let mut message = Message::new(&sender());
        message.add_to(&Address::parse("ok@example.com").unwrap());
        message.add_header("To", "not-an-address");

        let recipients = message.recipients();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].address(), "ok@example.com");

        let report = message.recipient_report();
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_set_subject_overwrites() {
        let mut message = Message::new(&sender());
        message.set_subject("first");
        message.set_subject("second");
        assert_eq!(message.headers().get_all("Subject"), ["second"]);
    }

    #[test]
    fn test_from_is_single_valued() {
        let mut message = Message::new(&sender());
        message.add_header("from", "other@example.com");
        assert_eq!(message.headers().get_all("From"), ["other@example.com"]);
    }

    #[test]
    fn test_sender_round_trip() {
        let message = Message::new(&sender());
        let from = message.sender().unwrap();
        assert_eq!(from.address(), "sender@example.com");
        assert_eq!(from.display_name(), "Sender");
    }

    #[test]
    fn test_sender_malformed() {
        let mut message = Message::new(&sender());
        message.set_header("From", "nobody");
        assert!(message.sender().is_err());
    }

    #[test]
    fn test_html_part_created_lazily() {
        let mut message = Message::new(&sender());
        message.write_html("<p>one</p>");
        message.write_html("<p>two</p>");

        assert_eq!(message.parts().len(), 2);
        assert_eq!(message.parts()[1].content_type(), TEXT_HTML_UTF8);
        assert_eq!(message.parts()[1].body(), b"<p>one</p><p>two</p>");
    }

    #[test]
    fn test_html_part_reuses_existing() {
        let mut message = Message::new(&sender());
        message.new_part("application/pdf");
        message.new_part("text/html");
        message.write_html("<b>hi</b>");

        assert_eq!(message.parts().len(), 3);
        assert_eq!(message.parts()[2].body(), b"<b>hi</b>");
    }

    #[test]
    fn test_html_part_appended_after_attachments() {
        let mut message = Message::new(&sender());
        message.new_part("application/pdf");
        message.html_part();

        assert_eq!(message.parts().len(), 3);
        assert_eq!(message.parts()[2].content_type(), TEXT_HTML_UTF8);
    }

    #[test]
    fn test_text_part_stays_first() {
        let mut message = Message::new(&sender());
        message.new_part("image/png").append(b"\x89PNG");
        message.write_text("hello");

        assert_eq!(message.parts()[0].body(), b"hello");
        assert_eq!(message.text_part().content_type(), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_append_targets_last_part() {
        let mut message = Message::new(&sender());
        message.append(b"text ");
        message.new_part("text/csv");
        message.write_all(b"a,b\n").unwrap();

        assert_eq!(message.parts()[0].body(), b"text ");
        assert_eq!(message.parts()[1].body(), b"a,b\n");
    }

    #[test]
    fn test_part_content_type_immutable() {
        let mut message = Message::new(&sender());
        let part = message.new_part("application/zip");
        part.set_header("Content-Type", "text/plain");
        part.set_header("Content-Disposition", "attachment; filename=\"a.zip\"");

        assert_eq!(part.content_type(), "application/zip");
        assert_eq!(
            part.headers().get("content-disposition"),
            Some("attachment; filename=\"a.zip\"")
        );
    }

    #[test]
    fn test_part_io_write() {
        let mut message = Message::new(&sender());
        write!(message.text_part(), "{} + {} = {}", 1, 2, 3).unwrap();
        assert_eq!(message.parts()[0].body(), b"1 + 2 = 3");
    }
}
