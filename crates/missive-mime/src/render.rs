//! MIME rendering.
//!
//! Rendering never mutates the message. The effective `Content-Type` is
//! computed for the output only, so a message can be rendered any number of
//! times and shared as a template between sends.
//!
//! Header order is fixed for the well-known headers (see
//! [`PRIORITY_HEADERS`]); any other message headers follow in the order they
//! were first added. `Bcc` is never written.

use crate::boundary::{BoundarySource, RandomBoundary};
use crate::content_type::{self, is_html};
use crate::message::{Message, Part};
use tracing::trace;

/// Headers written first, in this order, when present.
pub const PRIORITY_HEADERS: [&str; 7] = [
    "From",
    "To",
    "Cc",
    "Subject",
    "MIME-Version",
    "Date",
    "Content-Type",
];

/// Header that is never written to the rendered message.
const HIDDEN_HEADER: &str = "Bcc";

/// How a message body is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One part, written as the message body with no boundary.
    Single,
    /// A text part followed by one HTML part.
    Alternative,
    /// Any other set of two or more parts.
    Mixed,
}

impl Framing {
    /// Chooses the framing for a list of parts.
    ///
    /// The second part counts as HTML when its media type is `text/html`,
    /// compared case-insensitively and ignoring parameters, so
    /// `TEXT/HTML; charset=x` also selects [`Framing::Alternative`].
    #[must_use]
    pub fn for_parts(parts: &[Part]) -> Self {
        match parts {
            [_] => Self::Single,
            [_, second] if is_html(second.content_type()) => Self::Alternative,
            _ => Self::Mixed,
        }
    }

    /// Returns the multipart subtype, or `None` for a single part.
    #[must_use]
    pub const fn multipart_subtype(self) -> Option<&'static str> {
        match self {
            Self::Single => None,
            Self::Alternative => Some("alternative"),
            Self::Mixed => Some("mixed"),
        }
    }
}

impl Message {
    /// Returns the framing this message renders with.
    #[must_use]
    pub fn framing(&self) -> Framing {
        Framing::for_parts(self.parts())
    }

    /// Renders the message with a fresh random boundary.
    ///
    /// Two calls on an unchanged message produce the same headers and bodies,
    /// but multipart boundaries differ. Use [`Message::render_with`] for
    /// byte-for-byte reproducible output.
    #[must_use]
    pub fn render(&self) -> Vec<u8> {
        self.render_with(&mut RandomBoundary)
    }

    /// Renders the message, taking the boundary from `boundaries`.
    ///
    /// The source is only consulted for multipart messages. A boundary that
    /// already occurs in a part body is discarded and the next one drawn.
    #[must_use]
    pub fn render_with(&self, boundaries: &mut impl BoundarySource) -> Vec<u8> {
        let parts = self.parts();
        let framing = Framing::for_parts(parts);
        trace!(?framing, parts = parts.len(), "Rendering message");

        let (content_type, boundary) = match framing.multipart_subtype() {
            Some(subtype) => {
                let boundary = draw_boundary(boundaries, parts);
                (content_type::multipart(subtype, &boundary), Some(boundary))
            }
            None => (
                parts
                    .first()
                    .map(Part::content_type)
                    .unwrap_or_default()
                    .to_string(),
                None,
            ),
        };

        let mut out = Vec::new();
        self.write_headers(&mut out, &content_type);
        out.extend_from_slice(b"\r\n");

        match boundary {
            Some(boundary) => write_multipart(&mut out, &boundary, parts),
            None => {
                if let Some(part) = parts.first() {
                    out.extend_from_slice(part.body());
                }
            }
        }

        out
    }

    fn write_headers(&self, out: &mut Vec<u8>, content_type: &str) {
        let headers = self.headers();

        for name in PRIORITY_HEADERS {
            if name == "Content-Type" {
                write_header_line(out, name, &[content_type]);
            } else {
                write_header_line(out, name, headers.get_all(name));
            }
        }

        for (name, values) in headers.iter() {
            let reserved = name.eq_ignore_ascii_case(HIDDEN_HEADER)
                || PRIORITY_HEADERS
                    .iter()
                    .any(|priority| priority.eq_ignore_ascii_case(name));
            if !reserved {
                write_header_line(out, name, values);
            }
        }
    }
}

/// Upper bound on boundary draws before the last one is used regardless.
const MAX_BOUNDARY_DRAWS: usize = 16;

/// Takes boundaries from `boundaries` until one does not appear in any body.
fn draw_boundary(boundaries: &mut impl BoundarySource, parts: &[Part]) -> String {
    let mut boundary = boundaries.next_boundary();
    for _ in 1..MAX_BOUNDARY_DRAWS {
        if !parts.iter().any(|part| contains_delimiter(part.body(), &boundary)) {
            break;
        }
        trace!(%boundary, "Boundary occurs in a part body, drawing another");
        boundary = boundaries.next_boundary();
    }
    boundary
}

fn contains_delimiter(body: &[u8], boundary: &str) -> bool {
    let delimiter = format!("--{boundary}");
    body.windows(delimiter.len())
        .any(|window| window == delimiter.as_bytes())
}

/// Writes `name: v1, v2\r\n`, or nothing when there are no values.
///
/// CR and LF inside the name or a value are written as spaces so a value
/// can never start a header line of its own.
fn write_header_line<V: AsRef<str>>(out: &mut Vec<u8>, name: &str, values: &[V]) {
    let Some((first, rest)) = values.split_first() else {
        return;
    };

    write_unfolded(out, name);
    out.extend_from_slice(b": ");
    write_unfolded(out, first.as_ref());
    for value in rest {
        out.extend_from_slice(b", ");
        write_unfolded(out, value.as_ref());
    }
    out.extend_from_slice(b"\r\n");
}

fn write_unfolded(out: &mut Vec<u8>, text: &str) {
    out.extend(
        text.bytes()
            .map(|b| if matches!(b, b'\r' | b'\n') { b' ' } else { b }),
    );
}

fn write_multipart(out: &mut Vec<u8>, boundary: &str, parts: &[Part]) {
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"--");
        out.extend_from_slice(boundary.as_bytes());
        out.extend_from_slice(b"\r\n");

        for (name, values) in part.headers().iter() {
            write_header_line(out, name, values);
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(part.body());
    }

    out.extend_from_slice(b"\r\n--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"--\r\n");
}
