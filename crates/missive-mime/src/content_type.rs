//! Content-Type values.
//!
//! Part content types are stored as raw header strings; only the media type
//! (the text before the first `;`) is ever inspected.

/// Content type of the text part every message starts with.
pub const TEXT_PLAIN_UTF8: &str = r#"text/plain; charset="UTF-8""#;

/// Content type given to a lazily created HTML part.
pub const TEXT_HTML_UTF8: &str = r#"text/html; charset="UTF-8""#;

/// Returns the media type of a Content-Type value, without parameters.
///
/// ```
/// use missive_mime::content_type::media_type;
///
/// assert_eq!(media_type(r#"text/html; charset="UTF-8""#), "text/html");
/// ```
#[must_use]
pub fn media_type(value: &str) -> &str {
    value.split(';').next().unwrap_or_default().trim()
}

/// Checks the media type of a Content-Type value, ignoring parameters and case.
#[must_use]
pub fn is_media_type(value: &str, expected: &str) -> bool {
    media_type(value).eq_ignore_ascii_case(expected)
}

/// Checks whether a Content-Type value is `text/html`.
#[must_use]
pub fn is_html(value: &str) -> bool {
    is_media_type(value, "text/html")
}

/// Builds a `multipart/<subtype>` value with a quoted boundary parameter.
#[must_use]
pub fn multipart(subtype: &str, boundary: &str) -> String {
    format!(r#"multipart/{subtype}; boundary="{boundary}""#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type() {
        assert_eq!(media_type("text/plain"), "text/plain");
        assert_eq!(media_type(TEXT_PLAIN_UTF8), "text/plain");
        assert_eq!(media_type(" application/pdf ; name=x.pdf"), "application/pdf");
        assert_eq!(media_type(""), "");
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(TEXT_HTML_UTF8));
        assert!(is_html("TEXT/HTML"));
        assert!(!is_html("text/htmlx"));
        assert!(!is_html(TEXT_PLAIN_UTF8));
    }

    #[test]
    fn test_multipart() {
        assert_eq!(
            multipart("mixed", "abc123"),
            r#"multipart/mixed; boundary="abc123""#
        );
    }
}
