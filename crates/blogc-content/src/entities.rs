use blogc_utils::ByteBuffer;

/// The HTML entity for `c`, or `None` if `c` has no special meaning.
fn entity_for(c: u8) -> Option<&'static str> {
    match c {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#x27;"),
        b'/' => Some("&#x2F;"),
        _ => None,
    }
}

/// Append `c` to `buf`, HTML-escaping it if it has a special meaning.
pub fn append_escaped_byte(buf: &mut ByteBuffer, c: u8) {
    match entity_for(c) {
        Some(e) => buf.push_str(e),
        None => buf.push(c),
    }
}

/// HTML-escape every byte of `s` that needs it (`& < > " ' /`).
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut buf = ByteBuffer::with_capacity(s.len());
    for &b in s.as_bytes() {
        append_escaped_byte(&mut buf, b);
    }
    buf.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_special_bytes() {
        assert_eq!(
            html_escape(r#"<a href="x">&'/</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&#x2F;&lt;&#x2F;a&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(html_escape("hello world"), "hello world");
    }
}
