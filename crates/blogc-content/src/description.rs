use crate::entities::html_escape;

/// Collapse a paragraph's raw text into a single-line description: runs of
/// newlines become a single space, the result is stripped of surrounding
/// whitespace, then HTML-escaped.
#[must_use]
pub fn fix_description(paragraph: &str) -> String {
    let bytes = paragraph.as_bytes();
    let mut rv = String::with_capacity(bytes.len());
    let mut newline = false;
    let mut start = 0;
    let mut current = 0;

    loop {
        let last = current == bytes.len();
        let c = if last { 0u8 } else { bytes[current] };
        match c {
            0 | b'\r' | b'\n' => {
                if !newline {
                    rv.push_str(paragraph[start..current].trim());
                    if !last {
                        rv.push(' ');
                    }
                    start = current + 1;
                    newline = true;
                }
            }
            _ => newline = false,
        }
        if last {
            break;
        }
        current += 1;
    }

    html_escape(rv.trim())
}
