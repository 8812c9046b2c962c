use blogc_utils::ByteBuffer;

use crate::description::fix_description;
use crate::entities::html_escape;
use crate::inline::parse_inline;
use crate::slug::slugify;

/// A `(level, slug, text)` triple collected for every header encountered
/// during block parsing, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderRecord {
    pub level: u8,
    pub slug: Option<String>,
    pub text: String,
}

/// Everything the content parser produces from one body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentParseResult {
    pub html: String,
    /// Byte offset into `html` at which an excerpt marker split the
    /// content; `0` if no marker was present.
    pub excerpt_offset: usize,
    pub first_header: Option<String>,
    pub description: Option<String>,
    pub line_ending: String,
    pub headers: Vec<HeaderRecord>,
}

impl ContentParseResult {
    #[must_use]
    pub fn excerpt(&self) -> &str {
        if self.excerpt_offset == 0 || self.excerpt_offset > self.html.len() {
            &self.html
        } else {
            &self.html[..self.excerpt_offset]
        }
    }
}

fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// First line ending found in `src` (`\n`, `\r\n`, or `\r`); `\n` if none.
fn detect_line_ending(src: &str) -> String {
    let bytes = src.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\r' {
            return if bytes.get(i + 1) == Some(&b'\n') {
                "\r\n".to_string()
            } else {
                "\r".to_string()
            };
        }
        if b == b'\n' {
            return "\n".to_string();
        }
    }
    "\n".to_string()
}

/// Split `src` into lines, recognizing `\n`, `\r\n`, and `\r` as the line
/// boundary and dropping the terminator from each line.
fn split_lines(src: &str) -> Vec<&str> {
    let bytes = src.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&src[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&src[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&src[start..]);
    }
    lines
}

fn is_hr_line(line: &str) -> bool {
    let b = line.as_bytes();
    if b.len() < 2 {
        return false;
    }
    let marker = b[0];
    if !matches!(marker, b'*' | b'+' | b'-') {
        return false;
    }
    b.iter().all(|&x| x == marker)
}

fn is_excerpt_line(line: &str) -> bool {
    line.len() >= 2 && line.bytes().all(|b| b == b'.')
}

fn header_prefix(line: &str) -> Option<(u8, &str)> {
    let b = line.as_bytes();
    let mut i = 0usize;
    while i < b.len() && b[i] == b'#' {
        i += 1;
    }
    if i == 0 || i > 255 {
        return None;
    }
    let level = i as u8;
    if i >= b.len() || !is_ws(b[i]) {
        return None;
    }
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    let text = &line[i..];
    if text.is_empty() {
        None
    } else {
        Some((level, text))
    }
}

fn unordered_prefix(line: &str) -> Option<String> {
    let b = line.as_bytes();
    if b.is_empty() || !matches!(b[0], b'*' | b'+' | b'-') {
        return None;
    }
    let mut i = 1usize;
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    if i < 2 || i >= b.len() {
        None
    } else {
        Some(line[..i].to_string())
    }
}

fn ordered_first_prefix(line: &str) -> Option<usize> {
    let b = line.as_bytes();
    let mut i = 0usize;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 || i >= b.len() || b[i] != b'.' {
        return None;
    }
    i += 1;
    let dot_end = i;
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    if i == dot_end || i >= b.len() {
        None
    } else {
        Some(i)
    }
}

/// `<digits>.` followed by whitespace filling exactly `prefix_len` columns,
/// with no embedded space between the digits and the `.`, and at least one
/// non-whitespace byte remaining.
#[must_use]
pub fn is_ordered_list_item(s: &str, prefix_len: usize) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 || i >= bytes.len() || bytes[i] != b'.' {
        return false;
    }
    i += 1;
    while i < prefix_len && i < bytes.len() && is_ws(bytes[i]) {
        i += 1;
    }
    i == prefix_len && i < bytes.len()
}

fn blockquote_prefix(line: &str) -> String {
    let b = line.as_bytes();
    let mut i = 1usize; // past the leading '>'
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    line[..i].to_string()
}

fn code_prefix(line: &str) -> String {
    let b = line.as_bytes();
    let mut i = 0usize;
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    line[..i].to_string()
}

/// Parse one markdown-like body into HTML plus the structural metadata the
/// source parser needs. `want_excerpt`/`want_description` mirror the
/// original "pass a null output pointer to suppress" switches: a nested
/// blockquote pass suppresses both.
#[must_use]
pub fn parse(src: &str, want_excerpt: bool, want_description: bool) -> ContentParseResult {
    let line_ending = detect_line_ending(src);
    let lines = split_lines(src);
    let n = lines.len();

    let mut rv = ByteBuffer::new();
    let mut excerpt_offset = 0usize;
    let mut first_header: Option<String> = None;
    let mut description: Option<String> = None;
    let mut headers: Vec<HeaderRecord> = Vec::new();

    let mut i = 0usize;
    while i < n {
        let line = lines[i];

        if line.is_empty() {
            i += 1;
            continue;
        }

        if want_excerpt && is_excerpt_line(line) {
            let next_blank = i + 1 >= n || lines[i + 1].is_empty();
            if next_blank {
                excerpt_offset = rv.len();
                i += 1;
                continue;
            }
            // not actually a marker (no blank line follows); falls through
            // to paragraph handling below, dots included verbatim.
        }

        let first = line.as_bytes()[0];

        if let Some((level, text)) = header_prefix(line) {
            emit_header(&mut rv, level, text, &line_ending, &mut headers, &mut first_header);
            i += 1;
            continue;
        }

        if is_hr_line(line) {
            rv.push_fmt(format_args!("<hr />{line_ending}"));
            i += 1;
            continue;
        }

        if first == b'<' {
            i = parse_html(&lines, i, &mut rv, &line_ending);
            continue;
        }

        if first == b'>' {
            i = parse_blockquote(&lines, i, &mut rv, &line_ending);
            continue;
        }

        if is_ws(first) {
            i = parse_code(&lines, i, &mut rv, &line_ending);
            continue;
        }

        if unordered_prefix(line).is_some() {
            i = parse_unordered_list(&lines, i, &mut rv, &line_ending);
            continue;
        }

        if ordered_first_prefix(line).is_some() {
            i = parse_ordered_list(&lines, i, &mut rv, &line_ending);
            continue;
        }

        i = parse_paragraph(&lines, i, &mut rv, &line_ending, want_description, &mut description);
    }

    ContentParseResult {
        html: rv.into_string(),
        excerpt_offset,
        first_header,
        description,
        line_ending,
        headers,
    }
}

fn emit_header(
    rv: &mut ByteBuffer,
    level: u8,
    text: &str,
    line_ending: &str,
    headers: &mut Vec<HeaderRecord>,
    first_header: &mut Option<String>,
) {
    let parsed = parse_inline(text);
    let slug_raw = slugify(text);
    let slug = if slug_raw.is_empty() { None } else { Some(slug_raw) };
    match &slug {
        Some(s) => rv.push_fmt(format_args!("<h{level} id=\"{s}\">{parsed}</h{level}>{line_ending}")),
        None => rv.push_fmt(format_args!("<h{level}>{parsed}</h{level}>{line_ending}")),
    }
    headers.push(HeaderRecord {
        level,
        slug,
        text: text.to_string(),
    });
    if first_header.is_none() {
        *first_header = Some(text.to_string());
    }
}

fn parse_html(lines: &[&str], start: usize, rv: &mut ByteBuffer, line_ending: &str) -> usize {
    let mut i = start;
    let n = lines.len();
    let mut chunk = String::new();
    while i < n && !lines[i].is_empty() {
        if !chunk.is_empty() {
            chunk.push_str(line_ending);
        }
        chunk.push_str(lines[i]);
        i += 1;
    }
    rv.push_fmt(format_args!("{chunk}{line_ending}"));
    i
}

fn parse_blockquote(lines: &[&str], start: usize, rv: &mut ByteBuffer, line_ending: &str) -> usize {
    let prefix = blockquote_prefix(lines[start]);
    let mut i = start;
    let n = lines.len();
    let mut collected: Vec<String> = Vec::new();
    while i < n {
        match lines[i].strip_prefix(prefix.as_str()) {
            Some(rest) => {
                collected.push(rest.to_string());
                i += 1;
            }
            None => break,
        }
    }
    let mut joined = String::new();
    for l in &collected {
        joined.push_str(l);
        joined.push_str(line_ending);
    }
    let inner = parse(&joined, false, false);
    rv.push_fmt(format_args!("<blockquote>{}</blockquote>{line_ending}", inner.html));
    i
}

fn parse_code(lines: &[&str], start: usize, rv: &mut ByteBuffer, line_ending: &str) -> usize {
    let prefix = code_prefix(lines[start]);
    let mut i = start;
    let n = lines.len();
    let mut collected: Vec<&str> = Vec::new();
    while i < n {
        match lines[i].strip_prefix(prefix.as_str()) {
            Some(rest) => {
                collected.push(rest);
                i += 1;
            }
            None => break,
        }
    }
    rv.push_str("<pre><code>");
    for (idx, l) in collected.iter().enumerate() {
        let escaped = html_escape(l);
        if idx + 1 == collected.len() {
            rv.push_str(&escaped);
        } else {
            rv.push_fmt(format_args!("{escaped}{line_ending}"));
        }
    }
    rv.push_fmt(format_args!("</code></pre>{line_ending}"));
    i
}

fn parse_unordered_list(lines: &[&str], start: usize, rv: &mut ByteBuffer, line_ending: &str) -> usize {
    let prefix = unordered_prefix(lines[start]).expect("caller checked unordered_prefix");
    let blank_prefix = " ".repeat(prefix.len());
    let mut i = start;
    let n = lines.len();
    let mut items: Vec<String> = Vec::new();
    let mut current_item_lines: Vec<String> = Vec::new();

    while i < n {
        let line = lines[i];
        if let Some(rest) = line.strip_prefix(prefix.as_str()) {
            flush_item(&mut items, &mut current_item_lines, line_ending);
            current_item_lines.push(rest.to_string());
            i += 1;
        } else if line.starts_with(blank_prefix.as_str()) && !line.is_empty() {
            current_item_lines.push(line[prefix.len().min(line.len())..].to_string());
            i += 1;
        } else {
            break;
        }
    }
    flush_item(&mut items, &mut current_item_lines, line_ending);

    rv.push_fmt(format_args!("<ul>{line_ending}"));
    for item in &items {
        rv.push_fmt(format_args!("<li>{item}</li>{line_ending}"));
    }
    rv.push_fmt(format_args!("</ul>{line_ending}"));
    i
}

fn parse_ordered_list(lines: &[&str], start: usize, rv: &mut ByteBuffer, line_ending: &str) -> usize {
    let prefix_len = ordered_first_prefix(lines[start]).expect("caller checked ordered_first_prefix");
    let mut i = start;
    let n = lines.len();
    let mut items: Vec<String> = Vec::new();
    let mut current_item_lines: Vec<String> = Vec::new();

    while i < n {
        let line = lines[i];
        if is_ordered_list_item(line, prefix_len) {
            flush_item(&mut items, &mut current_item_lines, line_ending);
            current_item_lines.push(line[prefix_len..].to_string());
            i += 1;
        } else if line.len() >= prefix_len
            && line.as_bytes()[..prefix_len].iter().all(|&b| b == b' ')
        {
            current_item_lines.push(line[prefix_len..].to_string());
            i += 1;
        } else {
            break;
        }
    }
    flush_item(&mut items, &mut current_item_lines, line_ending);

    rv.push_fmt(format_args!("<ol>{line_ending}"));
    for item in &items {
        rv.push_fmt(format_args!("<li>{item}</li>{line_ending}"));
    }
    rv.push_fmt(format_args!("</ol>{line_ending}"));
    i
}

fn flush_item(items: &mut Vec<String>, current_item_lines: &mut Vec<String>, line_ending: &str) {
    if !current_item_lines.is_empty() {
        let joined = current_item_lines.join(line_ending);
        items.push(parse_inline(&joined));
        current_item_lines.clear();
    }
}

fn parse_paragraph(
    lines: &[&str],
    start: usize,
    rv: &mut ByteBuffer,
    line_ending: &str,
    want_description: bool,
    description: &mut Option<String>,
) -> usize {
    let n = lines.len();
    let mut i = start;
    let mut collected: Vec<&str> = Vec::new();
    while i < n && !lines[i].is_empty() {
        collected.push(lines[i]);
        i += 1;
    }
    let text = collected.join(line_ending);
    if want_description && description.is_none() {
        *description = Some(fix_description(&text));
    }
    let parsed = parse_inline(&text);
    rv.push_fmt(format_args!("<p>{parsed}</p>{line_ending}"));
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_emits_id_and_inline_parsed_text() {
        let r = parse("# Hello World\n", true, true);
        assert_eq!(r.html, "<h1 id=\"hello-world\">Hello World</h1>\n");
        assert_eq!(r.first_header.as_deref(), Some("Hello World"));
    }

    #[test]
    fn header_without_text_is_paragraph() {
        let r = parse("#\n", true, true);
        assert_eq!(r.html, "<p>#</p>\n");
    }

    #[test]
    fn paragraph_wraps_in_p_tags() {
        let r = parse("hello\n", true, true);
        assert_eq!(r.html, "<p>hello</p>\n");
    }

    #[test]
    fn code_block_renders_pre_code() {
        let r = parse("  code line 1\n  code line 2\n", false, false);
        assert_eq!(r.html, "<pre><code>code line 1\ncode line 2</code></pre>\n");
    }

    #[test]
    fn horizontal_rule() {
        let r = parse("---\n", false, false);
        assert_eq!(r.html, "<hr />\n");
    }

    #[test]
    fn unordered_list() {
        let r = parse("* one\n* two\n", false, false);
        assert_eq!(r.html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
    }

    #[test]
    fn ordered_list() {
        let r = parse("1. one\n2. two\n", false, false);
        assert_eq!(r.html, "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
    }

    #[test]
    fn ordered_list_rejects_space_before_dot() {
        assert!(!is_ordered_list_item("1 . foo", 4));
    }

    #[test]
    fn ordered_list_rejects_bare_marker() {
        assert!(!is_ordered_list_item("1.", 2));
        assert!(ordered_first_prefix("1.").is_none());
    }

    #[test]
    fn blockquote_reparses_inner_content() {
        let r = parse("> foo\n> bar\n", false, false);
        assert_eq!(r.html, "<blockquote><p>foo\nbar</p>\n</blockquote>\n");
    }

    #[test]
    fn html_passthrough_preserves_literal_lines() {
        let r = parse("<div>\n<p>raw</p>\n</div>\n", false, false);
        assert_eq!(r.html, "<div>\n<p>raw</p>\n</div>\n");
    }

    #[test]
    fn excerpt_marker_records_split_offset() {
        let r = parse("# T\n\nfoo\n\n...\n\nbar\n", true, false);
        assert_eq!(r.excerpt(), "<h1 id=\"t\">T</h1>\n<p>foo</p>\n");
    }

    #[test]
    fn excerpt_without_trailing_blank_is_literal() {
        let r = parse("foo\n...\nbar\n", true, false);
        assert_eq!(r.excerpt_offset, 0);
        assert!(r.html.contains("..."));
    }

    #[test]
    fn crlf_is_preserved_as_line_ending() {
        let r = parse("foo\r\nbar\r\n", false, false);
        assert_eq!(r.line_ending, "\r\n");
        assert_eq!(r.html, "<p>foo\r\nbar</p>\r\n");
    }

    #[test]
    fn description_stops_at_first_paragraph() {
        let r = parse("> only a quote\n", true, true);
        assert_eq!(r.description, None);
    }

    #[test]
    fn headers_collected_in_order() {
        let r = parse("# A\n\n## B\n", true, true);
        assert_eq!(r.headers.len(), 2);
        assert_eq!(r.headers[0].level, 1);
        assert_eq!(r.headers[1].level, 2);
    }
}
