//! The source parser: splits a source file into a preamble of `KEY: value`
//! pairs and a body, validates the preamble against the reserved-key set,
//! and delegates the body to `blogc_content::parse`.

pub mod error;

use blogc_content::{ContentParseResult, render_toc};
use blogc_utils::SourceEntry;

pub use error::SourceParseError;

/// Keys the compiler sets itself; a source preamble may not define them.
pub const RESERVED_KEYS: &[&str] = &[
    "FILENAME",
    "CONTENT",
    "DATE_FORMATTED",
    "DATE_FIRST_FORMATTED",
    "DATE_LAST_FORMATTED",
    "PAGE_FIRST",
    "PAGE_PREVIOUS",
    "PAGE_CURRENT",
    "PAGE_NEXT",
    "PAGE_LAST",
    "BLOGC_VERSION",
];

/// `true` iff `key` matches `[A-Z][A-Z0-9_]*`, the preamble config-key
/// grammar shared by the source and template parsers.
#[must_use]
pub fn is_valid_config_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_uppercase() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

fn is_ws_or_nl(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_key_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

/// Options controlling the supplemented table-of-contents insertion
/// `None` disables ToC generation
/// entirely, matching the "insert only if the body yields it" rule used
/// for `FIRST_HEADER`/`DESCRIPTION`.
#[derive(Clone, Copy, Debug)]
pub struct TocOptions {
    pub max_depth: u8,
}

/// Parse one source file's bytes into a [`SourceEntry`].
///
/// `filename` is the caller-supplied file name used to derive the
/// `FILENAME` key (extension dropped, path prefix removed).
///
/// # Errors
///
/// Returns a [`SourceParseError`] describing the first structural problem
/// encountered in the preamble or separator. The content parser itself
/// never fails, so once the separator is found,
/// parsing cannot fail.
pub fn parse(src: &str, filename: &str, toc: Option<TocOptions>) -> Result<SourceEntry, SourceParseError> {
    if src.is_empty() {
        return Err(SourceParseError::Empty);
    }

    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut pos = 0usize;
    let mut entry = SourceEntry::new();

    // Step 1: skip leading whitespace lines.
    while pos < len && is_ws_or_nl(bytes[pos]) {
        pos += 1;
    }

    if pos >= len {
        // Nothing but whitespace: treat the same as an empty file, matching
        // the reference parser's "state stays START, trie empty" fallback.
        return Err(SourceParseError::Empty);
    }

    // Step 2: repeated `KEY: value` pairs, until the separator line begins.
    loop {
        if pos >= len {
            return Err(SourceParseError::truncated(src, pos));
        }
        if bytes[pos] == b'-' {
            break;
        }

        let key_start = pos;
        while pos < len && is_key_char(bytes[pos]) {
            pos += 1;
        }
        if pos >= len {
            return Err(SourceParseError::truncated(src, pos));
        }
        let key = &src[key_start..pos];
        if !is_valid_config_key(key) {
            return Err(SourceParseError::bad_key(src, key_start));
        }
        if bytes[pos] != b':' {
            if is_ws_or_nl(bytes[pos]) {
                return Err(SourceParseError::no_colon(src, pos));
            }
            return Err(SourceParseError::bad_key(src, pos));
        }
        pos += 1; // past ':'

        if RESERVED_KEYS.contains(&key) {
            return Err(SourceParseError::reserved(src, key_start, key));
        }

        let value_start = pos;
        while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
            pos += 1;
        }
        if pos >= len {
            return Err(SourceParseError::truncated(src, pos));
        }
        let value = src[value_start..pos].trim().to_string();
        entry.insert(key, value);

        // consume the line ending (\n, \r\n, or \r).
        if bytes[pos] == b'\r' {
            pos += 1;
            if pos < len && bytes[pos] == b'\n' {
                pos += 1;
            }
        } else {
            pos += 1;
        }

        // skip any further blank lines before the next key or separator.
        while pos < len && is_ws_or_nl(bytes[pos]) {
            pos += 1;
        }
    }

    // Step 3: separator line of two or more '-' then a line ending.
    let sep_start = pos;
    let mut dashes = 0usize;
    while pos < len && bytes[pos] == b'-' {
        dashes += 1;
        pos += 1;
    }
    if pos >= len {
        return Err(SourceParseError::truncated(src, pos));
    }
    if bytes[pos] != b'\n' && bytes[pos] != b'\r' {
        return Err(SourceParseError::bad_separator(src, sep_start));
    }
    if dashes < 2 {
        return Err(SourceParseError::bad_separator(src, sep_start));
    }
    if bytes[pos] == b'\r' {
        pos += 1;
        if pos < len && bytes[pos] == b'\n' {
            pos += 1;
        }
    } else {
        pos += 1;
    }

    // Step 4: optional blank lines, then the body runs to end-of-input.
    while pos < len && is_ws_or_nl(bytes[pos]) {
        pos += 1;
    }
    let body = &src[pos..];

    let want_first_header = !entry.contains_key("FIRST_HEADER");
    let want_description = !entry.contains_key("DESCRIPTION");
    let parsed: ContentParseResult = blogc_content::parse(body, true, want_description);

    entry.insert("FILENAME", strip_filename(filename));
    entry.insert("RAW_CONTENT", body.to_string());
    entry.insert("CONTENT", parsed.html.clone());
    entry.insert("EXCERPT", parsed.excerpt().to_string());

    if want_first_header {
        if let Some(h) = &parsed.first_header {
            entry.insert("FIRST_HEADER", h.clone());
        }
    }
    if want_description {
        if let Some(d) = &parsed.description {
            entry.insert("DESCRIPTION", d.clone());
        }
    }

    if let Some(opts) = toc {
        if !entry.contains_key("TOC") {
            if let Some(t) = render_toc(&parsed.headers, opts.max_depth, &parsed.line_ending) {
                entry.insert("TOC", t);
            }
        }
    }

    Ok(entry)
}

/// Strip any path prefix and the final extension from `filename`, matching
/// the `FILENAME` derivation rule.
#[must_use]
pub fn strip_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    match base.rfind('.') {
        Some(0) => base.to_string(), // dotfile with no other '.' keeps its name
        Some(idx) => base[..idx].to_string(),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_source_parses() {
        let entry = parse("TITLE: Hi\n---\n# Hello\n\nworld\n", "post.txt", None).unwrap();
        assert_eq!(entry.get("TITLE").map(String::as_str), Some("Hi"));
        assert_eq!(entry.get("FILENAME").map(String::as_str), Some("post"));
        assert_eq!(
            entry.get("FIRST_HEADER").map(String::as_str),
            Some("Hello")
        );
        assert!(entry.get("CONTENT").unwrap().contains("<h1"));
    }

    #[test]
    fn empty_file_errors() {
        assert_eq!(parse("", "a.txt", None), Err(SourceParseError::Empty));
    }

    #[test]
    fn missing_colon_errors() {
        let err = parse("TITLE Hi\n---\nbody\n", "a.txt", None).unwrap_err();
        assert!(matches!(err, SourceParseError::NoColon { .. }));
    }

    #[test]
    fn reserved_key_errors() {
        let err = parse("FILENAME: x\n---\nbody\n", "a.txt", None).unwrap_err();
        assert!(matches!(err, SourceParseError::Reserved { .. }));
    }

    #[test]
    fn short_separator_errors() {
        let err = parse("TITLE: x\n-\nbody\n", "a.txt", None).unwrap_err();
        assert!(matches!(err, SourceParseError::BadSeparator { .. }));
    }

    #[test]
    fn bad_key_errors_on_lowercase_or_digit_led_key() {
        assert!(matches!(
            parse("title: x\n---\nbody\n", "a.txt", None).unwrap_err(),
            SourceParseError::BadKey { .. }
        ));
        assert!(matches!(
            parse("1TITLE: x\n---\nbody\n", "a.txt", None).unwrap_err(),
            SourceParseError::BadKey { .. }
        ));
    }

    #[test]
    fn is_valid_config_key_matches_grammar() {
        assert!(is_valid_config_key("TITLE"));
        assert!(is_valid_config_key("TITLE_2"));
        assert!(!is_valid_config_key(""));
        assert!(!is_valid_config_key("title"));
        assert!(!is_valid_config_key("2TITLE"));
        assert!(!is_valid_config_key("TITLE-2"));
    }

    #[test]
    fn user_supplied_first_header_wins() {
        let entry = parse(
            "FIRST_HEADER: Custom\n---\n# Real Header\n",
            "a.txt",
            None,
        )
        .unwrap();
        assert_eq!(
            entry.get("FIRST_HEADER").map(String::as_str),
            Some("Custom")
        );
    }

    #[test]
    fn empty_value_is_allowed() {
        let entry = parse("TITLE: \n---\nbody\n", "a.txt", None).unwrap();
        assert_eq!(entry.get("TITLE").map(String::as_str), Some(""));
    }

    #[test]
    fn filename_strips_extension_and_path() {
        assert_eq!(strip_filename("content/posts/hello.txt"), "hello");
        assert_eq!(strip_filename("hello"), "hello");
        assert_eq!(strip_filename(".gitignore"), ".gitignore");
    }

    #[test]
    fn excerpt_without_marker_equals_content() {
        let entry = parse("TITLE: x\n---\nfoo\n", "a.txt", None).unwrap();
        assert_eq!(entry.get("EXCERPT"), entry.get("CONTENT"));
    }

    #[test]
    fn toc_inserted_when_requested_and_headers_present() {
        let entry = parse(
            "TITLE: x\n---\n# A\n\n## B\n",
            "a.txt",
            Some(TocOptions { max_depth: 10 }),
        )
        .unwrap();
        assert!(entry.get("TOC").unwrap().contains("<ul>"));
    }
}
