use blogc_utils::ByteBuffer;

use crate::entities::{append_escaped_byte, html_escape};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Asterisk,
    AsteriskDouble,
    Underscore,
    UnderscoreDouble,
    Backticks,
    BackticksDouble,
    LinkStart,
    LinkAuto,
    LinkContent,
    LinkUrlStart,
    LinkUrl,
    ImageStart,
    ImageAlt,
    ImageUrlStart,
    ImageUrl,
    Endash,
    Emdash,
    LineBreakStart,
    LineBreak,
}

/// First occurrence of `needle` at or after `from`.
fn find(src: &[u8], from: usize, needle: u8) -> Option<usize> {
    src[from..].iter().position(|&b| b == needle).map(|i| i + from)
}

/// First occurrence of a *doubled* `needle` (e.g. `**`), returning the index
/// of the first of the pair.
fn find_double(src: &[u8], mut from: usize, needle: u8) -> Option<usize> {
    loop {
        let pos = find(src, from, needle)?;
        if pos + 1 < src.len() && src[pos + 1] == needle {
            return Some(pos);
        }
        from = pos + 1;
        if from >= src.len() {
            return None;
        }
    }
}

/// Apply the engine's inline markup grammar to `src`, producing HTML.
/// Single left-to-right pass; never fails — unbalanced constructs degrade
/// to HTML-escaped literal text.
#[must_use]
pub fn parse_inline(src: &str) -> String {
    String::from_utf8(parse_inline_bytes(src.as_bytes()))
        .expect("inline parser only ever copies valid UTF-8 and appends ASCII markup")
}

fn parse_inline_bytes(src: &[u8]) -> Vec<u8> {
    let len = src.len();
    let mut rv = ByteBuffer::with_capacity(len);
    let mut state = State::Start;

    let mut current = 0usize;
    let mut start = 0usize; // url text start, for link/image URL states
    let mut start_link = 0usize; // link/image alt-or-content text start
    let mut bracket_count = 0usize;
    let mut space_count = 0usize;
    let mut link_text: Option<Vec<u8>> = None;

    while current < len {
        let c = src[current];
        let is_last = current == len - 1;
        let mut advance = true;

        match state {
            State::Start => {
                if is_last {
                    append_escaped_byte(&mut rv, c);
                } else if c == b'\\' {
                    current += 1;
                    append_escaped_byte(&mut rv, src[current]);
                } else if c == b'*' {
                    state = State::Asterisk;
                } else if c == b'_' {
                    state = State::Underscore;
                } else if c == b'`' {
                    state = State::Backticks;
                } else if c == b'[' {
                    state = State::LinkStart;
                } else if c == b'!' {
                    state = State::ImageStart;
                } else if c == b'-' {
                    state = State::Endash;
                } else if c == b' ' {
                    state = State::LineBreakStart;
                } else {
                    append_escaped_byte(&mut rv, c);
                }
            }

            State::Asterisk => {
                if c == b'*' {
                    state = State::AsteriskDouble;
                } else {
                    match find(src, current, b'*') {
                        None => {
                            rv.push(b'*');
                            state = State::Start;
                            advance = false;
                        }
                        Some(end) => {
                            let inner = parse_inline_bytes(&src[current..end]);
                            rv.push_str("<em>");
                            rv.push_bytes(&inner);
                            rv.push_str("</em>");
                            current = end;
                            state = State::Start;
                        }
                    }
                }
            }

            State::AsteriskDouble => match find_double(src, current, b'*') {
                None => {
                    rv.push_str("**");
                    state = State::Start;
                    advance = false;
                }
                Some(end) => {
                    let inner = parse_inline_bytes(&src[current..end]);
                    rv.push_str("<strong>");
                    rv.push_bytes(&inner);
                    rv.push_str("</strong>");
                    current = end + 1;
                    state = State::Start;
                }
            },

            State::Underscore => {
                if c == b'_' {
                    state = State::UnderscoreDouble;
                } else {
                    match find(src, current, b'_') {
                        None => {
                            rv.push(b'_');
                            state = State::Start;
                            advance = false;
                        }
                        Some(end) => {
                            let inner = parse_inline_bytes(&src[current..end]);
                            rv.push_str("<em>");
                            rv.push_bytes(&inner);
                            rv.push_str("</em>");
                            current = end;
                            state = State::Start;
                        }
                    }
                }
            }

            State::UnderscoreDouble => match find_double(src, current, b'_') {
                None => {
                    rv.push_str("__");
                    state = State::Start;
                    advance = false;
                }
                Some(end) => {
                    let inner = parse_inline_bytes(&src[current..end]);
                    rv.push_str("<strong>");
                    rv.push_bytes(&inner);
                    rv.push_str("</strong>");
                    current = end + 1;
                    state = State::Start;
                }
            },

            State::Backticks => {
                if c == b'`' {
                    state = State::BackticksDouble;
                } else {
                    match find(src, current, b'`') {
                        None => {
                            rv.push(b'`');
                            state = State::Start;
                            advance = false;
                        }
                        Some(end) => {
                            let escaped = html_escape(
                                std::str::from_utf8(&src[current..end]).unwrap_or_default(),
                            );
                            rv.push_str("<code>");
                            rv.push_escaped(&escaped);
                            rv.push_str("</code>");
                            current = end;
                            state = State::Start;
                        }
                    }
                }
            }

            State::BackticksDouble => match find_double(src, current, b'`') {
                None => {
                    rv.push_str("``");
                    state = State::Start;
                    advance = false;
                }
                Some(end) => {
                    let escaped = html_escape(
                        std::str::from_utf8(&src[current..end])
                            .unwrap_or_default(),
                    );
                    rv.push_str("<code>");
                    rv.push_escaped(&escaped);
                    rv.push_str("</code>");
                    current = end + 1;
                    state = State::Start;
                }
            },

            State::LinkStart => {
                if c == b'[' {
                    state = State::LinkAuto;
                } else {
                    start_link = current;
                    bracket_count = 1;
                    state = State::LinkContent;
                }
            }

            State::LinkAuto => match find_double(src, current, b']') {
                None => {
                    rv.push_str("[[");
                    state = State::Start;
                    advance = false;
                }
                Some(end) => {
                    let text = std::str::from_utf8(&src[current..end]).unwrap_or_default();
                    rv.push_str("<a href=\"");
                    rv.push_escaped(text);
                    rv.push_str("\">");
                    rv.push_escaped(text);
                    rv.push_str("</a>");
                    current = end + 1;
                    state = State::Start;
                }
            },

            State::LinkContent => {
                if c == b'\\' {
                    current += 1;
                } else if c == b'[' {
                    bracket_count += 1;
                } else if c == b']' {
                    bracket_count -= 1;
                    if bracket_count == 0 {
                        link_text = Some(src[start_link..current].to_vec());
                        state = State::LinkUrlStart;
                    }
                }
            }

            State::LinkUrlStart => {
                if matches!(c, b' ' | b'\t' | b'\n' | b'\r') {
                    // stay
                } else if c == b'(' {
                    state = State::LinkUrl;
                    start = current + 1;
                } else {
                    rv.push(b'[');
                    state = State::Start;
                    current = start_link;
                    start_link = 0;
                    advance = false;
                }
            }

            State::LinkUrl => {
                if c == b'\\' {
                    current += 1;
                } else if c == b')' {
                    let url = std::str::from_utf8(&src[start..current]).unwrap_or_default();
                    let text = link_text.take().unwrap_or_default();
                    let inner = parse_inline_bytes(&text);
                    rv.push_str("<a href=\"");
                    rv.push_escaped(url);
                    rv.push_str("\">");
                    rv.push_bytes(&inner);
                    rv.push_str("</a>");
                    state = State::Start;
                }
            }

            State::ImageStart => {
                if c == b'[' {
                    state = State::ImageAlt;
                    start_link = current + 1;
                } else {
                    rv.push(b'!');
                    state = State::Start;
                    advance = false;
                }
            }

            State::ImageAlt => {
                if c == b'\\' {
                    current += 1;
                } else if c == b']' {
                    link_text = Some(src[start_link..current].to_vec());
                    state = State::ImageUrlStart;
                }
            }

            State::ImageUrlStart => {
                if matches!(c, b' ' | b'\t' | b'\n' | b'\r') {
                    // stay
                } else if c == b'(' {
                    state = State::ImageUrl;
                    start = current + 1;
                } else {
                    rv.push_str("![");
                    state = State::Start;
                    current = start_link;
                    start_link = 0;
                    advance = false;
                }
            }

            State::ImageUrl => {
                if c == b'\\' {
                    current += 1;
                } else if c == b')' {
                    let url = std::str::from_utf8(&src[start..current]).unwrap_or_default();
                    let alt = link_text.take().unwrap_or_default();
                    let alt = std::str::from_utf8(&alt).unwrap_or_default();
                    rv.push_str("<img src=\"");
                    rv.push_escaped(url);
                    rv.push_str("\" alt=\"");
                    rv.push_escaped(alt);
                    rv.push_str("\">");
                    state = State::Start;
                }
            }

            State::Endash => {
                if c == b'-' {
                    if is_last {
                        rv.push_str("&ndash;");
                        state = State::Start;
                    } else {
                        state = State::Emdash;
                    }
                } else {
                    rv.push(b'-');
                    state = State::Start;
                    advance = false;
                }
            }

            State::Emdash => {
                if c == b'-' {
                    rv.push_str("&mdash;");
                    state = State::Start;
                } else {
                    rv.push_str("&ndash;");
                    state = State::Start;
                    advance = false;
                }
            }

            State::LineBreakStart => {
                if c == b' ' {
                    if is_last {
                        rv.push_str("<br />");
                        state = State::Start;
                    } else {
                        space_count = 2;
                        state = State::LineBreak;
                    }
                } else {
                    rv.push(b' ');
                    state = State::Start;
                    advance = false;
                }
            }

            State::LineBreak => {
                if c == b' ' {
                    if is_last {
                        rv.push_str("<br />");
                        state = State::Start;
                    } else {
                        space_count += 1;
                    }
                } else if c == b'\n' || c == b'\r' {
                    rv.push_str("<br />");
                    rv.push(c);
                    state = State::Start;
                } else {
                    for _ in 0..space_count {
                        rv.push(b' ');
                    }
                    state = State::Start;
                    advance = false;
                }
            }
        }

        if advance {
            current += 1;
        }
    }

    // unterminated constructs at end-of-input: re-run the parser from
    // start_link, matching the reference's fallback behavior.
    match state {
        State::ImageStart | State::ImageAlt | State::ImageUrlStart | State::ImageUrl => {
            rv.push(b'!');
            let tail = parse_inline_bytes(&src[start_link..]);
            rv.push(b'[');
            rv.push_escaped(std::str::from_utf8(&tail).unwrap_or_default());
        }
        State::LinkContent | State::LinkUrlStart | State::LinkUrl => {
            let tail = parse_inline_bytes(&src[start_link..]);
            rv.push(b'[');
            rv.push_escaped(std::str::from_utf8(&tail).unwrap_or_default());
        }
        _ => {}
    }

    rv.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(parse_inline("*a*"), "<em>a</em>");
        assert_eq!(parse_inline("**a**"), "<strong>a</strong>");
        assert_eq!(parse_inline("_a_"), "<em>a</em>");
        assert_eq!(parse_inline("__a__"), "<strong>a</strong>");
    }

    #[test]
    fn inline_code_is_escaped() {
        assert_eq!(parse_inline("`a<b`"), "<code>a&lt;b</code>");
    }

    #[test]
    fn link_reparses_text() {
        assert_eq!(
            parse_inline("[foo](bar)"),
            r#"<a href="bar">foo</a>"#
        );
        assert_eq!(
            parse_inline("[*foo*](bar)"),
            r#"<a href="bar"><em>foo</em></a>"#
        );
    }

    #[test]
    fn autolink() {
        assert_eq!(
            parse_inline("[[http://example.com]]"),
            r#"<a href="http://example.com">http://example.com</a>"#
        );
    }

    #[test]
    fn image() {
        assert_eq!(
            parse_inline("![alt](src.png)"),
            r#"<img src="src.png" alt="alt">"#
        );
    }

    #[test]
    fn dashes() {
        assert_eq!(parse_inline("a--b"), "a&ndash;b");
        assert_eq!(parse_inline("a---b"), "a&mdash;b");
    }

    #[test]
    fn trailing_double_space_is_line_break() {
        assert_eq!(parse_inline("a  \nb"), "a<br />\nb");
    }

    #[test]
    fn escape_sequence_is_literal() {
        assert_eq!(parse_inline(r"\*not em\*"), "*not em*");
    }

    #[test]
    fn unmatched_opener_escapes_literal() {
        assert_eq!(parse_inline("*foo"), "*foo");
        assert_eq!(parse_inline("a < b"), "a &lt; b");
    }

    #[test]
    fn plain_text_is_html_escaped() {
        assert_eq!(parse_inline("a & b"), "a &amp; b");
    }
}
