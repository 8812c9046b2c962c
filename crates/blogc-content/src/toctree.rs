//! Table-of-contents rendering over the header list collected during block
//! parsing. Not part of the distilled block/inline surface but present in the
//! original engine (`toctree.c`) and worth keeping: the header list is
//! already collected for free, and the compiler's own site uses nested
//! `<ul>` ToC blocks on every long-form post.

use crate::block::HeaderRecord;

/// Render `headers` into a nested `<ul>` table of contents, limited to
/// `max_depth` levels relative to the shallowest header present. Returns
/// `None` if there are no headers or `max_depth` is `0`.
///
/// Depth is relative, not absolute: a document whose only headers are `##`
/// and `###` treats `##` as depth 0, so `max_depth = 1` keeps both levels.
#[must_use]
pub fn render_toc(headers: &[HeaderRecord], max_depth: u8, line_ending: &str) -> Option<String> {
    if headers.is_empty() || max_depth == 0 {
        return None;
    }

    let lower_level = headers.iter().map(|h| h.level).min()?;

    let mut rv = String::new();
    rv.push_str("<ul>");
    rv.push_str(line_ending);

    let mut spacing: usize = 4;
    let mut current_level = lower_level;

    for h in headers {
        if h.level - lower_level >= max_depth {
            continue;
        }
        while current_level > h.level {
            spacing -= 4;
            rv.push_str(&" ".repeat(spacing));
            rv.push_str("</ul>");
            rv.push_str(line_ending);
            current_level -= 1;
        }
        while current_level < h.level {
            rv.push_str(&" ".repeat(spacing));
            rv.push_str("<ul>");
            rv.push_str(line_ending);
            current_level += 1;
            spacing += 4;
        }
        rv.push_str(&" ".repeat(spacing));
        rv.push_str("<li>");
        match &h.slug {
            Some(slug) => {
                rv.push_str("<a href=\"#");
                rv.push_str(slug);
                rv.push_str("\">");
                rv.push_str(&h.text);
                rv.push_str("</a>");
            }
            None => rv.push_str(&h.text),
        }
        rv.push_str("</li>");
        rv.push_str(line_ending);
    }

    while current_level >= lower_level {
        spacing -= 4;
        rv.push_str(&" ".repeat(spacing));
        rv.push_str("</ul>");
        rv.push_str(line_ending);
        if current_level == 0 {
            break;
        }
        current_level -= 1;
    }

    Some(rv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: u8, slug: &str, text: &str) -> HeaderRecord {
        HeaderRecord {
            level,
            slug: Some(slug.to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn flat_list_renders_single_ul() {
        let headers = vec![h(1, "a", "A"), h(1, "b", "B")];
        let toc = render_toc(&headers, 10, "\n").unwrap();
        assert_eq!(
            toc,
            "<ul>\n    <li><a href=\"#a\">A</a></li>\n    <li><a href=\"#b\">B</a></li>\n</ul>\n"
        );
    }

    #[test]
    fn nested_levels_open_and_close_uls() {
        let headers = vec![h(1, "a", "A"), h(2, "a-1", "A.1"), h(1, "b", "B")];
        let toc = render_toc(&headers, 10, "\n").unwrap();
        assert_eq!(
            toc,
            "<ul>\n    <li><a href=\"#a\">A</a></li>\n    <ul>\n        <li><a href=\"#a-1\">A.1</a></li>\n    </ul>\n    <li><a href=\"#b\">B</a></li>\n</ul>\n"
        );
    }

    #[test]
    fn max_depth_excludes_deeper_headers() {
        let headers = vec![h(1, "a", "A"), h(2, "a-1", "A.1")];
        let toc = render_toc(&headers, 1, "\n").unwrap();
        assert!(toc.contains("A"));
        assert!(!toc.contains("A.1"));
    }

    #[test]
    fn empty_headers_yield_none() {
        assert!(render_toc(&[], 10, "\n").is_none());
    }

    #[test]
    fn zero_max_depth_yields_none() {
        let headers = vec![h(1, "a", "A")];
        assert!(render_toc(&headers, 0, "\n").is_none());
    }
}
