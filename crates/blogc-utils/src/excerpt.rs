//! Shared "one-line excerpt plus a caret" formatting, used by both parser
//! error types (`SourceParseError` and `TemplateParseError`) so the two
//! crates don't duplicate the same offset-to-line/column walk.

/// A resolved line/column position plus the source line's own text.
pub struct ExcerptPosition<'a> {
    pub line: usize,
    pub column: usize,
    pub line_text: &'a str,
}

/// Resolve a byte `offset` into `input` to a 1-indexed line/column and the
/// text of the line containing it. `offset` is clamped to `input.len()`.
#[must_use]
pub fn locate(input: &str, offset: usize) -> ExcerptPosition<'_> {
    let offset = offset.min(input.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, b) in input.as_bytes().iter().enumerate() {
        if i >= offset {
            break;
        }
        if *b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let line_end = input[line_start..]
        .find('\n')
        .map_or(input.len(), |n| line_start + n);
    let line_text = &input[line_start..line_end];
    let column = offset - line_start + 1;
    ExcerptPosition {
        line,
        column,
        line_text,
    }
}

/// Render `input`'s offending line plus a caret under `offset`, e.g.:
///
/// ```text
/// TITLE = Hello
///       ^
/// ```
#[must_use]
pub fn format_excerpt(input: &str, offset: usize) -> String {
    let pos = locate(input, offset);
    let caret_col = pos.column.saturating_sub(1);
    format!("{}\n{}^", pos.line_text, " ".repeat(caret_col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_first_line() {
        let pos = locate("TITLE = Hello\nAUTHOR = Me", 6);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 7);
        assert_eq!(pos.line_text, "TITLE = Hello");
    }

    #[test]
    fn locates_second_line() {
        let pos = locate("TITLE = Hello\nAUTHOR = Me", 14);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.line_text, "AUTHOR = Me");
    }

    #[test]
    fn caret_lines_up_with_column() {
        let formatted = format_excerpt("TITLE = Hello", 6);
        let mut lines = formatted.lines();
        let text = lines.next().unwrap();
        let caret = lines.next().unwrap();
        assert_eq!(text, "TITLE = Hello");
        assert_eq!(caret.len() - 1, 6);
        assert!(caret.ends_with('^'));
    }

    #[test]
    fn offset_past_end_clamps() {
        let pos = locate("short", 999);
        assert_eq!(pos.line_text, "short");
        assert_eq!(pos.column, 6);
    }
}
