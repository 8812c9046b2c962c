use blogc_utils::excerpt::{format_excerpt, locate};
use thiserror::Error;

/// Structural errors from parsing a source file's preamble/body. Every
/// variant carries the 1-indexed line/column of the failure plus a one-line
/// excerpt with a caret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceParseError {
    #[error("source file is empty")]
    Empty,

    #[error("line {line}, column {column}: configuration key is missing ':' and a value\n{excerpt}")]
    NoColon {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: '{key}' is a reserved variable, it is set by the compiler\n{excerpt}")]
    Reserved {
        line: usize,
        column: usize,
        key: String,
        excerpt: String,
    },

    #[error("line {line}, column {column}: invalid configuration key\n{excerpt}")]
    BadKey {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error(
        "line {line}, column {column}: invalid content separator, must be two or more '-' characters\n{excerpt}"
    )]
    BadSeparator {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: unexpected end of file\n{excerpt}")]
    Truncated {
        line: usize,
        column: usize,
        excerpt: String,
    },
}

impl SourceParseError {
    pub(crate) fn no_colon(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::NoColon {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn reserved(src: &str, offset: usize, key: &str) -> Self {
        let pos = locate(src, offset);
        Self::Reserved {
            line: pos.line,
            column: pos.column,
            key: key.to_string(),
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn bad_key(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::BadKey {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn bad_separator(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::BadSeparator {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn truncated(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::Truncated {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }
}
