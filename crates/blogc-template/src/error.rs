use blogc_utils::excerpt::{format_excerpt, locate};
use thiserror::Error;

/// Structural errors from parsing a template. Every variant carries the
/// 1-indexed line/column of the failure plus a one-line excerpt with a caret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateParseError {
    #[error("line {line}, column {column}: unknown statement name\n{excerpt}")]
    BadStatementName {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: invalid operator\n{excerpt}")]
    BadOperator {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: unknown block type\n{excerpt}")]
    UnknownBlockType {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: blocks cannot be nested\n{excerpt}")]
    NestedBlock {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: foreach loops cannot be nested\n{excerpt}")]
    NestedForeach {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: 'endblock' without a matching 'block'\n{excerpt}")]
    UnmatchedEndBlock {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: 'else' without a matching 'if'/'ifdef'/'ifndef'\n{excerpt}")]
    UnmatchedElse {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: 'endif' without a matching 'if'/'ifdef'/'ifndef'\n{excerpt}")]
    UnmatchedEndIf {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: 'endforeach' without a matching 'foreach'\n{excerpt}")]
    UnmatchedEndForeach {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: duplicated whitespace-trim marker\n{excerpt}")]
    DuplicatedTrimMarker {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: this 'if' already has an 'else'\n{excerpt}")]
    DuplicatedElse {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: invalid variable name\n{excerpt}")]
    BadVariableName {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: unterminated quoted string\n{excerpt}")]
    UnterminatedString {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("line {line}, column {column}: statement is not closed with '%}}' or '}}}}'\n{excerpt}")]
    UnclosedStatement {
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("unclosed 'block' at end of input")]
    UnclosedBlock,

    #[error("{count} unclosed 'if'/'ifdef'/'ifndef' block(s) at end of input")]
    UnclosedIf { count: usize },

    #[error("unclosed 'foreach' at end of input")]
    UnclosedForeach,
}

impl TemplateParseError {
    pub(crate) fn bad_statement_name(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::BadStatementName {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn bad_operator(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::BadOperator {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unknown_block_type(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnknownBlockType {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn nested_block(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::NestedBlock {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn nested_foreach(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::NestedForeach {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unmatched_endblock(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnmatchedEndBlock {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unmatched_else(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnmatchedElse {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unmatched_endif(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnmatchedEndIf {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unmatched_endforeach(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnmatchedEndForeach {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn duplicated_trim_marker(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::DuplicatedTrimMarker {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn duplicated_else(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::DuplicatedElse {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn bad_variable_name(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::BadVariableName {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unterminated_string(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnterminatedString {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }

    pub(crate) fn unclosed_statement(src: &str, offset: usize) -> Self {
        let pos = locate(src, offset);
        Self::UnclosedStatement {
            line: pos.line,
            column: pos.column,
            excerpt: format_excerpt(src, offset),
        }
    }
}
