//! Structured I/O and parse-wrapping errors for the compile pass. Grounded
//! on the same `thiserror` enum shape as `SourceParseError`/
//! `TemplateParseError`: one variant per failure site, each carrying the
//! file path that was being read or written when it failed.
use std::path::PathBuf;

use thiserror::Error;

use blogc_source::SourceParseError;
use blogc_template::TemplateParseError;

/// Wraps a failure encountered while loading or writing one of the compile
/// pass's files, with the path attached so the top-level error message names
/// it without every call site having to build its own `format!` string.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("cannot read source {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse source {path}: {source}")]
    ParseSource {
        path: PathBuf,
        #[source]
        source: SourceParseError,
    },

    #[error("cannot read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template {path}: {source}")]
    ParseTemplate {
        path: PathBuf,
        #[source]
        source: TemplateParseError,
    },

    #[error("cannot write output {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
