//! The content parser: translates one markdown-like body into HTML plus
//! the structural metadata (`FIRST_HEADER`, `DESCRIPTION`, excerpt split
//! offset, header list) the source parser needs to populate a source
//! entry.
//!
//! The parser never fails — malformed input always degrades to literal
//! output, per the block- and inline-grammar failure semantics.

pub mod block;
pub mod description;
pub mod entities;
pub mod inline;
pub mod slug;
pub mod toctree;

pub use block::{ContentParseResult, HeaderRecord, parse};
pub use entities::html_escape;
pub use inline::parse_inline;
pub use slug::slugify;
pub use toctree::render_toc;
