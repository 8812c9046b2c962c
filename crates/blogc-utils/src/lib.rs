//! Low-level, dependency-free containers and helpers shared by every other
//! crate in the workspace: the growable output buffer, the prefix-trie
//! config/source map, the ordered source list, and the excerpt+caret
//! formatting used by both parser error types.

pub mod buffer;
pub mod excerpt;
pub mod source_list;
pub mod trie;

pub use buffer::ByteBuffer;
pub use source_list::{SourceEntry, SourceList};
pub use trie::StringTrie;
