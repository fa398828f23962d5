use thiserror::Error;

/// Errors from direct tree manipulation.
///
/// These indicate a caller bug or a stale id, not a failed anchor lookup;
/// lookup misses are `Option`/`None` throughout this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node is not in this document")]
    NodeNotFound,
    #[error("operation requires a text node")]
    NotText,
    #[error("operation requires an element")]
    NotElement,
    #[error("offset {offset} is not a valid split point in a node of {len} bytes")]
    InvalidOffset { offset: usize, len: usize },
}
