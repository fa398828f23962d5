use thiserror::Error;

use dom::DomError;

/// Errors from marker application.
///
/// Lookup misses (container gone, text moved, no occurrence found) are not
/// errors anywhere in this crate; the cascade reports them as an
/// unresolved outcome. These variants cover structural anomalies only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("match span does not map onto the document's text nodes")]
    SpanOutOfRange,
    #[error("document mutation failed: {0}")]
    Dom(#[from] DomError),
}
