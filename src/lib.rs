//! # textanchor
//!
//! Durable text-highlight anchoring for mutable HTML documents.
//!
//! A highlight is captured from a live selection as a serializable
//! descriptor: a structural path to its container, byte offsets into that
//! container's flattened text, the exact text, and a window of surrounding
//! context. On a later visit the descriptor is re-anchored by a cascading
//! fallback search that degrades gracefully as the page drifts: exact
//! offsets first, then context matching, then nearest-occurrence search.
//!
//! The workspace splits along those seams:
//!
//! - [`dom`]: the mutable document tree (parse, flatten, select, splice);
//! - [`locator`]: the structural-path codec;
//! - [`store`]: descriptors, page sets, persistence backends, mirror sync;
//! - [`resolver`]: capture, the tier cascade, marker apply/remove.
//!
//! This crate re-exports the lot and adds [`Highlighter`], the thin driver
//! that wires a store to a live document.
//!
//! ## Example
//!
//! ```rust
//! use textanchor::{Document, Highlighter, HighlightMetadata, InMemoryStore, Selection};
//!
//! let highlighter = Highlighter::new(InMemoryStore::new());
//! let page = "https://example.com/article";
//!
//! // Capture: the user selected "world" in the live page.
//! let mut doc = Document::parse("<p>Hello world</p>");
//! let container = doc.children(doc.body().unwrap())[0];
//! let selection = Selection::from_flat_range(&doc, container, 6, 11).unwrap();
//! let saved = highlighter
//!     .save_selection(page, &mut doc, &selection, HighlightMetadata::default())
//!     .unwrap()
//!     .expect("selection is anchorable");
//!
//! // Restore: a fresh parse of the same page.
//! let mut revisit = Document::parse("<p>Hello world</p>");
//! let report = highlighter.restore_page(page, &mut revisit).unwrap();
//! assert_eq!(report.restored, 1);
//! assert!(revisit.to_html().contains(&saved.id));
//! ```

mod highlighter;

pub use highlighter::{HighlightError, Highlighter, RestoreReport};

pub use dom::{Boundary, Document, ElementData, FlatText, NodeData, NodeId, Selection};
pub use locator::{decode_path, encode_path, StructuralPath};
pub use resolver::{
    apply_marker, capture_selection, remove_marker, resolve, CaptureConfig, CapturedAnchor,
    MatchSpan, Outcome, ResolveConfig, ResolveError, Tier, TIER_CASCADE,
};
pub use store::{
    normalize_page_key, sync_page, AnchorStore, BackendConfig, HighlightDescriptor,
    HighlightMetadata, InMemoryMirror, InMemoryStore, JsonFileStore, PageHighlightSet,
    RemoteMirror, StoreError, SyncReport,
};
