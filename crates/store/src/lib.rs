//! # Anchor Store (`store`)
//!
//! The persisted side of highlight anchoring: the descriptor data model,
//! page-keyed collections, pluggable storage backends, and last-write-wins
//! mirroring to a remote store.
//!
//! ## Core Types
//!
//! - [`HighlightDescriptor`]: the serializable record identifying one
//!   highlight's text and location. Its JSON field names are the contract
//!   every collaborator round-trips.
//! - [`PageHighlightSet`]: one normalized page key, many descriptors, in
//!   insertion order.
//! - [`AnchorStore`]: the persistence-collaborator trait
//!   (`get`/`set`/`delete`/`list_keys`), with [`InMemoryStore`] and
//!   [`JsonFileStore`] backends selected by [`BackendConfig`].
//! - [`RemoteMirror`] + [`sync_page`]: merge one page's descriptors with a
//!   remote copy, newest edit winning per descriptor id.
//!
//! Resolution logic lives elsewhere; this crate never inspects a document.
//!
//! ## Example
//!
//! ```rust
//! use store::{
//!     normalize_page_key, AnchorStore, HighlightDescriptor, InMemoryStore, PageHighlightSet,
//! };
//!
//! let store = InMemoryStore::new();
//! let key = normalize_page_key("https://example.com/article#intro");
//!
//! let mut set = PageHighlightSet::new(key.clone());
//! set.add(HighlightDescriptor::new(
//!     "#content/p[2]",
//!     "the interesting part",
//!     120,
//!     140,
//!     "context before ",
//!     " context after",
//! ))
//! .unwrap();
//! store.set(&key, &set).unwrap();
//!
//! assert_eq!(store.get(&key).unwrap().unwrap().len(), 1);
//! ```

mod backend;
mod descriptor;
mod error;
mod page;
mod sync;

pub use backend::{AnchorStore, BackendConfig, InMemoryStore, JsonFileStore};
pub use descriptor::{HighlightDescriptor, HighlightMetadata};
pub use error::StoreError;
pub use page::{normalize_page_key, PageHighlightSet};
pub use sync::{sync_page, InMemoryMirror, RemoteMirror, SyncReport};
