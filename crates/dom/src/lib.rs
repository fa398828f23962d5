//! # Anchor DOM (`dom`)
//!
//! Mutable HTML document tree for highlight anchoring.
//!
//! The anchoring pipeline needs three things from a document that browser
//! DOMs give for free and read-only HTML parsers do not:
//!
//! - a **flattened text view**: all descendant text of an element joined
//!   into one coordinate space, with a table mapping offsets back to the
//!   text nodes they came from ([`FlatText`]);
//! - **selections** addressed as text-node boundaries ([`Selection`]);
//! - **surgical mutation**: splitting text nodes, cloning element shells,
//!   moving nodes by id, and re-merging adjacent text; the primitives a
//!   marker wrap/unwrap is built from ([`Document`]).
//!
//! Parsing is delegated to `scraper`; the parsed nodes are copied into an
//! `ego-tree` arena owned by [`Document`] so they can be mutated and
//! re-serialized ([`Document::to_html`]).
//!
//! This crate knows nothing about descriptors or fallback tiers; it is the
//! substrate the locator and resolver crates build on.

mod document;
mod error;
mod flatten;
mod node;
mod selection;
mod serialize;

pub use document::Document;
pub use error::DomError;
pub use flatten::{FlatText, Segment, TreeRange};
pub use node::{ElementData, NodeData};
pub use selection::{Boundary, Selection};

// Re-exported so downstream crates name node ids without depending on
// ego-tree directly.
pub use ego_tree::NodeId;
