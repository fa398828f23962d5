//! # Anchor Resolver (`resolver`)
//!
//! The core of highlight anchoring: turn a live selection into a durable
//! [`store::HighlightDescriptor`], and re-anchor a stored descriptor in a
//! later, possibly mutated, parse of the same page.
//!
//! ## Resolution model
//!
//! Re-anchoring is an ordered cascade of strategies ([`Tier`]), each a pure
//! function from prepared flat text to an optional match span, driven by a
//! small loop in [`resolve`]:
//!
//! 1. **idempotency**: a marker with the descriptor's id already in the
//!    document is success, so re-running on a re-render never duplicates;
//! 2. **direct offset**: the stored structural path decodes and the stored
//!    byte span still holds the exact text;
//! 3. **exact context**: the literal `before + text + after` concatenation
//!    relocated the span after offsets drifted;
//! 4. **partial context**: only the 20 characters nearest the highlight
//!    must have survived surrounding edits;
//! 5. **nearest occurrence**: bare-text search, closest start offset wins.
//!
//! Misses are outcomes, not errors: a page that mutated beyond recognition
//! is normal operation, and one descriptor's failure never affects the rest
//! of a batch.
//!
//! ## Example
//!
//! ```rust
//! use dom::{Document, Selection};
//! use resolver::{
//!     capture_selection, resolve, CaptureConfig, Outcome, ResolveConfig, Tier,
//! };
//! use store::HighlightMetadata;
//!
//! let doc = Document::parse("<p>Hello world, hello world.</p>");
//! let container = doc.children(doc.body().unwrap())[0];
//! let selection = Selection::from_flat_range(&doc, container, 19, 24).unwrap();
//!
//! let descriptor = capture_selection(&doc, &selection, &CaptureConfig::default())
//!     .unwrap()
//!     .into_descriptor(HighlightMetadata::default());
//!
//! // Four characters prepended: the direct tier misses, context relocates.
//! let mut later = Document::parse("<p>Hi! Hello world, hello world.</p>");
//! let outcome = resolve(&mut later, &descriptor, &ResolveConfig::default());
//! assert_eq!(outcome, Outcome::Marked(Tier::ContextExact));
//! ```

mod capture;
mod config;
mod engine;
mod error;
mod marker;
mod tiers;
mod window;

pub use capture::{capture_selection, CapturedAnchor};
pub use config::{CaptureConfig, ResolveConfig};
pub use engine::{resolve, Outcome};
pub use error::ResolveError;
pub use marker::{apply_marker, remove_marker};
pub use tiers::{locate, MatchSpan, SearchSpace, Tier, TIER_CASCADE};
