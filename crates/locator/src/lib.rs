//! # Anchor Locator (`locator`)
//!
//! The structural-path codec: turn an element's position in a live document
//! into a serializable string, and turn that string back into an element
//! later, possibly much later, against a page that has changed underneath
//! it.
//!
//! The codec is deliberately dumb. It does no text matching and carries no
//! fallback logic; when the tree has drifted it simply reports a miss and
//! the resolver's cascade takes over. Both directions are pure functions
//! that never panic.
//!
//! ## Example
//!
//! ```rust
//! use dom::Document;
//! use locator::{decode_path, encode_path};
//!
//! let doc = Document::parse(r#"<div id="main"><p>one</p><p>two</p></div>"#);
//! let second = doc.elements_where(|el| el.tag == "p")[1];
//!
//! let path = encode_path(&doc, second);
//! assert_eq!(path.as_str(), "#main/p[2]");
//! assert_eq!(decode_path(&doc, &path), Some(second));
//! ```

mod codec;
mod path;

pub use codec::{decode_path, encode_path};
pub use path::StructuralPath;
