use std::fmt;

use serde::{Deserialize, Serialize};

/// A serialized root-to-element walk.
///
/// Two forms, chosen at encode time:
///
/// - **direct**: `#content`: the element (or the nearest ancestor) carries a
///   page-unique `id` attribute; segments below that ancestor follow, as in
///   `#content/div[2]/p[1]`. Preferred because it survives sibling-index
///   drift caused by unrelated insertions elsewhere on the page.
/// - **structural**: `html[1]/body[1]/div[2]/p[1]`: `(tag, n)` pairs from
///   the document root down, where `n` is the 1-based index among preceding
///   siblings *of the same tag*.
///
/// The empty path means "unanchorable" and must never be persisted.
///
/// Re-walking an unchanged tree always yields the same element; against a
/// mutated tree the walk degrades to a lookup miss, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuralPath(String);

pub(crate) const SEPARATOR: char = '/';
pub(crate) const ANCHOR_PREFIX: char = '#';

/// One `(tag, same-tag-index)` step of a structural walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathSegment {
    pub tag: String,
    pub index: usize,
}

/// A syntactically valid path, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedPath<'a> {
    pub anchor: Option<&'a str>,
    pub segments: Vec<(&'a str, usize)>,
}

impl StructuralPath {
    pub fn empty() -> Self {
        StructuralPath(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_parts(anchor: Option<&str>, segments: &[PathSegment]) -> Self {
        let mut out = String::new();
        if let Some(id) = anchor {
            out.push(ANCHOR_PREFIX);
            out.push_str(id);
        }
        for seg in segments {
            if !out.is_empty() {
                out.push(SEPARATOR);
            }
            out.push_str(&seg.tag);
            out.push('[');
            out.push_str(&seg.index.to_string());
            out.push(']');
        }
        StructuralPath(out)
    }

    /// `None` for the empty path or any malformed input; decoding treats
    /// both as a lookup miss.
    pub(crate) fn parse(&self) -> Option<ParsedPath<'_>> {
        if self.0.is_empty() {
            return None;
        }
        let mut anchor = None;
        let mut rest = self.0.as_str();
        if let Some(stripped) = rest.strip_prefix(ANCHOR_PREFIX) {
            match stripped.split_once(SEPARATOR) {
                Some((id, tail)) => {
                    if id.is_empty() {
                        return None;
                    }
                    anchor = Some(id);
                    rest = tail;
                }
                None => {
                    if stripped.is_empty() {
                        return None;
                    }
                    return Some(ParsedPath {
                        anchor: Some(stripped),
                        segments: Vec::new(),
                    });
                }
            }
        }
        let mut segments = Vec::new();
        for part in rest.split(SEPARATOR) {
            let (tag, idx) = part.split_once('[')?;
            let idx = idx.strip_suffix(']')?;
            let index: usize = idx.parse().ok()?;
            if tag.is_empty() || index == 0 {
                return None;
            }
            segments.push((tag, index));
        }
        Some(ParsedPath { anchor, segments })
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StructuralPath {
    fn from(value: String) -> Self {
        StructuralPath(value)
    }
}

impl From<&str> for StructuralPath {
    fn from(value: &str) -> Self {
        StructuralPath(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(tag: &str, index: usize) -> PathSegment {
        PathSegment {
            tag: tag.to_string(),
            index,
        }
    }

    #[test]
    fn formats_structural_and_direct_forms() {
        let path = StructuralPath::from_parts(None, &[seg("html", 1), seg("body", 1), seg("p", 2)]);
        assert_eq!(path.as_str(), "html[1]/body[1]/p[2]");

        let path = StructuralPath::from_parts(Some("main"), &[seg("p", 2)]);
        assert_eq!(path.as_str(), "#main/p[2]");

        let path = StructuralPath::from_parts(Some("main"), &[]);
        assert_eq!(path.as_str(), "#main");
    }

    #[test]
    fn parse_round_trips() {
        let path = StructuralPath::from("#main/div[2]/p[1]");
        let parsed = path.parse().unwrap();
        assert_eq!(parsed.anchor, Some("main"));
        assert_eq!(parsed.segments, vec![("div", 2), ("p", 1)]);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["", "#", "div", "div[0]", "div[x]", "div[1", "[1]", "#/p[1]"] {
            assert!(StructuralPath::from(bad).parse().is_none(), "{bad:?}");
        }
    }
}
