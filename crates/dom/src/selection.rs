use ego_tree::NodeId;

use crate::document::Document;

/// One end of a selection: a byte offset inside a text node.
///
/// Offsets are UTF-8 byte offsets within that node's content; `offset` may
/// equal the node's length (a boundary after the last character).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A live text selection: anchor and focus boundaries, in whatever order the
/// user dragged them. Capture orders them by flattened position, so a
/// backwards drag behaves the same as a forwards one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Boundary,
    pub focus: Boundary,
}

impl Selection {
    pub fn new(anchor: Boundary, focus: Boundary) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed (caret) selection.
    pub fn caret(at: Boundary) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Builds a selection covering flat byte offsets `[start, end)` of
    /// `container`'s flattened text. Intended for embedders and tests that
    /// address text positionally rather than via pointer events.
    pub fn from_flat_range(
        doc: &Document,
        container: NodeId,
        start: usize,
        end: usize,
    ) -> Option<Selection> {
        let flat = doc.flat_text(container);
        if start > end || end > flat.len() {
            return None;
        }
        let a = flat.segment_at(start)?;
        let anchor = Boundary::new(a.node, start - a.start);
        if start == end {
            return Some(Selection::caret(anchor));
        }
        let f = flat
            .segments()
            .iter()
            .find(|s| s.start < end && end <= s.end)?;
        Some(Selection::new(anchor, Boundary::new(f.node, end - f.start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_flat_range_lands_in_the_right_nodes() {
        let doc = Document::parse("<p>one <i>two</i> three</p>");
        let p = doc.children(doc.body().unwrap())[0];
        let flat = doc.flat_text(p);
        let sel = Selection::from_flat_range(&doc, p, 4, 7).unwrap();
        assert_eq!(sel.anchor.node, flat.segments()[1].node);
        assert_eq!(sel.anchor.offset, 0);
        assert_eq!(sel.focus.node, flat.segments()[1].node);
        assert_eq!(sel.focus.offset, 3);
    }

    #[test]
    fn from_flat_range_collapsed_is_a_caret() {
        let doc = Document::parse("<p>abc</p>");
        let p = doc.children(doc.body().unwrap())[0];
        let sel = Selection::from_flat_range(&doc, p, 1, 1).unwrap();
        assert_eq!(sel.anchor, sel.focus);
    }

    #[test]
    fn from_flat_range_out_of_range_is_none() {
        let doc = Document::parse("<p>abc</p>");
        let p = doc.children(doc.body().unwrap())[0];
        assert!(Selection::from_flat_range(&doc, p, 0, 9).is_none());
    }
}
