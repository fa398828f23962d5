use ego_tree::NodeId;

use crate::document::Document;
use crate::node::NodeData;

/// One text node's slice of the flattened coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeId,
    /// Byte range `[start, end)` this node occupies in `FlatText::text`.
    pub start: usize,
    pub end: usize,
}

/// The concatenation, in document order, of every text node under a scope
/// element, plus the table mapping flat byte offsets back onto those nodes.
///
/// Flat offsets are UTF-8 byte offsets. The segment table is only valid
/// until the tree is mutated; compute it, map your span, then splice.
#[derive(Debug, Clone)]
pub struct FlatText {
    pub text: String,
    segments: Vec<Segment>,
}

/// A flat span mapped back onto tree positions: byte offsets within the
/// first and last text node it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRange {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

impl Document {
    /// Flattens every descendant text node of `scope` (inclusive order).
    /// Empty text nodes contribute nothing and get no segment.
    pub fn flat_text(&self, scope: NodeId) -> FlatText {
        let mut text = String::new();
        let mut segments = Vec::new();
        if let Some(scope_ref) = self.tree().get(scope) {
            for node in scope_ref.descendants() {
                if let NodeData::Text(t) = node.value() {
                    if t.is_empty() {
                        continue;
                    }
                    let start = text.len();
                    text.push_str(t);
                    segments.push(Segment {
                        node: node.id(),
                        start,
                        end: text.len(),
                    });
                }
            }
        }
        FlatText { text, segments }
    }
}

impl FlatText {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment containing flat offset `at` (so `start <= at < end`).
    pub fn segment_at(&self, at: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.start <= at && at < s.end)
    }

    /// Converts a (text node, byte-offset-within-node) boundary into a flat
    /// offset. `None` when the node is not part of this flat text, the
    /// offset overruns the node, or it falls inside a multi-byte character.
    pub fn boundary_offset(&self, node: NodeId, local: usize) -> Option<usize> {
        let seg = self.segments.iter().find(|s| s.node == node)?;
        if local > seg.end - seg.start {
            return None;
        }
        let flat = seg.start + local;
        self.text.is_char_boundary(flat).then_some(flat)
    }

    /// Maps a flat byte span `[start, end)` onto the text nodes it covers.
    /// `None` when the span is empty, out of range, or splits a character.
    pub fn resolve_span(&self, start: usize, end: usize) -> Option<TreeRange> {
        if start >= end || end > self.text.len() {
            return None;
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return None;
        }
        let first = self.segment_at(start)?;
        let last = self
            .segments
            .iter()
            .find(|s| s.start < end && end <= s.end)?;
        Some(TreeRange {
            start_node: first.node,
            start_offset: start - first.start,
            end_node: last.node,
            end_offset: end - last.start,
        })
    }
}
