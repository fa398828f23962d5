use dom::{Document, NodeData, NodeId};

use crate::path::{ParsedPath, PathSegment, StructuralPath, ANCHOR_PREFIX, SEPARATOR};

/// Encodes a node's position as a [`StructuralPath`].
///
/// Text nodes are first replaced by their parent element (they have no
/// independent path). If no element results, the empty path is returned;
/// the caller must treat that as "unanchorable" and not persist it.
///
/// Climbing stops early at the nearest ancestor whose `id` attribute is
/// unique in the page; a direct `#id` reference resists sibling-index drift
/// from unrelated insertions elsewhere in the document. Ids that would not
/// survive the path syntax are skipped rather than escaped.
///
/// Pure with respect to the document; never panics.
pub fn encode_path(doc: &Document, node: NodeId) -> StructuralPath {
    let Some(mut cur) = element_or_parent(doc, node) else {
        return StructuralPath::empty();
    };
    let mut below: Vec<PathSegment> = Vec::new();
    loop {
        let Some(el) = doc.node(cur).and_then(NodeData::as_element) else {
            return StructuralPath::empty();
        };
        if let Some(id) = el.attr("id") {
            if is_usable_anchor(id) && doc.count_elements_with_attr("id", id) == 1 {
                below.reverse();
                return StructuralPath::from_parts(Some(id), &below);
            }
        }
        below.push(PathSegment {
            tag: el.tag.clone(),
            index: same_tag_index(doc, cur, &el.tag),
        });
        match doc.parent(cur) {
            Some(p) if doc.node(p).is_some_and(NodeData::is_element) => cur = p,
            _ => break,
        }
    }
    below.reverse();
    StructuralPath::from_parts(None, &below)
}

/// Resolves a path against the current document.
///
/// `None` on the empty path, a malformed path, or any unresolved step; the
/// expected case after DOM mutation, not an error.
pub fn decode_path(doc: &Document, path: &StructuralPath) -> Option<NodeId> {
    let ParsedPath { anchor, segments } = path.parse()?;
    let mut cur = match anchor {
        Some(id) => doc.element_with_attr("id", id)?,
        None => doc.root(),
    };
    for (tag, index) in segments {
        cur = nth_same_tag_child(doc, cur, tag, index)?;
    }
    doc.node(cur)?.is_element().then_some(cur)
}

fn element_or_parent(doc: &Document, node: NodeId) -> Option<NodeId> {
    match doc.node(node)? {
        NodeData::Element(_) => Some(node),
        NodeData::Text(_) | NodeData::Comment(_) => {
            let parent = doc.parent(node)?;
            doc.node(parent)?.is_element().then_some(parent)
        }
        _ => None,
    }
}

// Ids containing the path syntax would not round-trip; leave them to the
// structural form.
fn is_usable_anchor(id: &str) -> bool {
    !id.is_empty() && !id.contains(SEPARATOR) && !id.contains(ANCHOR_PREFIX) && !id.contains('[')
}

fn same_tag_index(doc: &Document, id: NodeId, tag: &str) -> usize {
    let Some(node) = doc.tree().get(id) else {
        return 1;
    };
    1 + node
        .prev_siblings()
        .filter(|s| {
            s.value()
                .as_element()
                .is_some_and(|el| el.tag == tag)
        })
        .count()
}

fn nth_same_tag_child(doc: &Document, parent: NodeId, tag: &str, index: usize) -> Option<NodeId> {
    doc.tree()
        .get(parent)?
        .children()
        .filter(|c| c.value().as_element().is_some_and(|el| el.tag == tag))
        .nth(index - 1)
        .map(|c| c.id())
}
