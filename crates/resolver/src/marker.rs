use dom::{Document, ElementData, FlatText, NodeData, NodeId};

use crate::config::ResolveConfig;
use crate::error::ResolveError;
use crate::tiers::MatchSpan;

/// Wraps the text covered by `span` in a single inline marker element
/// carrying the descriptor id (and color, when set) as attributes.
///
/// The span's boundary text nodes are split first, so the range becomes a
/// whole-node run. When that run already sits under one parent it is
/// wrapped in place. When it crosses element boundaries, the partially
/// covered ancestors are split into shells up to the range's common
/// ancestor (the tree-arena equivalent of extracting the range's contents
/// into a detached fragment and reinserting it wrapped), which succeeds for
/// any well-formed range.
///
/// Either the marker is fully inserted or the error is reported before any
/// content moves; the flattened text of every ancestor is identical before
/// and after.
pub fn apply_marker(
    doc: &mut Document,
    flat: &FlatText,
    span: MatchSpan,
    id: &str,
    color: Option<&str>,
    cfg: &ResolveConfig,
) -> Result<(), ResolveError> {
    let range = flat
        .resolve_span(span.start, span.end)
        .ok_or(ResolveError::SpanOutOfRange)?;

    // Node-align the range: after these splits it covers whole text nodes.
    let mut first = range.start_node;
    let mut last = range.end_node;
    let mut end_offset = range.end_offset;
    if range.start_offset > 0 {
        let tail = doc.split_text(first, range.start_offset)?;
        if first == last {
            last = tail;
            end_offset -= range.start_offset;
        }
        first = tail;
    }
    let last_len = doc.text_len(last).ok_or(ResolveError::SpanOutOfRange)?;
    if end_offset < last_len {
        doc.split_text(last, end_offset)?;
    }

    let ca = doc
        .common_ancestor(first, last)
        .ok_or(ResolveError::SpanOutOfRange)?;
    let ca = if ca == first {
        doc.parent(ca).ok_or(ResolveError::SpanOutOfRange)?
    } else {
        ca
    };

    let top_first = raise_start_boundary(doc, first, ca)?;
    let top_last = raise_end_boundary(doc, last, ca)?;
    let run = sibling_run(doc, top_first, top_last)?;

    let mut marker = ElementData::new(&cfg.marker_tag).with_attr(&cfg.id_attr, id);
    if let Some(color) = color {
        marker.set_attr(&cfg.color_attr, color);
    }
    let marker = doc.orphan(NodeData::Element(marker));
    doc.insert_node_before(top_first, marker)?;
    for node in run {
        doc.append_node(marker, node)?;
    }
    Ok(())
}

/// Unwraps every marker element carrying `id`: each is replaced by its own
/// children and the surrounding text nodes are re-merged, so the flattened
/// text returns to exactly its pre-marked form. Returns whether any marker
/// was found.
pub fn remove_marker(doc: &mut Document, id: &str, cfg: &ResolveConfig) -> bool {
    let markers = doc.elements_where(|el| el.attr(&cfg.id_attr) == Some(id));
    if markers.is_empty() {
        return false;
    }
    for marker in markers {
        let Some(parent) = doc.parent(marker) else {
            continue;
        };
        for child in doc.children(marker) {
            let _ = doc.insert_node_before(marker, child);
        }
        let _ = doc.detach(marker);
        let _ = doc.merge_adjacent_text(parent);
    }
    true
}

/// First marker element carrying `id`, if one is in the document.
pub(crate) fn find_marker(doc: &Document, id: &str, cfg: &ResolveConfig) -> Option<NodeId> {
    doc.find_element(|el| el.attr(&cfg.id_attr) == Some(id))
}

/// Moves the range-start boundary up to a direct child of `ca` by splitting
/// every partially covered ancestor: content before the boundary keeps the
/// original element, the boundary's side moves into a fresh shell.
fn raise_start_boundary(
    doc: &mut Document,
    node: NodeId,
    ca: NodeId,
) -> Result<NodeId, ResolveError> {
    let mut cur = node;
    loop {
        let parent = doc.parent(cur).ok_or(ResolveError::SpanOutOfRange)?;
        if parent == ca {
            return Ok(cur);
        }
        if doc.prev_sibling(cur).is_some() {
            let shell = doc.clone_shell(parent)?;
            let mut movers = vec![cur];
            movers.extend(doc.following_siblings(cur));
            doc.insert_node_after(parent, shell)?;
            for m in movers {
                doc.append_node(shell, m)?;
            }
            cur = shell;
        } else {
            cur = parent;
        }
    }
}

/// Mirror image of [`raise_start_boundary`] for the range end: content after
/// the boundary moves into the shell, the covered side keeps the original.
fn raise_end_boundary(doc: &mut Document, node: NodeId, ca: NodeId) -> Result<NodeId, ResolveError> {
    let mut cur = node;
    loop {
        let parent = doc.parent(cur).ok_or(ResolveError::SpanOutOfRange)?;
        if parent == ca {
            return Ok(cur);
        }
        if doc.next_sibling(cur).is_some() {
            let shell = doc.clone_shell(parent)?;
            let movers = doc.following_siblings(cur);
            doc.insert_node_after(parent, shell)?;
            for m in movers {
                doc.append_node(shell, m)?;
            }
        }
        cur = parent;
    }
}

fn sibling_run(doc: &Document, first: NodeId, last: NodeId) -> Result<Vec<NodeId>, ResolveError> {
    let mut run = vec![first];
    let mut cur = first;
    while cur != last {
        cur = doc.next_sibling(cur).ok_or(ResolveError::SpanOutOfRange)?;
        run.push(cur);
    }
    Ok(run)
}
