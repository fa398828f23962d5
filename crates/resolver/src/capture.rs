use dom::{Document, NodeData, Selection};
use locator::{encode_path, StructuralPath};
use store::{HighlightDescriptor, HighlightMetadata};

use crate::config::CaptureConfig;
use crate::window::{head_chars, tail_chars};

/// The structural fields read off a live selection.
///
/// Identity (`id`, `created_at`) and user metadata are attached by
/// [`CapturedAnchor::into_descriptor`], which is usually called after the
/// surrounding system has collected comment/tags/color from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAnchor {
    pub structural_path: StructuralPath,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub before_context: String,
    pub after_context: String,
}

impl CapturedAnchor {
    pub fn into_descriptor(self, metadata: HighlightMetadata) -> HighlightDescriptor {
        HighlightDescriptor::new(
            self.structural_path.as_str(),
            self.text,
            self.start_offset,
            self.end_offset,
            self.before_context,
            self.after_context,
        )
        .with_metadata(metadata)
    }
}

/// Reads a live selection into a [`CapturedAnchor`].
///
/// Returns `None`, a normal no-op rather than an error, when the selection is
/// collapsed, covers only whitespace, sits outside any anchorable element,
/// or carries boundaries that don't land on text-node character boundaries.
///
/// The span is trimmed: offsets address the first and last non-whitespace
/// characters the user selected. Context windows are cut from the flattened
/// text at the span's actual position, so duplicate text earlier in the
/// container cannot poison them.
pub fn capture_selection(
    doc: &Document,
    selection: &Selection,
    cfg: &CaptureConfig,
) -> Option<CapturedAnchor> {
    if !doc.is_text(selection.anchor.node) || !doc.is_text(selection.focus.node) {
        return None;
    }
    let lca = doc.common_ancestor(selection.anchor.node, selection.focus.node)?;
    let container = match doc.node(lca)? {
        NodeData::Element(_) => lca,
        NodeData::Text(_) => doc.parent(lca)?,
        _ => return None,
    };
    if !doc.node(container)?.is_element() {
        return None;
    }

    let structural_path = encode_path(doc, container);
    if structural_path.is_empty() {
        return None;
    }

    let flat = doc.flat_text(container);
    let a = flat.boundary_offset(selection.anchor.node, selection.anchor.offset)?;
    let b = flat.boundary_offset(selection.focus.node, selection.focus.offset)?;
    let (mut start, end) = if a <= b { (a, b) } else { (b, a) };
    if start == end {
        return None;
    }

    let raw = &flat.text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    start += raw.len() - raw.trim_start().len();
    let end = start + trimmed.len();

    Some(CapturedAnchor {
        structural_path,
        text: trimmed.to_string(),
        start_offset: start,
        end_offset: end,
        before_context: tail_chars(&flat.text[..start], cfg.context_chars).to_string(),
        after_context: head_chars(&flat.text[end..], cfg.context_chars).to_string(),
    })
}
