use tracing::{debug, warn};

use dom::Document;
use locator::{decode_path, StructuralPath};
use store::HighlightDescriptor;

use crate::config::ResolveConfig;
use crate::marker::{apply_marker, find_marker};
use crate::tiers::{locate, SearchSpace, Tier, TIER_CASCADE};

#[cfg(test)]
mod tests;

/// Result of resolving one descriptor against a live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A marker with this descriptor's id was already in the document;
    /// nothing was applied again.
    AlreadyMarked,
    /// The text was found by the given tier and a marker was applied.
    Marked(Tier),
    /// Every tier missed (or marking failed); the document is unchanged.
    Unresolved,
}

impl Outcome {
    /// The boolean view: is the highlight present in the document now?
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Outcome::Unresolved)
    }
}

/// Re-anchors one stored descriptor in a live document and applies its
/// marker.
///
/// The cascade, in priority order:
///
/// 1. idempotency: a marker with this id already present counts as success;
/// 2. [`Tier::DirectOffset`] against the decoded container;
/// 3. [`Tier::ContextExact`], 4. [`Tier::ContextPartial`],
///    5. [`Tier::NearestOccurrence`].
///
/// The text tiers search the decoded container first and the whole `<body>`
/// second. The widening covers both ways a structural path goes stale: it
/// stops decoding entirely, or, after a same-tag sibling insertion shifts
/// the index, it decodes to the *wrong* element, whose text knows nothing
/// of the descriptor.
///
/// The first tier to produce a span is terminal. An unresolved descriptor
/// leaves the document untouched; it is reported, not raised, because a
/// mutable page that drifted too far is normal operation.
pub fn resolve(doc: &mut Document, desc: &HighlightDescriptor, cfg: &ResolveConfig) -> Outcome {
    if find_marker(doc, &desc.id, cfg).is_some() {
        debug!(id = %desc.id, "marker already present");
        return Outcome::AlreadyMarked;
    }

    let path = StructuralPath::from(desc.structural_path.as_str());
    let container = decode_path(doc, &path);
    let fallback_scope = doc.body().or_else(|| doc.find_element(|_| true));

    let mut spaces: Vec<SearchSpace> = Vec::with_capacity(2);
    if let Some(scope) = container {
        spaces.push(SearchSpace {
            scope,
            flat: doc.flat_text(scope),
            container_resolved: true,
        });
    }
    if let Some(scope) = fallback_scope {
        if container != Some(scope) {
            spaces.push(SearchSpace {
                scope,
                flat: doc.flat_text(scope),
                container_resolved: false,
            });
        }
    }
    if spaces.is_empty() {
        return Outcome::Unresolved;
    }

    for &tier in TIER_CASCADE {
        for space in &spaces {
            let Some(span) = locate(tier, space, desc, cfg) else {
                continue;
            };
            match apply_marker(doc, &space.flat, span, &desc.id, desc.color.as_deref(), cfg) {
                Ok(()) => {
                    debug!(id = %desc.id, ?tier, start = span.start, "anchored");
                    return Outcome::Marked(tier);
                }
                Err(err) => {
                    warn!(id = %desc.id, %err, "match found but marking failed");
                    return Outcome::Unresolved;
                }
            }
        }
    }
    debug!(id = %desc.id, "no tier matched");
    Outcome::Unresolved
}
