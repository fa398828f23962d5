use dom::{FlatText, NodeId};
use serde::{Deserialize, Serialize};
use store::HighlightDescriptor;

use crate::config::ResolveConfig;
use crate::window::{head_chars, tail_chars};

/// One strategy in the resolver's ordered fallback cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Stored offsets against the decoded container, verified verbatim.
    DirectOffset,
    /// Literal `before + text + after` search.
    ContextExact,
    /// Same, with the context windows shrunk to the characters nearest the
    /// highlight, tolerating edits further out.
    ContextPartial,
    /// Bare-text search; the occurrence closest to the stored offset wins.
    NearestOccurrence,
}

/// Priority order of the cascade. The driver stops at the first tier that
/// produces a span.
pub const TIER_CASCADE: &[Tier] = &[
    Tier::DirectOffset,
    Tier::ContextExact,
    Tier::ContextPartial,
    Tier::NearestOccurrence,
];

/// A candidate match: a byte span in the search space's flattened text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// The text coordinate space one descriptor is searched in.
///
/// When the structural path still decodes, `scope` is that container and
/// `container_resolved` is true. Otherwise the text tiers fall back to the
/// whole `<body>`, and the direct-offset tier, whose offsets are container
/// relative, is skipped.
pub struct SearchSpace {
    pub scope: NodeId,
    pub flat: FlatText,
    pub container_resolved: bool,
}

/// Runs one tier. Pure with respect to the document: tiers only read the
/// prepared flat text, so each is testable in isolation and the cascade's
/// priority is data ([`TIER_CASCADE`]), not control flow.
pub fn locate(
    tier: Tier,
    space: &SearchSpace,
    desc: &HighlightDescriptor,
    cfg: &ResolveConfig,
) -> Option<MatchSpan> {
    if desc.text.is_empty() {
        return None;
    }
    match tier {
        Tier::DirectOffset => direct_offset(space, desc),
        Tier::ContextExact => {
            find_with_context(&space.flat.text, &desc.before_context, &desc.text, &desc.after_context)
        }
        Tier::ContextPartial => {
            let before = tail_chars(&desc.before_context, cfg.partial_context_chars);
            let after = head_chars(&desc.after_context, cfg.partial_context_chars);
            find_with_context(&space.flat.text, before, &desc.text, after)
        }
        Tier::NearestOccurrence => nearest_occurrence(&space.flat.text, desc),
    }
}

fn direct_offset(space: &SearchSpace, desc: &HighlightDescriptor) -> Option<MatchSpan> {
    if !space.container_resolved {
        return None;
    }
    let hay = &space.flat.text;
    let (start, end) = (desc.start_offset, desc.end_offset);
    if start >= end || end > hay.len() {
        return None;
    }
    if !hay.is_char_boundary(start) || !hay.is_char_boundary(end) {
        return None;
    }
    (&hay[start..end] == desc.text).then_some(MatchSpan { start, end })
}

fn find_with_context(hay: &str, before: &str, text: &str, after: &str) -> Option<MatchSpan> {
    let needle = format!("{before}{text}{after}");
    let start = hay.find(&needle)? + before.len();
    Some(MatchSpan {
        start,
        end: start + text.len(),
    })
}

/// Every literal occurrence is considered, overlapping ones included; the
/// winner is the start offset numerically closest to the stored one, and on
/// a distance tie the lower offset (strictly-closer comparison only).
fn nearest_occurrence(hay: &str, desc: &HighlightDescriptor) -> Option<MatchSpan> {
    let mut best: Option<(usize, usize)> = None; // (distance, start)
    let mut from = 0;
    while from <= hay.len() {
        let Some(found) = hay[from..].find(&desc.text) else {
            break;
        };
        let start = from + found;
        let distance = start.abs_diff(desc.start_offset);
        if best.map_or(true, |(b, _)| distance < b) {
            best = Some((distance, start));
        }
        match hay[start..].chars().next() {
            Some(c) => from = start + c.len_utf8(),
            None => break,
        }
    }
    best.map(|(_, start)| MatchSpan {
        start,
        end: start + desc.text.len(),
    })
}
