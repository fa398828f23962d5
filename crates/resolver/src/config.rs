use serde::{Deserialize, Serialize};

/// Tuning for selection capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// How many characters of flattened text to keep on each side of the
    /// captured span, for later disambiguation.
    #[serde(default = "CaptureConfig::default_context_chars")]
    pub context_chars: usize,
}

impl CaptureConfig {
    pub(crate) fn default_context_chars() -> usize {
        50
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            context_chars: Self::default_context_chars(),
        }
    }
}

/// Tuning for descriptor resolution and marker markup.
///
/// Cheap to clone and serde-friendly, so embedders can ship it in their own
/// configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Context characters kept nearest the highlight by the partial-context
    /// tier: the last N of `before_context` and the first N of
    /// `after_context`.
    #[serde(default = "ResolveConfig::default_partial_context_chars")]
    pub partial_context_chars: usize,
    /// Tag of the inline wrapper element applied over matched text.
    #[serde(default = "ResolveConfig::default_marker_tag")]
    pub marker_tag: String,
    /// Attribute carrying the descriptor id on the marker element.
    #[serde(default = "ResolveConfig::default_id_attr")]
    pub id_attr: String,
    /// Attribute carrying the highlight color, when one is set.
    #[serde(default = "ResolveConfig::default_color_attr")]
    pub color_attr: String,
}

impl ResolveConfig {
    pub(crate) fn default_partial_context_chars() -> usize {
        20
    }

    pub(crate) fn default_marker_tag() -> String {
        "mark".to_string()
    }

    pub(crate) fn default_id_attr() -> String {
        "data-anchor-id".to_string()
    }

    pub(crate) fn default_color_attr() -> String {
        "data-anchor-color".to_string()
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            partial_context_chars: Self::default_partial_context_chars(),
            marker_tag: Self::default_marker_tag(),
            id_attr: Self::default_id_attr(),
            color_attr: Self::default_color_attr(),
        }
    }
}
