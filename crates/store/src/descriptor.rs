use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The unit of persisted state: everything needed to re-find one highlight.
///
/// The serialized field names below are the wire contract; collaborators
/// that mirror descriptors must round-trip them byte-for-byte. Unknown extra
/// fields are tolerated on input and absent optionals are omitted on output.
///
/// Structural fields (`text`, `structural_path`, the offsets and the two
/// context windows) are written once at capture and never updated; a stale
/// descriptor is re-anchored by the resolver's fallback cascade, not by
/// rewriting it. Only the user metadata (`comment`, `tags`, `color`) is
/// mutable, via [`HighlightDescriptor::update_metadata`].
///
/// `start_offset`/`end_offset` are UTF-8 byte offsets, half-open
/// `[start, end)`, into the flattened text of the container element named by
/// `structural_path` as it was at capture time. `text` equals that substring
/// at capture time; the equality is allowed to become false once the page
/// mutates. The context windows hold up to 50 characters of flattened text
/// on each side and are used only for disambiguation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightDescriptor {
    pub id: String,
    pub text: String,
    pub structural_path: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub before_context: String,
    pub after_context: String,
    pub created_at: DateTime<Utc>,
    /// Touched on metadata edits; drives last-write-wins merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// User-supplied metadata, irrelevant to resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightMetadata {
    pub comment: Option<String>,
    pub tags: Vec<String>,
    pub color: Option<String>,
}

impl HighlightDescriptor {
    /// Builds a descriptor from captured structural fields, generating the
    /// id and timestamp. Metadata starts empty.
    pub fn new(
        structural_path: impl Into<String>,
        text: impl Into<String>,
        start_offset: usize,
        end_offset: usize,
        before_context: impl Into<String>,
        after_context: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            structural_path: structural_path.into(),
            start_offset,
            end_offset,
            before_context: before_context.into(),
            after_context: after_context.into(),
            created_at: Utc::now(),
            updated_at: None,
            comment: None,
            tags: Vec::new(),
            color: None,
        }
    }

    /// Attaches initial metadata without touching `updated_at`.
    pub fn with_metadata(mut self, metadata: HighlightMetadata) -> Self {
        self.comment = metadata.comment;
        self.tags = metadata.tags;
        self.color = metadata.color;
        self
    }

    /// Replaces the mutable metadata and stamps `updated_at`.
    pub fn update_metadata(&mut self, metadata: HighlightMetadata) {
        self.comment = metadata.comment;
        self.tags = metadata.tags;
        self.color = metadata.color;
        self.updated_at = Some(Utc::now());
    }

    /// The timestamp last-write-wins merging compares.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
