use serde::{Deserialize, Serialize};
use url::Url;

use crate::descriptor::{HighlightDescriptor, HighlightMetadata};
use crate::error::StoreError;

/// Everything highlighted on one page, in insertion order.
///
/// Insertion order is bookkeeping, not semantics: each descriptor resolves
/// independently, so restore order never affects correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHighlightSet {
    pub page_key: String,
    pub highlights: Vec<HighlightDescriptor>,
}

impl PageHighlightSet {
    pub fn new(page_key: impl Into<String>) -> Self {
        Self {
            page_key: page_key.into(),
            highlights: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightDescriptor> {
        self.highlights.iter()
    }

    pub fn get(&self, id: &str) -> Option<&HighlightDescriptor> {
        self.highlights.iter().find(|d| d.id == id)
    }

    /// Appends a descriptor; ids must be unique within the set.
    pub fn add(&mut self, descriptor: HighlightDescriptor) -> Result<(), StoreError> {
        if self.get(&descriptor.id).is_some() {
            return Err(StoreError::DuplicateId(descriptor.id));
        }
        self.highlights.push(descriptor);
        Ok(())
    }

    /// Removes by id, returning the removed descriptor.
    pub fn remove(&mut self, id: &str) -> Option<HighlightDescriptor> {
        let at = self.highlights.iter().position(|d| d.id == id)?;
        Some(self.highlights.remove(at))
    }

    /// Metadata-only edit; structural fields stay untouched. Returns whether
    /// the id was present.
    pub fn update_metadata(&mut self, id: &str, metadata: HighlightMetadata) -> bool {
        match self.highlights.iter_mut().find(|d| d.id == id) {
            Some(d) => {
                d.update_metadata(metadata);
                true
            }
            None => false,
        }
    }
}

/// Normalizes a page URL into the key its highlights are stored under.
///
/// The fragment never changes which document is served, so it is dropped;
/// the query usually does, so it is kept. `Url` itself lowercases the scheme
/// and host and drops default ports. Input that does not parse as a URL is
/// used as-is (trimmed), so opaque test keys still work.
pub fn normalize_page_key(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.into()
        }
        Err(_) => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn desc(text: &str) -> HighlightDescriptor {
        HighlightDescriptor::new("html[1]", text, 0, text.len(), "", "")
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut set = PageHighlightSet::new("k");
        let d = desc("a");
        set.add(d.clone()).unwrap();
        assert!(matches!(set.add(d), Err(StoreError::DuplicateId(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_returns_the_descriptor() {
        let mut set = PageHighlightSet::new("k");
        let d = desc("a");
        let id = d.id.clone();
        set.add(d).unwrap();
        assert_eq!(set.remove(&id).map(|d| d.text), Some("a".to_string()));
        assert!(set.is_empty());
        assert!(set.remove(&id).is_none());
    }

    #[test]
    fn update_metadata_only_touches_metadata() {
        let mut set = PageHighlightSet::new("k");
        let d = desc("a");
        let id = d.id.clone();
        let offsets = (d.start_offset, d.end_offset);
        set.add(d).unwrap();
        assert!(set.update_metadata(
            &id,
            HighlightMetadata {
                color: Some("green".into()),
                ..Default::default()
            },
        ));
        let d = set.get(&id).unwrap();
        assert_eq!(d.color.as_deref(), Some("green"));
        assert_eq!((d.start_offset, d.end_offset), offsets);
        assert!(!set.update_metadata("missing", HighlightMetadata::default()));
    }

    #[test]
    fn page_keys_drop_fragments_and_default_ports() {
        assert_eq!(
            normalize_page_key("HTTPS://Example.com:443/a/b?q=1#section-3"),
            "https://example.com/a/b?q=1"
        );
        assert_eq!(
            normalize_page_key("https://example.com"),
            "https://example.com/"
        );
    }

    #[test]
    fn page_keys_keep_distinct_queries_distinct() {
        assert_ne!(
            normalize_page_key("https://example.com/a?p=1"),
            normalize_page_key("https://example.com/a?p=2")
        );
    }

    #[test]
    fn non_urls_pass_through_trimmed() {
        assert_eq!(normalize_page_key("  local-test-page "), "local-test-page");
    }
}
