use thiserror::Error;
use tracing::{debug, warn};

use dom::{Document, Selection};
use resolver::{capture_selection, remove_marker, resolve, CaptureConfig, Outcome, ResolveConfig};
use store::{
    normalize_page_key, sync_page, AnchorStore, HighlightDescriptor, HighlightMetadata,
    PageHighlightSet, RemoteMirror, StoreError, SyncReport,
};

/// Errors surfaced by the driver. Resolution misses are never in here; they
/// are reported per-descriptor in [`RestoreReport`].
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Tally of one page restore. Each descriptor resolves independently, so a
/// miss lands in `failed` and the rest of the batch continues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Markers newly applied on this pass.
    pub restored: usize,
    /// Descriptors whose markers were already in the document.
    pub already_marked: usize,
    /// Ids of descriptors no tier could place.
    pub failed: Vec<String>,
}

impl RestoreReport {
    pub fn attempted(&self) -> usize {
        self.restored + self.already_marked + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The driver wiring a persistence collaborator to live documents.
///
/// Holds no document state itself: every operation takes the page URL (used
/// as a normalized storage key) and the live [`Document`] to act on.
pub struct Highlighter<S> {
    store: S,
    capture_cfg: CaptureConfig,
    resolve_cfg: ResolveConfig,
}

impl<S: AnchorStore> Highlighter<S> {
    pub fn new(store: S) -> Self {
        Self::with_configs(store, CaptureConfig::default(), ResolveConfig::default())
    }

    pub fn with_configs(store: S, capture_cfg: CaptureConfig, resolve_cfg: ResolveConfig) -> Self {
        Self {
            store,
            capture_cfg,
            resolve_cfg,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Captures the selection, persists the descriptor under the page's
    /// normalized key, and marks the live document so the user sees the
    /// highlight immediately.
    ///
    /// `Ok(None)` means the selection was empty, whitespace-only, or
    /// unanchorable: a normal no-op, nothing was stored.
    pub fn save_selection(
        &self,
        page_url: &str,
        doc: &mut Document,
        selection: &Selection,
        metadata: HighlightMetadata,
    ) -> Result<Option<HighlightDescriptor>, HighlightError> {
        let Some(captured) = capture_selection(doc, selection, &self.capture_cfg) else {
            return Ok(None);
        };
        let descriptor = captured.into_descriptor(metadata);

        let key = normalize_page_key(page_url);
        let mut set = self
            .store
            .get(&key)?
            .unwrap_or_else(|| PageHighlightSet::new(key.clone()));
        set.add(descriptor.clone())?;
        self.store.set(&key, &set)?;

        // Freshly captured, unchanged tree: this is the direct-offset path.
        let outcome = resolve(doc, &descriptor, &self.resolve_cfg);
        if !outcome.is_resolved() {
            warn!(id = %descriptor.id, "freshly captured highlight failed to apply");
        }
        Ok(Some(descriptor))
    }

    /// Fetches the page's descriptors and resolves each one against `doc`,
    /// sequentially and independently. A descriptor that no tier can place
    /// is logged and skipped; the batch never aborts.
    pub fn restore_page(
        &self,
        page_url: &str,
        doc: &mut Document,
    ) -> Result<RestoreReport, HighlightError> {
        let key = normalize_page_key(page_url);
        let Some(set) = self.store.get(&key)? else {
            return Ok(RestoreReport::default());
        };
        let mut report = RestoreReport::default();
        for descriptor in set.iter() {
            match resolve(doc, descriptor, &self.resolve_cfg) {
                Outcome::Marked(tier) => {
                    debug!(id = %descriptor.id, ?tier, "highlight restored");
                    report.restored += 1;
                }
                Outcome::AlreadyMarked => report.already_marked += 1,
                Outcome::Unresolved => {
                    warn!(id = %descriptor.id, "highlight did not resolve; skipping");
                    report.failed.push(descriptor.id.clone());
                }
            }
        }
        Ok(report)
    }

    /// Unwraps the highlight's marker in `doc` and deletes its descriptor
    /// from the store. Returns whether anything (marker or descriptor) was
    /// actually removed.
    pub fn remove_highlight(
        &self,
        page_url: &str,
        doc: &mut Document,
        id: &str,
    ) -> Result<bool, HighlightError> {
        let unmarked = remove_marker(doc, id, &self.resolve_cfg);

        let key = normalize_page_key(page_url);
        let Some(mut set) = self.store.get(&key)? else {
            return Ok(unmarked);
        };
        let deleted = set.remove(id).is_some();
        if deleted {
            if set.is_empty() {
                self.store.delete(&key)?;
            } else {
                self.store.set(&key, &set)?;
            }
        }
        Ok(unmarked || deleted)
    }

    /// Metadata-only edit of a stored descriptor; structural fields are
    /// never touched. Returns whether the id existed on that page.
    pub fn update_metadata(
        &self,
        page_url: &str,
        id: &str,
        metadata: HighlightMetadata,
    ) -> Result<bool, HighlightError> {
        let key = normalize_page_key(page_url);
        let Some(mut set) = self.store.get(&key)? else {
            return Ok(false);
        };
        if !set.update_metadata(id, metadata) {
            return Ok(false);
        }
        self.store.set(&key, &set)?;
        Ok(true)
    }

    /// Merges this page's highlights with a remote mirror, newest edit
    /// winning per descriptor.
    pub fn sync_page(
        &self,
        page_url: &str,
        mirror: &dyn RemoteMirror,
    ) -> Result<SyncReport, HighlightError> {
        let key = normalize_page_key(page_url);
        Ok(sync_page(&self.store, mirror, &key)?)
    }
}
