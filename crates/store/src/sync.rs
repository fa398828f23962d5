use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::backend::AnchorStore;
use crate::descriptor::HighlightDescriptor;
use crate::error::StoreError;
use crate::page::PageHighlightSet;

/// The remote-sync collaborator: mirrors descriptors keyed by page.
///
/// Transport, authentication and sharing are out of scope here; an
/// implementation may be an HTTP client, a cloud SDK, or the in-memory
/// mirror below.
pub trait RemoteMirror {
    fn pull(&self, key: &str) -> Result<Vec<HighlightDescriptor>, StoreError>;
    fn push(&self, key: &str, highlights: &[HighlightDescriptor]) -> Result<(), StoreError>;
}

/// What a merge did, for logging and UI badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Descriptors in the merged result.
    pub total: usize,
    /// Conflicts resolved in favor of the remote copy.
    pub took_remote: usize,
    /// Descriptors that existed on only one side.
    pub one_sided: usize,
}

/// Merges one page's highlights between a local store and a remote mirror,
/// then writes the merged set to both sides.
///
/// Merging is keyed by descriptor id, last-write-wins on the newer of
/// `updated_at`/`created_at`; a tie keeps the local copy. Local insertion
/// order is preserved; remote-only descriptors append in remote order.
pub fn sync_page(
    store: &dyn AnchorStore,
    mirror: &dyn RemoteMirror,
    key: &str,
) -> Result<SyncReport, StoreError> {
    let mut local = store
        .get(key)?
        .unwrap_or_else(|| PageHighlightSet::new(key));
    let remote = mirror.pull(key)?;

    let mut report = SyncReport::default();
    let remote_order: Vec<String> = remote.iter().map(|d| d.id.clone()).collect();
    let mut remote_by_id: BTreeMap<String, HighlightDescriptor> = remote
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();

    for d in local.highlights.iter_mut() {
        match remote_by_id.remove(d.id.as_str()) {
            Some(r) if r.last_modified() > d.last_modified() => {
                *d = r;
                report.took_remote += 1;
            }
            Some(_) => {}
            None => report.one_sided += 1,
        }
    }
    for id in remote_order {
        if let Some(d) = remote_by_id.remove(&id) {
            local.highlights.push(d);
            report.one_sided += 1;
        }
    }
    report.total = local.len();

    mirror.push(key, &local.highlights)?;
    store.set(key, &local)?;
    Ok(report)
}

/// In-memory mirror for tests and single-process setups.
#[derive(Default)]
pub struct InMemoryMirror {
    pages: RwLock<BTreeMap<String, Vec<HighlightDescriptor>>>,
}

impl InMemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RemoteMirror for InMemoryMirror {
    fn pull(&self, key: &str) -> Result<Vec<HighlightDescriptor>, StoreError> {
        let pages = self.pages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(pages.get(key).cloned().unwrap_or_default())
    }

    fn push(&self, key: &str, highlights: &[HighlightDescriptor]) -> Result<(), StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        pages.insert(key.to_string(), highlights.to_vec());
        Ok(())
    }
}
