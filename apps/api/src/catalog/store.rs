use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::catalog::CatalogSnapshot;

/// Holds the current snapshot. Readers get a whole `Arc<CatalogSnapshot>`
/// and keep it for the duration of their request; `replace` swaps the pointer
/// so an in-flight request never observes a mix of old and new entries.
pub struct CatalogStore {
    current: ArcSwap<CatalogSnapshot>,
}

impl CatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.load_full()
    }

    /// Installs a new snapshot and returns the one it replaced.
    pub fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        info!(
            entries = snapshot.len(),
            dimension = snapshot.dimension(),
            model = snapshot.model(),
            "Swapping catalog snapshot"
        );
        self.current.swap(Arc::new(snapshot))
    }
}
