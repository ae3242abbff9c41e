//! Shared latest-snapshot slot
//!
//! Single writer (the recompute pump), many readers (subscriber loops).
//! Publication swaps the whole `Arc`, so a reader either sees the previous
//! snapshot or the new one, never a half-updated value.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::snapshot::VehicleStateSnapshot;

/// Cloneable handle to the current snapshot
#[derive(Clone)]
pub struct SnapshotSlot {
    inner: Arc<RwLock<Arc<VehicleStateSnapshot>>>,
}

impl SnapshotSlot {
    /// Seed the slot with an initial snapshot so readers never start empty.
    pub fn new(initial: VehicleStateSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// Replace the published snapshot wholesale.
    pub fn publish(&self, snapshot: VehicleStateSnapshot) {
        *self.inner.write() = Arc::new(snapshot);
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<VehicleStateSnapshot> {
        self.inner.read().clone()
    }
}
