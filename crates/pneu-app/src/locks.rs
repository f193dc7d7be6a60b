//! Per-plate serialization of read-classify-write sequences

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use pneu_types::Plate;

/// Hands out one mutex per plate.
///
/// Verifications of different plates run in parallel; two verifications of
/// the same plate never interleave their baseline read and effect writes.
#[derive(Debug, Default)]
pub struct PlateLocks {
    locks: Mutex<HashMap<Plate, Arc<Mutex<()>>>>,
}

impl PlateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<Plate, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn entry(&self, plate: &Plate) -> Arc<Mutex<()>> {
        self.map().entry(plate.clone()).or_default().clone()
    }

    /// Drop the entry for `plate` once no caller holds or waits on it.
    ///
    /// Clones are only taken under the map lock, so a count of one here
    /// means the map owns the last reference.
    fn release(&self, plate: &Plate) {
        let mut locks = self.map();
        if locks.get(plate).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(plate);
        }
    }

    /// Run `f` while holding the lock for `plate`
    pub fn with_lock<R>(&self, plate: &Plate, f: impl FnOnce() -> R) -> R {
        let lock = self.entry(plate);
        let value = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f()
        };
        drop(lock);
        self.release(plate);
        value
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}
