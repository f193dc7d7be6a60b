//! Repository adapters for persistence layer

use std::path::PathBuf;

use pneu_store::{AlertStore, LedgerStore, PhotoStore, VehicleStore};
use pneu_types::Result;

use crate::config::Config;

/// All stores rooted at one directory
pub struct Stores {
    pub vehicles: VehicleStore,
    pub ledger: LedgerStore,
    pub alerts: AlertStore,
    pub photos: PhotoStore,
}

/// Open every store under the configured store directory
pub fn open_stores(config: &Config) -> Result<Stores> {
    open_stores_at(config.store_dir()?)
}

/// Open every store under a custom directory
pub fn open_stores_at(store_dir: PathBuf) -> Result<Stores> {
    Ok(Stores {
        vehicles: VehicleStore::open(store_dir.clone())?,
        ledger: LedgerStore::open(store_dir.clone())?,
        alerts: AlertStore::open(store_dir.clone())?,
        photos: PhotoStore::open(store_dir)?,
    })
}
