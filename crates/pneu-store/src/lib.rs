//! Persistent stores backed by JSON files
//!
//! Every store keeps one JSON map on disk. Writes take an exclusive
//! advisory lock on a sidecar `.lock` file, reload the map, apply the
//! change, and replace the file atomically, so concurrent processes never
//! interleave partial updates.

mod alerts;
mod json_file;
mod ledger;
mod photos;
mod vehicles;

pub use alerts::AlertStore;
pub use ledger::LedgerStore;
pub use photos::PhotoStore;
pub use vehicles::VehicleStore;
