//! Vehicle store for registered tire baselines

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use pneu_domain::model::{TireSet, VehicleBaseline};
use pneu_domain::repository::BaselineRepository;
use pneu_types::{Error, Plate, Result, TireObservation};

use crate::json_file::JsonMapFile;

/// Persistent store for registered vehicles, keyed by plate
pub struct VehicleStore {
    file: JsonMapFile<VehicleBaseline>,
}

impl VehicleStore {
    /// Create or load a vehicle store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            file: JsonMapFile::open(&store_dir, "vehicles.json")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Get total vehicle count
    pub fn count(&self) -> Result<usize> {
        self.file.read(|vehicles| vehicles.len())
    }
}

impl BaselineRepository for VehicleStore {
    fn find_by_plate(&self, plate: &Plate) -> std::result::Result<Option<VehicleBaseline>, Error> {
        self.file.read(|vehicles| vehicles.get(plate.as_str()).cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<VehicleBaseline>, Error> {
        let mut vehicles: Vec<_> = self.file.read(|vehicles| vehicles.values().cloned().collect())?;
        vehicles.sort_by(|a: &VehicleBaseline, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    fn insert(&self, baseline: &VehicleBaseline) -> std::result::Result<(), Error> {
        self.file.update(|vehicles| {
            let key = baseline.plate.as_str().to_string();
            if vehicles.contains_key(&key) {
                return Err(Error::VehicleExists(key));
            }
            vehicles.insert(key, baseline.clone());
            Ok(())
        })?;
        debug!(plate = %baseline.plate, vehicle_id = %baseline.vehicle_id, "vehicle inserted");
        Ok(())
    }

    fn replace_tires(
        &self,
        plate: &Plate,
        tires: &[TireObservation],
        expected_version: u64,
    ) -> std::result::Result<VehicleBaseline, Error> {
        let tires = TireSet::from_baseline(tires)?.into_vec();
        self.file.update(|vehicles| {
            let current = vehicles
                .get_mut(plate.as_str())
                .ok_or_else(|| Error::VehicleNotFound(plate.to_string()))?;

            if current.tires == tires {
                debug!(plate = %plate, version = current.version, "baseline already up to date");
                return Ok(current.clone());
            }
            if current.version != expected_version {
                return Err(Error::StaleBaseline {
                    plate: plate.to_string(),
                    expected: expected_version,
                    found: current.version,
                });
            }

            current.replace_tires(tires, Utc::now());
            debug!(plate = %plate, version = current.version, "baseline replaced");
            Ok(current.clone())
        })
    }
}
