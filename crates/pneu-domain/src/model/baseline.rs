//! Registered tire state of a vehicle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pneu_types::{Plate, TireObservation, TirePosition};

/// The vehicle's currently registered five-tire set.
///
/// `version` starts at 1 and increments on every overwrite of `tires`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleBaseline {
    pub vehicle_id: String,
    pub plate: Plate,
    pub tires: Vec<TireObservation>,
    #[serde(default = "initial_version")]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub registered_by: Option<String>,
}

fn initial_version() -> u64 {
    1
}

impl VehicleBaseline {
    pub fn new(plate: Plate, tires: Vec<TireObservation>, now: DateTime<Utc>) -> Self {
        Self {
            vehicle_id: uuid::Uuid::new_v4().to_string(),
            plate,
            tires,
            version: initial_version(),
            created_at: now,
            updated_at: now,
            registered_by: None,
        }
    }

    pub fn tire_at(&self, position: TirePosition) -> Option<&TireObservation> {
        self.tires.iter().find(|t| t.position == position)
    }

    /// Overwrite the whole tire set and bump the version
    pub fn replace_tires(&mut self, tires: Vec<TireObservation>, now: DateTime<Utc>) {
        self.tires = tires;
        self.version += 1;
        self.updated_at = now;
    }
}
