//! Read-only queries over vehicles and the verification ledger

use pneu_domain::model::{VehicleBaseline, VerificationRecord};
use pneu_domain::repository::{BaselineRepository, VerificationLedger};
use pneu_types::{Error, Plate, Result};

/// Registered vehicles, newest first
pub fn list_vehicles(baselines: &dyn BaselineRepository) -> Result<Vec<VehicleBaseline>> {
    baselines.find_all()
}

pub fn find_vehicle(baselines: &dyn BaselineRepository, plate: &Plate) -> Result<VehicleBaseline> {
    baselines
        .find_by_plate(plate)?
        .ok_or_else(|| Error::VehicleNotFound(plate.to_string()))
}

/// Verification records for a plate, newest first
pub fn verification_history(
    ledger: &dyn VerificationLedger,
    plate: &Plate,
) -> Result<Vec<VerificationRecord>> {
    ledger.find_by_plate(plate)
}
