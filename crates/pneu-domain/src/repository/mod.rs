//! Repository trait definitions for data persistence

use chrono::{DateTime, Utc};

use pneu_types::{Error, Plate, TireObservation};

use crate::model::{Alert, VehicleBaseline, VerificationRecord};

/// Registered vehicles and their tire baselines
pub trait BaselineRepository {
    /// Find a vehicle's baseline by plate
    fn find_by_plate(&self, plate: &Plate) -> Result<Option<VehicleBaseline>, Error>;

    /// All registered vehicles, newest first
    fn find_all(&self) -> Result<Vec<VehicleBaseline>, Error>;

    /// Register a new vehicle; fails with `VehicleExists` for a known plate
    fn insert(&self, baseline: &VehicleBaseline) -> Result<(), Error>;

    /// Overwrite the whole tire set if the stored version still matches.
    ///
    /// Writing tires equal to the stored ones succeeds without a new version.
    fn replace_tires(
        &self,
        plate: &Plate,
        tires: &[TireObservation],
        expected_version: u64,
    ) -> Result<VehicleBaseline, Error>;
}

/// Append-only audit trail of verification attempts
pub trait VerificationLedger {
    /// Store a record; appending the same id again is a no-op
    fn append(&self, record: &VerificationRecord) -> Result<(), Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<VerificationRecord>, Error>;

    /// Records for a plate, newest first
    fn find_by_plate(&self, plate: &Plate) -> Result<Vec<VerificationRecord>, Error>;
}

/// Fraud and rotation alerts
pub trait AlertRepository {
    /// Store an alert; creating the same id again is a no-op
    fn create(&self, alert: &Alert) -> Result<(), Error>;

    fn find_by_id(&self, id: &str) -> Result<Option<Alert>, Error>;

    /// All alerts, newest first
    fn find_all(&self) -> Result<Vec<Alert>, Error>;

    /// Resolve a pending alert in one read-modify-write.
    ///
    /// Fails with `AlertNotFound` or `AlertAlreadyResolved`.
    fn resolve(
        &self,
        id: &str,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Alert, Error>;
}
