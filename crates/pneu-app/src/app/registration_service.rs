//! Registration Service - records a vehicle's baseline tire set

use std::path::Path;

use chrono::Utc;
use tracing::info;

use pneu_domain::model::{TireSet, VehicleBaseline};
use pneu_domain::repository::BaselineRepository;
use pneu_types::{Attr, Error, Plate, Result, TireObservation};
use pneu_vision::AttributeExtractor;

use crate::locks::PlateLocks;

pub struct RegistrationService<'a> {
    baselines: &'a dyn BaselineRepository,
    locks: &'a PlateLocks,
}

impl<'a> RegistrationService<'a> {
    pub fn new(baselines: &'a dyn BaselineRepository, locks: &'a PlateLocks) -> Self {
        Self { baselines, locks }
    }

    /// Check that a tire set can serve as a baseline
    pub fn validate(tires: &[TireObservation]) -> Result<TireSet> {
        let set = TireSet::from_scan(tires)?;
        if let Some(position) = set.unreadable_positions().into_iter().next() {
            return Err(Error::UnreadableFingerprint(position));
        }
        Ok(set)
    }

    pub fn register(
        &self,
        plate: &Plate,
        tires: &[TireObservation],
        registered_by: Option<String>,
    ) -> Result<VehicleBaseline> {
        let set = Self::validate(tires)?;
        self.locks.with_lock(plate, || -> Result<VehicleBaseline> {
            if self.baselines.find_by_plate(plate)?.is_some() {
                return Err(Error::VehicleExists(plate.to_string()));
            }

            let mut baseline = VehicleBaseline::new(plate.clone(), set.into_vec(), Utc::now());
            baseline.registered_by = registered_by;
            self.baselines.insert(&baseline)?;
            info!(plate = %plate, vehicle_id = %baseline.vehicle_id, "vehicle registered");
            Ok(baseline)
        })
    }
}

/// Read and normalize the plate shown in a photo
pub fn read_plate(extractor: &dyn AttributeExtractor, photo: &Path) -> Result<Plate> {
    match extractor.extract_plate_text(photo)? {
        Attr::Known(text) => Plate::parse(&text),
        Attr::Unknown => Err(Error::InvalidPlate(format!(
            "no readable plate in {}",
            photo.display()
        ))),
    }
}
