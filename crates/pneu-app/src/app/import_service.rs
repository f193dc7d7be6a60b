//! Fleet import from CSV
//!
//! Expected CSV header:
//! plate,position,dot,brand,condition,week,year
//!
//! One row per tire; rows for the same plate form that vehicle's baseline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use pneu_types::{Attr, Error, Plate, Result, TireCondition, TireObservation, TirePosition};

use crate::app::registration_service::RegistrationService;

#[derive(Debug, Deserialize)]
struct FleetRow {
    plate: String,
    position: String,
    #[serde(default)]
    dot: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    condition: String,
    #[serde(default)]
    week: String,
    #[serde(default)]
    year: String,
}

impl FleetRow {
    fn into_observation(self, row: usize) -> Result<(Plate, TireObservation)> {
        let plate = Plate::parse(&self.plate)
            .map_err(|e| Error::InvalidField(format!("row {}: {}", row, e)))?;
        let position: TirePosition = self
            .position
            .parse()
            .map_err(|e| Error::InvalidField(format!("row {}: {}", row, e)))?;
        let observation = TireObservation {
            position,
            dot: Attr::from_text(&self.dot),
            brand: Attr::from_text(&self.brand),
            condition: TireCondition::from_label(&self.condition),
            manufacture_week: Attr::parse(&self.week),
            manufacture_year: Attr::parse(&self.year),
            image_ref: None,
        };
        Ok((plate, observation))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub registered: Vec<Plate>,
    /// Plates that were already registered
    pub skipped: Vec<Plate>,
}

/// Register every vehicle in the file.
///
/// All groups are validated before the first write, so a bad row leaves
/// the store untouched.
pub fn import_fleet_csv(path: &Path, registration: &RegistrationService) -> Result<ImportSummary> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut fleet: BTreeMap<Plate, Vec<TireObservation>> = BTreeMap::new();
    for (row_idx, result) in reader.deserialize::<FleetRow>().enumerate() {
        let row_num = row_idx + 2; // header is row 1
        let (plate, observation) = result?.into_observation(row_num)?;
        fleet.entry(plate).or_default().push(observation);
    }

    for (plate, tires) in &fleet {
        RegistrationService::validate(tires)
            .map_err(|e| Error::InvalidField(format!("{}: {}", plate, e)))?;
    }

    let mut summary = ImportSummary::default();
    for (plate, tires) in fleet {
        match registration.register(&plate, &tires, Some("import".to_string())) {
            Ok(_) => summary.registered.push(plate),
            Err(Error::VehicleExists(_)) => {
                info!(plate = %plate, "already registered, skipping");
                summary.skipped.push(plate);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        registered = summary.registered.len(),
        skipped = summary.skipped.len(),
        "fleet import finished"
    );
    Ok(summary)
}
