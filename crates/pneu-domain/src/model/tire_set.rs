//! Validated set of exactly one tire per position

use std::collections::BTreeSet;

use pneu_types::{FingerprintKey, TireObservation, TirePosition, VerificationError};

/// Exactly five observations, one per [`TirePosition`], in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TireSet {
    tires: Vec<TireObservation>,
}

impl TireSet {
    /// Validate a scanned set. Duplicates are reported before omissions.
    pub fn from_scan(observations: &[TireObservation]) -> Result<Self, VerificationError> {
        let mut slots: [Option<&TireObservation>; 5] = [None; 5];
        for obs in observations {
            let slot = &mut slots[obs.position.index()];
            if slot.is_some() {
                return Err(VerificationError::DuplicatePosition(obs.position));
            }
            *slot = Some(obs);
        }

        let missing: Vec<TirePosition> = TirePosition::ALL
            .iter()
            .copied()
            .filter(|p| slots[p.index()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(VerificationError::IncompleteScan { missing });
        }

        Ok(Self {
            tires: slots.iter().flatten().map(|t| (*t).clone()).collect(),
        })
    }

    /// Validate a registered set; any defect is an `InvalidBaseline`
    pub fn from_baseline(tires: &[TireObservation]) -> Result<Self, VerificationError> {
        if tires.len() != TirePosition::ALL.len() {
            return Err(VerificationError::InvalidBaseline(format!(
                "expected {} tires, found {}",
                TirePosition::ALL.len(),
                tires.len()
            )));
        }
        Self::from_scan(tires).map_err(|e| VerificationError::InvalidBaseline(e.to_string()))
    }

    pub fn get(&self, position: TirePosition) -> &TireObservation {
        &self.tires[position.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TireObservation> {
        self.tires.iter()
    }

    /// Fingerprints of the tires that have one; positions are discarded
    pub fn known_keys(&self) -> BTreeSet<FingerprintKey> {
        self.tires.iter().filter_map(|t| t.fingerprint()).collect()
    }

    /// Positions whose tire has no readable fingerprint
    pub fn unreadable_positions(&self) -> Vec<TirePosition> {
        self.tires
            .iter()
            .filter(|t| t.fingerprint().is_none())
            .map(|t| t.position)
            .collect()
    }

    pub fn into_vec(self) -> Vec<TireObservation> {
        self.tires
    }
}
