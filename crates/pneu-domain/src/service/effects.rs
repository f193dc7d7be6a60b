//! Downstream writes that follow a verification
//!
//! Each effect is planned from the record alone and can be executed,
//! retried, or replayed independently of the others.

use serde::{Deserialize, Serialize};

use pneu_types::{Plate, TireObservation};

use crate::model::{Alert, VerificationRecord, VerificationStatus};
use crate::service::decide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Ledger,
    Alert,
    Baseline,
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Ledger => write!(f, "ledger"),
            EffectKind::Alert => write!(f, "alert"),
            EffectKind::Baseline => write!(f, "baseline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AppendLedger(VerificationRecord),
    CreateAlert(Alert),
    ReplaceBaseline {
        plate: Plate,
        tires: Vec<TireObservation>,
        expected_version: u64,
    },
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::AppendLedger(_) => EffectKind::Ledger,
            Effect::CreateAlert(_) => EffectKind::Alert,
            Effect::ReplaceBaseline { .. } => EffectKind::Baseline,
        }
    }
}

/// Writes owed for a verification: ledger always, alert on rotation or
/// fraud, baseline overwrite on rotation only.
pub fn plan_effects(record: &VerificationRecord) -> Vec<Effect> {
    let mut effects = vec![Effect::AppendLedger(record.clone())];

    if let Some(alert) = decide(record) {
        effects.push(Effect::CreateAlert(alert));
    }

    if record.result.status == VerificationStatus::Rotated {
        effects.push(Effect::ReplaceBaseline {
            plate: record.result.plate.clone(),
            tires: record.result.scanned_tires(),
            expected_version: record.result.baseline_version,
        });
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleBaseline;
    use crate::service::classify;
    use chrono::Utc;
    use pneu_types::{ManufactureWeek, ManufactureYear, TirePosition};

    fn tires(keys: [(u8, u8); 5]) -> Vec<TireObservation> {
        TirePosition::ALL
            .iter()
            .zip(keys)
            .map(|(p, (w, y))| {
                TireObservation::dated(
                    *p,
                    ManufactureWeek::new(w).unwrap(),
                    ManufactureYear::new(y).unwrap(),
                )
            })
            .collect()
    }

    fn plan_for(base: [(u8, u8); 5], scanned: [(u8, u8); 5]) -> (Vec<EffectKind>, Vec<Effect>) {
        let now = Utc::now();
        let baseline = VehicleBaseline::new(Plate::parse("ABC1D23").unwrap(), tires(base), now);
        let result = classify(&baseline, &tires(scanned), now).unwrap();
        let effects = plan_effects(&VerificationRecord::new(result, None));
        (effects.iter().map(|e| e.kind()).collect(), effects)
    }

    const BASE: [(u8, u8); 5] = [(41, 19), (12, 21), (5, 20), (30, 18), (22, 22)];

    #[test]
    fn test_ok_only_writes_ledger() {
        let (kinds, _) = plan_for(BASE, BASE);
        assert_eq!(kinds, vec![EffectKind::Ledger]);
    }

    #[test]
    fn test_fraud_never_touches_baseline() {
        let mut scanned = BASE;
        scanned[4] = (1, 23);
        let (kinds, _) = plan_for(BASE, scanned);
        assert_eq!(kinds, vec![EffectKind::Ledger, EffectKind::Alert]);
    }

    #[test]
    fn test_rotation_replaces_baseline_with_scan() {
        let mut scanned = BASE;
        scanned.swap(0, 1);
        let (kinds, effects) = plan_for(BASE, scanned);
        assert_eq!(
            kinds,
            vec![EffectKind::Ledger, EffectKind::Alert, EffectKind::Baseline]
        );
        match &effects[2] {
            Effect::ReplaceBaseline {
                tires: new_tires,
                expected_version,
                ..
            } => {
                assert_eq!(*new_tires, tires(scanned));
                assert_eq!(*expected_version, 1);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }
}
