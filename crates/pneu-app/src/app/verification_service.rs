//! Verification Service - the verify-vehicle use case
//!
//! 1. Take the plate lock
//! 2. Load the baseline
//! 3. Classify the scan
//! 4. Execute the planned effects (ledger, alert, baseline overwrite)
//! 5. Report the decision together with each effect's outcome
//!
//! The classification is returned even when an effect write fails; failed
//! effects can be replayed with [`VerificationService::retry_failed_effects`].

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use pneu_domain::model::{Alert, VerificationRecord, VerificationStatus};
use pneu_domain::repository::{AlertRepository, BaselineRepository, VerificationLedger};
use pneu_domain::service::{classify, decide, plan_effects, Effect, EffectKind};
use pneu_types::{Error, Plate, Result, TireObservation};

use crate::locks::PlateLocks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum EffectStatus {
    Written,
    /// Not owed for this outcome
    Skipped,
    Failed(String),
}

impl EffectStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, EffectStatus::Failed(_))
    }
}

impl std::fmt::Display for EffectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectStatus::Written => write!(f, "written"),
            EffectStatus::Skipped => write!(f, "skipped"),
            EffectStatus::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectReport {
    pub ledger: EffectStatus,
    pub alert: EffectStatus,
    pub baseline: EffectStatus,
}

impl EffectReport {
    fn all_skipped() -> Self {
        Self {
            ledger: EffectStatus::Skipped,
            alert: EffectStatus::Skipped,
            baseline: EffectStatus::Skipped,
        }
    }

    pub fn get(&self, kind: EffectKind) -> &EffectStatus {
        match kind {
            EffectKind::Ledger => &self.ledger,
            EffectKind::Alert => &self.alert,
            EffectKind::Baseline => &self.baseline,
        }
    }

    fn set(&mut self, kind: EffectKind, status: EffectStatus) {
        match kind {
            EffectKind::Ledger => self.ledger = status,
            EffectKind::Alert => self.alert = status,
            EffectKind::Baseline => self.baseline = status,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.ledger.is_failed() || self.alert.is_failed() || self.baseline.is_failed()
    }
}

/// Decision plus the fate of every write it implied
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    pub record: VerificationRecord,
    pub alert: Option<Alert>,
    pub effects: EffectReport,
}

impl VerificationOutcome {
    pub fn status(&self) -> VerificationStatus {
        self.record.status()
    }
}

pub struct VerificationService<'a> {
    baselines: &'a dyn BaselineRepository,
    ledger: &'a dyn VerificationLedger,
    alerts: &'a dyn AlertRepository,
    locks: &'a PlateLocks,
}

impl<'a> VerificationService<'a> {
    pub fn new(
        baselines: &'a dyn BaselineRepository,
        ledger: &'a dyn VerificationLedger,
        alerts: &'a dyn AlertRepository,
        locks: &'a PlateLocks,
    ) -> Self {
        Self {
            baselines,
            ledger,
            alerts,
            locks,
        }
    }

    /// Verify a completed scan against the vehicle's registered tires.
    ///
    /// Input errors (unknown plate, incomplete or duplicate scan, broken
    /// baseline) return `Err` before anything is written.
    pub fn verify(
        &self,
        plate: &Plate,
        scanned: &[TireObservation],
        operator: Option<String>,
    ) -> Result<VerificationOutcome> {
        self.locks.with_lock(plate, || -> Result<VerificationOutcome> {
            let baseline = self
                .baselines
                .find_by_plate(plate)?
                .ok_or_else(|| Error::VehicleNotFound(plate.to_string()))?;

            let result = classify(&baseline, scanned, Utc::now())?;
            let record = VerificationRecord::new(result, operator);
            info!(
                plate = %plate,
                id = %record.id,
                status = %record.status(),
                baseline_version = baseline.version,
                "vehicle verified"
            );

            let mut effects = EffectReport::all_skipped();
            for effect in plan_effects(&record) {
                let kind = effect.kind();
                effects.set(kind, self.execute(&effect));
            }

            Ok(VerificationOutcome {
                alert: decide(&record),
                record,
                effects,
            })
        })
    }

    /// Replay the effects that failed; written and skipped ones are left alone
    pub fn retry_failed_effects(&self, outcome: &mut VerificationOutcome) {
        let plate = outcome.record.plate().clone();
        self.locks.with_lock(&plate, || {
            for effect in plan_effects(&outcome.record) {
                let kind = effect.kind();
                if outcome.effects.get(kind).is_failed() {
                    let status = self.execute(&effect);
                    outcome.effects.set(kind, status);
                }
            }
        })
    }

    fn execute(&self, effect: &Effect) -> EffectStatus {
        let written = match effect {
            Effect::AppendLedger(record) => self.ledger.append(record),
            Effect::CreateAlert(alert) => self.alerts.create(alert),
            Effect::ReplaceBaseline {
                plate,
                tires,
                expected_version,
            } => self
                .baselines
                .replace_tires(plate, tires, *expected_version)
                .map(|updated| {
                    info!(plate = %plate, version = updated.version, "baseline updated after rotation");
                }),
        };

        match written {
            Ok(()) => EffectStatus::Written,
            Err(err) => {
                warn!(effect = %effect.kind(), error = %err, "effect write failed");
                EffectStatus::Failed(err.to_string())
            }
        }
    }
}
