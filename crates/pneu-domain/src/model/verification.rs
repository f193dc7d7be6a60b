//! Verification results and ledger records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pneu_types::{FingerprintKey, Plate, TireObservation, TirePosition};

/// Set-level outcome of one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Ok,
    Rotated,
    Fraud,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Ok => "ok",
            VerificationStatus::Rotated => "rotated",
            VerificationStatus::Fraud => "fraud",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tire flag: `Fraud` when the tire's key is not in the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TireStatus {
    Ok,
    Fraud,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTire {
    pub tire: TireObservation,
    pub status: TireStatus,
}

impl AnnotatedTire {
    pub fn position(&self) -> TirePosition {
        self.tire.position
    }

    pub fn is_fraud(&self) -> bool {
        self.status == TireStatus::Fraud
    }
}

/// Outcome of classifying one scan against a baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub plate: Plate,
    pub vehicle_id: String,
    pub status: VerificationStatus,
    /// Scanned tires in slot order
    pub annotated_tires: Vec<AnnotatedTire>,
    /// Baseline tires as they were before this verification
    pub baseline_snapshot: Vec<TireObservation>,
    pub baseline_version: u64,
    /// Registered keys that no scanned tire carries
    #[serde(default)]
    pub missing_keys: Vec<FingerprintKey>,
    pub created_at: DateTime<Utc>,
}

impl VerificationResult {
    pub fn fraudulent_tires(&self) -> impl Iterator<Item = &AnnotatedTire> {
        self.annotated_tires.iter().filter(|t| t.is_fraud())
    }

    pub fn scanned_tires(&self) -> Vec<TireObservation> {
        self.annotated_tires.iter().map(|t| t.tire.clone()).collect()
    }

    /// Positions where the registered and scanned keys differ
    pub fn moved_positions(&self) -> Vec<TirePosition> {
        self.annotated_tires
            .iter()
            .filter(|scanned| {
                let registered = self
                    .baseline_snapshot
                    .iter()
                    .find(|t| t.position == scanned.position())
                    .and_then(|t| t.fingerprint());
                registered != scanned.tire.fingerprint()
            })
            .map(|t| t.position())
            .collect()
    }
}

/// Immutable ledger entry for one verification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: String,
    pub result: VerificationResult,
    #[serde(default)]
    pub operator: Option<String>,
}

impl VerificationRecord {
    pub fn new(result: VerificationResult, operator: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            result,
            operator,
        }
    }

    pub fn plate(&self) -> &Plate {
        &self.result.plate
    }

    pub fn status(&self) -> VerificationStatus {
        self.result.status
    }
}
