//! Alert records raised by verifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pneu_types::{Error, Plate, TireObservation};

use crate::model::AnnotatedTire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    Fraud,
    RotationNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Informational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Resolved,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Fraud => write!(f, "fraud"),
            AlertKind::RotationNotice => write!(f, "rotation-notice"),
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "critical"),
            AlertSeverity::Informational => write!(f, "informational"),
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Pending => write!(f, "pending"),
            AlertStatus::Resolved => write!(f, "resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDetails {
    /// Scanned tires with their per-tire status
    pub found_tires: Vec<AnnotatedTire>,
    /// Registered tires before the verification
    pub original_tires: Vec<TireObservation>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub verification_id: String,
    pub plate: Plate,
    pub vehicle_id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub details: AlertDetails,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Alert {
    pub fn is_pending(&self) -> bool {
        self.status == AlertStatus::Pending
    }

    /// Scanned tires whose key is absent from the baseline
    pub fn implicated_tires(&self) -> Vec<&AnnotatedTire> {
        self.details.found_tires.iter().filter(|t| t.is_fraud()).collect()
    }

    /// Close a pending alert after human review
    pub fn resolve(&mut self, notes: Option<String>, at: DateTime<Utc>) -> Result<(), Error> {
        if !self.is_pending() {
            return Err(Error::AlertAlreadyResolved(self.id.clone()));
        }
        self.status = AlertStatus::Resolved;
        self.resolved_at = Some(at);
        self.notes = notes;
        Ok(())
    }
}
