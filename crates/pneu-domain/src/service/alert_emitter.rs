//! Alert policy for verification outcomes

use pneu_types::FingerprintKey;

use crate::model::{
    Alert, AlertDetails, AlertKind, AlertSeverity, AlertStatus, VerificationRecord,
    VerificationStatus,
};

/// Decide whether a verification needs an alert.
///
/// - `ok`: no alert
/// - `fraud`: critical alert, pending human review
/// - `rotated`: informational alert, created already resolved
///
/// The alert id is derived from the verification id, so deciding twice on
/// the same record yields the same alert.
pub fn decide(record: &VerificationRecord) -> Option<Alert> {
    let result = &record.result;
    let (kind, severity, status, resolved_at, note) = match result.status {
        VerificationStatus::Ok => return None,
        VerificationStatus::Fraud => (
            AlertKind::Fraud,
            AlertSeverity::Critical,
            AlertStatus::Pending,
            None,
            fraud_note(record),
        ),
        VerificationStatus::Rotated => (
            AlertKind::RotationNotice,
            AlertSeverity::Informational,
            AlertStatus::Resolved,
            Some(result.created_at),
            rotation_note(record),
        ),
    };

    Some(Alert {
        id: alert_id(&record.id),
        verification_id: record.id.clone(),
        plate: result.plate.clone(),
        vehicle_id: result.vehicle_id.clone(),
        kind,
        severity,
        status,
        details: AlertDetails {
            found_tires: result.annotated_tires.clone(),
            original_tires: result.baseline_snapshot.clone(),
            note: Some(note),
        },
        created_at: result.created_at,
        resolved_at,
        notes: None,
    })
}

pub fn alert_id(verification_id: &str) -> String {
    format!("alert-{}", verification_id)
}

fn fraud_note(record: &VerificationRecord) -> String {
    let result = &record.result;
    let mut parts = Vec::new();

    let unregistered: Vec<String> = result
        .fraudulent_tires()
        .map(|t| format!("{} {}", t.position(), describe_key(t.tire.fingerprint())))
        .collect();
    if !unregistered.is_empty() {
        parts.push(format!("unregistered tires at {}", unregistered.join(", ")));
    }

    if !result.missing_keys.is_empty() {
        let missing: Vec<String> = result.missing_keys.iter().map(|k| k.to_string()).collect();
        parts.push(format!("registered tires not found: {}", missing.join(", ")));
    }

    parts.join("; ")
}

fn rotation_note(record: &VerificationRecord) -> String {
    let result = &record.result;
    let moves: Vec<String> = result
        .moved_positions()
        .into_iter()
        .map(|position| {
            let before = result
                .baseline_snapshot
                .iter()
                .find(|t| t.position == position)
                .and_then(|t| t.fingerprint());
            let after = result
                .annotated_tires
                .iter()
                .find(|t| t.position() == position)
                .and_then(|t| t.tire.fingerprint());
            format!("{} {} -> {}", position, describe_key(before), describe_key(after))
        })
        .collect();
    format!("tire positions changed: {}; baseline updated", moves.join(", "))
}

fn describe_key(key: Option<FingerprintKey>) -> String {
    key.map(|k| k.to_string())
        .unwrap_or_else(|| "(unreadable)".to_string())
}
