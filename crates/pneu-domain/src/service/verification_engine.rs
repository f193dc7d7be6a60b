//! Tire verification engine
//!
//! Compares a complete scan against the registered baseline and decides
//! whether the vehicle's tires are unchanged, rotated, or swapped.
//!
//! Tires are matched by their (manufacture week, manufacture year) key only.
//! Brand, DOT, and condition never influence the outcome.

use chrono::{DateTime, Utc};

use pneu_types::{FingerprintKey, TireObservation, TirePosition, VerificationError};

use crate::model::{
    AnnotatedTire, TireSet, TireStatus, VehicleBaseline, VerificationResult, VerificationStatus,
};

/// Classify a scan against a baseline.
///
/// Pure: the same inputs always produce the same result. Nothing is
/// persisted here.
pub fn classify(
    baseline: &VehicleBaseline,
    scanned: &[TireObservation],
    created_at: DateTime<Utc>,
) -> Result<VerificationResult, VerificationError> {
    let scan = TireSet::from_scan(scanned)?;
    let registered = TireSet::from_baseline(&baseline.tires)?;

    if let Some(position) = registered.unreadable_positions().first() {
        return Err(VerificationError::InvalidBaseline(format!(
            "registered tire at {} has no readable manufacture date",
            position
        )));
    }

    let baseline_keys = registered.known_keys();
    let scanned_keys = scan.known_keys();
    // A scanned tire without a key can never match a registered one
    let scan_fully_keyed = scan.unreadable_positions().is_empty();

    let status = if !scan_fully_keyed || scanned_keys != baseline_keys {
        VerificationStatus::Fraud
    } else if has_moved_tires(&registered, &scan) {
        VerificationStatus::Rotated
    } else {
        VerificationStatus::Ok
    };

    let annotated_tires = scan
        .iter()
        .map(|tire| {
            let status = match tire.fingerprint() {
                Some(key) if baseline_keys.contains(&key) => TireStatus::Ok,
                _ => TireStatus::Fraud,
            };
            AnnotatedTire {
                tire: tire.clone(),
                status,
            }
        })
        .collect();

    let missing_keys: Vec<FingerprintKey> =
        baseline_keys.difference(&scanned_keys).copied().collect();

    Ok(VerificationResult {
        plate: baseline.plate.clone(),
        vehicle_id: baseline.vehicle_id.clone(),
        status,
        annotated_tires,
        baseline_snapshot: registered.into_vec(),
        baseline_version: baseline.version,
        missing_keys,
        created_at,
    })
}

fn has_moved_tires(registered: &TireSet, scan: &TireSet) -> bool {
    TirePosition::ALL
        .iter()
        .any(|p| registered.get(*p).fingerprint() != scan.get(*p).fingerprint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pneu_types::{Attr, ManufactureWeek, ManufactureYear, Plate};

    const BASELINE: [(u8, u8); 5] = [(41, 19), (12, 21), (5, 20), (30, 18), (22, 22)];

    fn tire(position: TirePosition, (week, year): (u8, u8)) -> TireObservation {
        TireObservation::dated(
            position,
            ManufactureWeek::new(week).unwrap(),
            ManufactureYear::new(year).unwrap(),
        )
    }

    fn tires(keys: [(u8, u8); 5]) -> Vec<TireObservation> {
        TirePosition::ALL
            .iter()
            .zip(keys)
            .map(|(p, k)| tire(*p, k))
            .collect()
    }

    fn baseline(keys: [(u8, u8); 5]) -> VehicleBaseline {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut baseline = VehicleBaseline::new(Plate::parse("BRA2E19").unwrap(), tires(keys), now);
        baseline.vehicle_id = "vehicle-1".to_string();
        baseline
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_identical_scan_is_ok() {
        let base = baseline(BASELINE);
        let result = classify(&base, &tires(BASELINE), at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Ok);
        assert!(result.fraudulent_tires().next().is_none());
        assert!(result.missing_keys.is_empty());
        assert_eq!(result.baseline_version, 1);
    }

    #[test]
    fn test_front_swap_is_rotation() {
        let base = baseline(BASELINE);
        let mut swapped = BASELINE;
        swapped.swap(0, 1);
        let result = classify(&base, &tires(swapped), at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Rotated);
        assert!(result.annotated_tires.iter().all(|t| t.status == TireStatus::Ok));
        assert_eq!(
            result.moved_positions(),
            vec![TirePosition::FrontLeft, TirePosition::FrontRight]
        );
    }

    #[test]
    fn test_replaced_spare_is_fraud() {
        let base = baseline(BASELINE);
        let mut replaced = BASELINE;
        replaced[4] = (1, 23);
        let result = classify(&base, &tires(replaced), at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Fraud);
        let fraud: Vec<_> = result.fraudulent_tires().collect();
        assert_eq!(fraud.len(), 1);
        assert_eq!(fraud[0].position(), TirePosition::Spare);
        assert_eq!(fraud[0].tire.fingerprint().unwrap().to_string(), "(01,23)");
        assert_eq!(result.missing_keys.len(), 1);
        assert_eq!(result.missing_keys[0].to_string(), "(22,22)");
    }

    #[test]
    fn test_missing_baseline_key_is_fraud_without_flagged_tire() {
        // Scan repeats a registered key instead of (22,22)
        let base = baseline(BASELINE);
        let mut scanned = BASELINE;
        scanned[4] = (41, 19);
        let result = classify(&base, &tires(scanned), at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Fraud);
        assert!(result.fraudulent_tires().next().is_none());
        assert_eq!(result.missing_keys[0].to_string(), "(22,22)");
    }

    #[test]
    fn test_shared_keys_in_baseline_are_legal() {
        let keys = [(41, 19), (41, 19), (5, 20), (30, 18), (22, 22)];
        let base = baseline(keys);
        let result = classify(&base, &tires(keys), at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Ok);
    }

    #[test]
    fn test_descriptive_fields_do_not_matter() {
        let base = baseline(BASELINE);
        let mut scanned = tires(BASELINE);
        for t in &mut scanned {
            t.brand = Attr::Unknown;
            t.dot = Attr::Known("DOT ???".to_string());
        }
        let result = classify(&base, &scanned, at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Ok);
    }

    #[test]
    fn test_unreadable_scanned_date_fails_closed() {
        let base = baseline(BASELINE);
        let mut scanned = tires(BASELINE);
        scanned[2].manufacture_week = Attr::Unknown;
        let result = classify(&base, &scanned, at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Fraud);
        let fraud: Vec<_> = result.fraudulent_tires().map(|t| t.position()).collect();
        assert_eq!(fraud, vec![TirePosition::RearLeft]);
    }

    #[test]
    fn test_four_positions_is_incomplete() {
        let base = baseline(BASELINE);
        let scanned = tires(BASELINE)[..4].to_vec();
        assert_eq!(
            classify(&base, &scanned, at()),
            Err(VerificationError::IncompleteScan {
                missing: vec![TirePosition::Spare]
            })
        );
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let base = baseline(BASELINE);
        let mut scanned = tires(BASELINE);
        scanned[4] = scanned[4].clone().at_position(TirePosition::RearRight);
        assert_eq!(
            classify(&base, &scanned, at()),
            Err(VerificationError::DuplicatePosition(TirePosition::RearRight))
        );
    }

    #[test]
    fn test_short_baseline_fails_closed() {
        let mut base = baseline(BASELINE);
        base.tires.pop();
        assert!(matches!(
            classify(&base, &tires(BASELINE), at()),
            Err(VerificationError::InvalidBaseline(_))
        ));
    }

    #[test]
    fn test_unreadable_baseline_fails_closed() {
        let mut base = baseline(BASELINE);
        base.tires[0].manufacture_year = Attr::Unknown;
        assert!(matches!(
            classify(&base, &tires(BASELINE), at()),
            Err(VerificationError::InvalidBaseline(_))
        ));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let base = baseline(BASELINE);
        let mut scanned = BASELINE;
        scanned.swap(2, 3);
        let first = classify(&base, &tires(scanned), at()).unwrap();
        let second = classify(&base, &tires(scanned), at()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_order_does_not_matter() {
        let base = baseline(BASELINE);
        let mut scanned = tires(BASELINE);
        scanned.reverse();
        let result = classify(&base, &scanned, at()).unwrap();
        assert_eq!(result.status, VerificationStatus::Ok);
        assert_eq!(result.annotated_tires[0].position(), TirePosition::FrontLeft);
    }
}
