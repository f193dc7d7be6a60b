//! Alert store

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use tracing::info;

use pneu_domain::model::Alert;
use pneu_domain::repository::AlertRepository;
use pneu_types::{Error, Result};

use crate::json_file::JsonMapFile;

/// Persistent store for alerts, keyed by alert id
pub struct AlertStore {
    file: JsonMapFile<Alert>,
}

impl AlertStore {
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            file: JsonMapFile::open(&store_dir, "alerts.json")?,
        })
    }

    /// Count of alerts still waiting for review
    pub fn pending_count(&self) -> Result<usize> {
        self.file
            .read(|alerts| alerts.values().filter(|a| a.is_pending()).count())
    }
}

impl AlertRepository for AlertStore {
    fn create(&self, alert: &Alert) -> std::result::Result<(), Error> {
        let inserted = self.file.update(|alerts| {
            if alerts.contains_key(&alert.id) {
                return Ok(false);
            }
            alerts.insert(alert.id.clone(), alert.clone());
            Ok(true)
        })?;
        if inserted {
            info!(
                id = %alert.id,
                plate = %alert.plate,
                kind = %alert.kind,
                severity = %alert.severity,
                "alert created"
            );
        }
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Alert>, Error> {
        self.file.read(|alerts| alerts.get(id).cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<Alert>, Error> {
        let mut alerts: Vec<Alert> = self.file.read(|alerts| alerts.values().cloned().collect())?;
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    fn resolve(
        &self,
        id: &str,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> std::result::Result<Alert, Error> {
        self.file.update(|alerts| {
            let alert = alerts
                .get_mut(id)
                .ok_or_else(|| Error::AlertNotFound(id.to_string()))?;
            alert.resolve(notes, at)?;
            Ok(alert.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use pneu_domain::model::{VehicleBaseline, VerificationRecord};
    use pneu_domain::service::{classify, decide};
    use pneu_types::{ManufactureWeek, ManufactureYear, Plate, TireObservation, TirePosition};
    use tempfile::tempdir;

    fn tires(first_week: u8) -> Vec<TireObservation> {
        TirePosition::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let week = if i == 0 { first_week } else { 10 + i as u8 };
                TireObservation::dated(
                    *p,
                    ManufactureWeek::new(week).unwrap(),
                    ManufactureYear::new(21).unwrap(),
                )
            })
            .collect()
    }

    fn fraud_alert() -> Alert {
        let now = Utc::now();
        let baseline = VehicleBaseline::new(Plate::parse("ABC1D23").unwrap(), tires(10), now);
        let result = classify(&baseline, &tires(50), now).unwrap();
        decide(&VerificationRecord::new(result, None)).unwrap()
    }

    #[test]
    fn test_create_twice_keeps_one() {
        let dir = tempdir().unwrap();
        let store = AlertStore::open(dir.path().to_path_buf()).unwrap();
        let alert = fraud_alert();
        store.create(&alert).unwrap();
        store.create(&alert).unwrap();
        assert_eq!(store.find_all().unwrap().len(), 1);
        assert_eq!(store.pending_count().unwrap(), 1);
    }

    #[test]
    fn test_resolve_pending_alert() {
        let dir = tempdir().unwrap();
        let store = AlertStore::open(dir.path().to_path_buf()).unwrap();
        let alert = fraud_alert();
        store.create(&alert).unwrap();
        let resolved = store
            .resolve(&alert.id, Some("checked".to_string()), Utc::now())
            .unwrap();
        assert_eq!(resolved.notes.as_deref(), Some("checked"));
        assert_eq!(store.pending_count().unwrap(), 0);
        assert!(!store.find_by_id(&alert.id).unwrap().unwrap().is_pending());
    }

    #[test]
    fn test_resolve_unknown_alert() {
        let dir = tempdir().unwrap();
        let store = AlertStore::open(dir.path().to_path_buf()).unwrap();
        let err = store.resolve("missing", None, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::AlertNotFound(_)));
    }

    #[test]
    fn test_concurrent_resolvers_only_one_wins() {
        let dir = tempdir().unwrap();
        let alert = fraud_alert();
        AlertStore::open(dir.path().to_path_buf())
            .unwrap()
            .create(&alert)
            .unwrap();

        let first = AlertStore::open(dir.path().to_path_buf()).unwrap();
        let second = AlertStore::open(dir.path().to_path_buf()).unwrap();
        let barrier = Barrier::new(2);
        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| {
                barrier.wait();
                first.resolve(&alert.id, Some("first".to_string()), Utc::now())
            });
            let b = s.spawn(|| {
                barrier.wait();
                second.resolve(&alert.id, Some("second".to_string()), Utc::now())
            });
            (a.join().unwrap(), b.join().unwrap())
        });

        let winner = match (a, b) {
            (Ok(won), Err(Error::AlertAlreadyResolved(_)))
            | (Err(Error::AlertAlreadyResolved(_)), Ok(won)) => won,
            other => panic!("expected exactly one winner, got {:?}", other),
        };
        let stored = first.find_by_id(&alert.id).unwrap().unwrap();
        assert_eq!(stored.notes, winner.notes);
        assert_eq!(stored.resolved_at, winner.resolved_at);
    }
}
