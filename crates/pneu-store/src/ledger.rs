//! Verification ledger store

use std::path::PathBuf;

use tracing::info;

use pneu_domain::model::VerificationRecord;
use pneu_domain::repository::VerificationLedger;
use pneu_types::{Error, Plate, Result};

use crate::json_file::JsonMapFile;

/// Append-only store of verification records, keyed by record id
pub struct LedgerStore {
    file: JsonMapFile<VerificationRecord>,
}

impl LedgerStore {
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            file: JsonMapFile::open(&store_dir, "verifications.json")?,
        })
    }

    pub fn count(&self) -> Result<usize> {
        self.file.read(|records| records.len())
    }
}

impl VerificationLedger for LedgerStore {
    fn append(&self, record: &VerificationRecord) -> std::result::Result<(), Error> {
        let inserted = self.file.update(|records| {
            if records.contains_key(&record.id) {
                return Ok(false);
            }
            records.insert(record.id.clone(), record.clone());
            Ok(true)
        })?;
        if inserted {
            info!(
                id = %record.id,
                plate = %record.plate(),
                status = %record.status(),
                "verification recorded"
            );
        }
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<VerificationRecord>, Error> {
        self.file.read(|records| records.get(id).cloned())
    }

    fn find_by_plate(&self, plate: &Plate) -> std::result::Result<Vec<VerificationRecord>, Error> {
        let mut records: Vec<VerificationRecord> = self.file.read(|records| {
            records
                .values()
                .filter(|r| r.plate() == plate)
                .cloned()
                .collect()
        })?;
        records.sort_by(|a, b| b.result.created_at.cmp(&a.result.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pneu_domain::model::{VehicleBaseline, VerificationResult};
    use pneu_domain::service::classify;
    use pneu_types::{ManufactureWeek, ManufactureYear, TireObservation, TirePosition};
    use tempfile::tempdir;

    fn tires() -> Vec<TireObservation> {
        TirePosition::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| {
                TireObservation::dated(
                    *p,
                    ManufactureWeek::new(10 + i as u8).unwrap(),
                    ManufactureYear::new(20).unwrap(),
                )
            })
            .collect()
    }

    fn result(plate: &str, minutes: i64) -> VerificationResult {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let baseline = VehicleBaseline::new(Plate::parse(plate).unwrap(), tires(), start);
        classify(&baseline, &tires(), start + Duration::minutes(minutes)).unwrap()
    }

    #[test]
    fn test_history_by_plate_newest_first() {
        let dir = tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path().to_path_buf()).unwrap();
        let older = VerificationRecord::new(result("ABC1234", 1), None);
        let newer = VerificationRecord::new(result("ABC1234", 5), None);
        let other = VerificationRecord::new(result("XYZ9876", 3), None);
        for r in [&older, &newer, &other] {
            ledger.append(r).unwrap();
        }

        let history = ledger.find_by_plate(&Plate::parse("abc-1234").unwrap()).unwrap();
        let ids: Vec<_> = history.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![newer.id.clone(), older.id.clone()]);
    }

    #[test]
    fn test_append_is_idempotent_and_immutable() {
        let dir = tempdir().unwrap();
        let ledger = LedgerStore::open(dir.path().to_path_buf()).unwrap();
        let record = VerificationRecord::new(result("ABC1234", 1), Some("ana".to_string()));
        ledger.append(&record).unwrap();

        let mut tampered = record.clone();
        tampered.operator = Some("someone else".to_string());
        ledger.append(&tampered).unwrap();

        assert_eq!(ledger.count().unwrap(), 1);
        let stored = ledger.find_by_id(&record.id).unwrap().unwrap();
        assert_eq!(stored.operator.as_deref(), Some("ana"));
    }
}
