//! Alert review

use chrono::Utc;
use tracing::info;

use pneu_domain::model::Alert;
use pneu_domain::repository::AlertRepository;
use pneu_types::{Plate, Result};

#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Case-insensitive plate substring
    pub plate: Option<String>,
    pub pending_only: bool,
}

impl AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        if self.pending_only && !alert.is_pending() {
            return false;
        }
        match &self.plate {
            Some(needle) => alert.plate.as_str().contains(&Plate::normalize(needle)),
            None => true,
        }
    }
}

/// Alerts newest first
pub fn list_alerts(alerts: &dyn AlertRepository, filter: &AlertFilter) -> Result<Vec<Alert>> {
    Ok(alerts
        .find_all()?
        .into_iter()
        .filter(|a| filter.matches(a))
        .collect())
}

/// Close a pending alert with the reviewer's notes
pub fn resolve_alert(
    alerts: &dyn AlertRepository,
    id: &str,
    notes: Option<String>,
) -> Result<Alert> {
    let alert = alerts.resolve(id, notes, Utc::now())?;
    info!(id = %alert.id, plate = %alert.plate, "alert resolved");
    Ok(alert)
}
