//! Use cases

pub mod alert_service;
pub mod capture_service;
pub mod import_service;
pub mod query_service;
pub mod registration_service;
pub mod verification_service;

pub use alert_service::{list_alerts, resolve_alert, AlertFilter};
pub use capture_service::{load_observations, CaptureService};
pub use import_service::{import_fleet_csv, ImportSummary};
pub use query_service::{find_vehicle, list_vehicles, verification_history};
pub use registration_service::{read_plate, RegistrationService};
pub use verification_service::{
    EffectReport, EffectStatus, VerificationOutcome, VerificationService,
};
