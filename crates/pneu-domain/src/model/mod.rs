//! Domain model types

pub mod alert;
pub mod baseline;
pub mod scan_session;
pub mod tire_set;
pub mod verification;

pub use alert::{Alert, AlertDetails, AlertKind, AlertSeverity, AlertStatus};
pub use baseline::VehicleBaseline;
pub use scan_session::ScanSession;
pub use tire_set::TireSet;
pub use verification::{
    AnnotatedTire, TireStatus, VerificationRecord, VerificationResult, VerificationStatus,
};
