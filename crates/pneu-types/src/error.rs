//! Error types for pneu-checker

use thiserror::Error;

use crate::TirePosition;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Extractor command is not configured")]
    ExtractorNotConfigured,
}

/// Input errors raised before any classification happens.
///
/// None of these leave side effects behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Incomplete scan: missing {}", format_positions(missing))]
    IncompleteScan { missing: Vec<TirePosition> },

    #[error("Duplicate tire position in scan: {0}")]
    DuplicatePosition(TirePosition),

    #[error("Invalid baseline: {0}")]
    InvalidBaseline(String),
}

fn format_positions(positions: &[TirePosition]) -> String {
    positions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Attribute extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid plate: {0}")]
    InvalidPlate(String),

    #[error("Invalid tire field: {0}")]
    InvalidField(String),

    #[error("No vehicle registered with plate {0}")]
    VehicleNotFound(String),

    #[error("Vehicle with plate {0} is already registered")]
    VehicleExists(String),

    #[error("Tire at {0} has no readable manufacture week/year")]
    UnreadableFingerprint(TirePosition),

    #[error("Baseline for {plate} changed concurrently (expected version {expected}, found {found})")]
    StaleBaseline {
        plate: String,
        expected: u64,
        found: u64,
    },

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Alert {0} is already resolved")]
    AlertAlreadyResolved(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),
}

impl Error {
    /// Collaborator and persistence failures the caller may retry as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Extraction(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
