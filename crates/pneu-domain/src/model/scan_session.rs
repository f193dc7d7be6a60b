//! Step-by-step capture state for one verification attempt

use std::collections::BTreeMap;

use pneu_types::{TireObservation, TirePosition, VerificationError};

/// Tires captured so far plus a cursor on the slot to photograph next.
///
/// Positions may be captured in any order. Dropping the session discards
/// everything; nothing is persisted until the scan is finished.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    captured: BTreeMap<TirePosition, TireObservation>,
    current_index: usize,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next slot to capture, or `None` once all five are captured
    pub fn current_position(&self) -> Option<TirePosition> {
        let len = TirePosition::ALL.len();
        (0..len)
            .map(|offset| TirePosition::ALL[(self.current_index + offset) % len])
            .find(|p| !self.captured.contains_key(p))
    }

    /// Record an observation at its own position and move the cursor on.
    ///
    /// Re-capturing a position replaces the earlier observation.
    pub fn capture(&mut self, observation: TireObservation) {
        let position = observation.position;
        self.captured.insert(position, observation);
        self.current_index = (position.index() + 1) % TirePosition::ALL.len();
        if let Some(next) = self.current_position() {
            self.current_index = next.index();
        }
    }

    /// Drop one captured position and point the cursor at it
    pub fn retake(&mut self, position: TirePosition) -> Option<TireObservation> {
        self.current_index = position.index();
        self.captured.remove(&position)
    }

    pub fn get(&self, position: TirePosition) -> Option<&TireObservation> {
        self.captured.get(&position)
    }

    pub fn is_complete(&self) -> bool {
        self.captured.len() == TirePosition::ALL.len()
    }

    pub fn missing_positions(&self) -> Vec<TirePosition> {
        TirePosition::ALL
            .iter()
            .copied()
            .filter(|p| !self.captured.contains_key(p))
            .collect()
    }

    /// Hand over the full scan in slot order
    pub fn finish(self) -> Result<Vec<TireObservation>, VerificationError> {
        if !self.is_complete() {
            return Err(VerificationError::IncompleteScan {
                missing: self.missing_positions(),
            });
        }
        Ok(self.captured.into_values().collect())
    }
}
