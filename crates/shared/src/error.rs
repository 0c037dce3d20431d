use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MedicationId, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    DeviceUnavailable,
    NoMatch,
    InvalidPhase,
    EmptySelection,
    InsufficientStock,
    EntitlementExceeded,
    ActuatorError,
    AlreadyProcessing,
    LockFault,
    UnknownMedication,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_id: Option<MedicationId>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            medication_id: None,
        }
    }
}

/// Failures surfaced by the access and dispensing controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CabinetError {
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("no enrolled subject matched the capture")]
    NoMatch,
    #[error("`{operation}` is not allowed while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("select at least one medication before review")]
    EmptySelection,
    #[error("insufficient stock for {0}")]
    InsufficientStock(MedicationId),
    #[error("requested units exceed the remaining daily allowance for {0}")]
    EntitlementExceeded(MedicationId),
    #[error("lock actuator error: {0}")]
    ActuatorError(String),
    #[error("a dispense confirmation is already in progress")]
    AlreadyProcessing,
    #[error("lock status is in error and needs clearing before dispensing")]
    LockFault,
}

impl CabinetError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CabinetError::DeviceUnavailable(_) => ErrorCode::DeviceUnavailable,
            CabinetError::NoMatch => ErrorCode::NoMatch,
            CabinetError::InvalidPhase { .. } => ErrorCode::InvalidPhase,
            CabinetError::EmptySelection => ErrorCode::EmptySelection,
            CabinetError::InsufficientStock(_) => ErrorCode::InsufficientStock,
            CabinetError::EntitlementExceeded(_) => ErrorCode::EntitlementExceeded,
            CabinetError::ActuatorError(_) => ErrorCode::ActuatorError,
            CabinetError::AlreadyProcessing => ErrorCode::AlreadyProcessing,
            CabinetError::LockFault => ErrorCode::LockFault,
        }
    }

    /// Whether the caller can fix the condition and retry within the same
    /// cabinet cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CabinetError::DeviceUnavailable(_)
                | CabinetError::NoMatch
                | CabinetError::EmptySelection
                | CabinetError::InsufficientStock(_)
                | CabinetError::EntitlementExceeded(_)
        )
    }

    pub fn medication_id(&self) -> Option<&MedicationId> {
        match self {
            CabinetError::InsufficientStock(id) | CabinetError::EntitlementExceeded(id) => Some(id),
            _ => None,
        }
    }
}

impl From<&CabinetError> for ApiError {
    fn from(value: &CabinetError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
            medication_id: value.medication_id().cloned(),
        }
    }
}

impl From<CabinetError> for ApiError {
    fn from(value: CabinetError) -> Self {
        Self::from(&value)
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
