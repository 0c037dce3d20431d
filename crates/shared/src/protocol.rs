use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{DispenseRecord, LockStatus, MedicationId, Phase, SubjectId},
    error::ApiError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub display_name: String,
    pub role: String,
}

/// One row of the pending selection as the operator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLine {
    pub medication_id: MedicationId,
    pub display_name: String,
    pub dosage_label: String,
    pub quantity: u32,
    pub remaining_allowance: u32,
    pub stock_available: u32,
    /// Advisory only; enforced at confirm time.
    pub stock_shortfall: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLine {
    pub medication_id: MedicationId,
    pub display_name: String,
    pub dosage_label: String,
    pub instructions: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub subject: SubjectSummary,
    pub lines: Vec<ReviewLine>,
    pub total_units: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectSummary>,
    pub selection: Vec<SelectionLine>,
    pub lock_status: LockStatus,
    pub countdown_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub medication_id: MedicationId,
    pub delta: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CabinetEvent {
    PhaseChanged {
        phase: Phase,
    },
    SubjectBound {
        session_id: Uuid,
        subject: SubjectSummary,
    },
    SelectionChanged {
        line: SelectionLine,
    },
    Dispensed {
        record: DispenseRecord,
    },
    DispenseRolledBack {
        reason: String,
    },
    CountdownTick {
        remaining_seconds: u32,
    },
    LockStatusChanged {
        status: LockStatus,
    },
    Error(ApiError),
}
