use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SubjectId);
id_newtype!(MedicationId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispenseId(pub u64);

/// A medication a subject may take, with its per-day cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntitlement {
    pub medication_id: MedicationId,
    pub display_name: String,
    pub dosage_label: String,
    pub frequency_label: String,
    pub daily_limit: u32,
    pub taken_today: u32,
    pub instructions: String,
}

impl MedicationEntitlement {
    /// Units still allowed today. Never negative even if the source record
    /// reports more taken than the limit.
    pub fn remaining(&self) -> u32 {
        self.daily_limit.saturating_sub(self.taken_today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub display_name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    pub formulary: Vec<MedicationEntitlement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub medication_id: MedicationId,
    pub current_units: u32,
    pub weekly_usage_rate: f64,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispensedItem {
    pub medication_id: MedicationId,
    pub display_name: String,
    pub dosage_label: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispenseOutcome {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenseRecord {
    pub id: DispenseId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub items: Vec<DispensedItem>,
    pub timestamp: DateTime<Utc>,
    pub outcome: DispenseOutcome,
}

impl DispenseRecord {
    pub fn total_units(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Capturing,
    Identifying,
    Selecting,
    ReviewPending,
    Unlocked,
}

impl Phase {
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            Phase::Capturing | Phase::Identifying | Phase::Selecting | Phase::ReviewPending
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    #[default]
    Locked,
    Unlocked,
    Error,
}
