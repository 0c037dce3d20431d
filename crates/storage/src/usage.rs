use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::domain::{MedicationId, SubjectId};

type UsageKey = (SubjectId, MedicationId, NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct UsageReceipt {
    lines: Vec<(UsageKey, u32)>,
}

/// Units this cabinet has dispensed per subject, medication and day.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    units: BTreeMap<UsageKey, u32>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units_on(&self, subject_id: &SubjectId, medication_id: &MedicationId, day: NaiveDate) -> u32 {
        self.units
            .get(&(subject_id.clone(), medication_id.clone(), day))
            .copied()
            .unwrap_or(0)
    }

    /// Records dispensed units and drops counts from earlier days.
    pub fn credit(
        &mut self,
        subject_id: &SubjectId,
        items: &[(MedicationId, u32)],
        day: NaiveDate,
    ) -> UsageReceipt {
        self.units.retain(|(_, _, recorded), _| *recorded >= day);

        let mut lines = Vec::with_capacity(items.len());
        for (medication_id, quantity) in items {
            if *quantity == 0 {
                continue;
            }
            let key = (subject_id.clone(), medication_id.clone(), day);
            let total = self.units.entry(key.clone()).or_insert(0);
            *total = total.saturating_add(*quantity);
            lines.push((key, *quantity));
        }
        UsageReceipt { lines }
    }

    pub fn revert(&mut self, receipt: UsageReceipt) {
        for (key, quantity) in receipt.lines {
            if let Some(total) = self.units.get_mut(&key) {
                *total = total.saturating_sub(quantity);
                if *total == 0 {
                    self.units.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/usage_tests.rs"]
mod tests;
