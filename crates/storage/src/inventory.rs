use std::collections::BTreeMap;

use shared::domain::{MedicationId, StockRecord};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient stock for {medication_id}: requested {requested}, available {available}")]
    InsufficientStock {
        medication_id: MedicationId,
        requested: u32,
        available: u32,
    },
    #[error("no stock record for {0}")]
    UnknownMedication(MedicationId),
}

/// Proof of a completed debit; handing it back to [`InventoryLedger::restore`]
/// undoes exactly that debit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct DebitReceipt {
    lines: Vec<(MedicationId, u32)>,
}

impl DebitReceipt {
    pub fn lines(&self) -> &[(MedicationId, u32)] {
        &self.lines
    }
}

/// Stock levels, one record per medication id. The only mutation paths are
/// an all-or-nothing debit, its restore, and restocking.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    records: BTreeMap<MedicationId, StockRecord>,
}

impl InventoryLedger {
    pub fn new(records: impl IntoIterator<Item = StockRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.medication_id.clone(), record))
            .collect();
        Self { records }
    }

    pub fn get(&self, medication_id: &MedicationId) -> Option<&StockRecord> {
        self.records.get(medication_id)
    }

    /// Current units for `medication_id`; an untracked medication has none.
    pub fn units(&self, medication_id: &MedicationId) -> u32 {
        self.records
            .get(medication_id)
            .map(|record| record.current_units)
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<StockRecord> {
        self.records.values().cloned().collect()
    }

    /// Validates a debit without applying it. Reports the first shortfall in
    /// request order.
    pub fn check(&self, items: &[(MedicationId, u32)]) -> Result<(), LedgerError> {
        let mut wanted: BTreeMap<&MedicationId, u32> = BTreeMap::new();
        let mut order = Vec::new();
        for (medication_id, units) in items {
            let total = wanted.entry(medication_id).or_insert_with(|| {
                order.push(medication_id);
                0
            });
            *total = total.saturating_add(*units);
        }

        for medication_id in order {
            let requested = wanted[medication_id];
            let available = self.units(medication_id);
            if requested > available {
                return Err(LedgerError::InsufficientStock {
                    medication_id: medication_id.clone(),
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    pub fn debit(&mut self, items: &[(MedicationId, u32)]) -> Result<DebitReceipt, LedgerError> {
        self.check(items)?;

        let mut lines = Vec::with_capacity(items.len());
        for (medication_id, units) in items {
            if *units == 0 {
                continue;
            }
            if let Some(record) = self.records.get_mut(medication_id) {
                record.current_units -= units;
                debug!(medication = %medication_id, units, left = record.current_units, "inventory: debited");
                lines.push((medication_id.clone(), *units));
            }
        }
        Ok(DebitReceipt { lines })
    }

    pub fn restore(&mut self, receipt: DebitReceipt) {
        for (medication_id, units) in receipt.lines {
            if let Some(record) = self.records.get_mut(&medication_id) {
                record.current_units = record.current_units.saturating_add(units);
                debug!(medication = %medication_id, units, "inventory: debit restored");
            }
        }
    }

    pub fn restock(&mut self, medication_id: &MedicationId, units: u32) -> Result<u32, LedgerError> {
        let record = self
            .records
            .get_mut(medication_id)
            .ok_or_else(|| LedgerError::UnknownMedication(medication_id.clone()))?;
        record.current_units = record.current_units.saturating_add(units);
        info!(medication = %medication_id, units, total = record.current_units, "inventory: restocked");
        Ok(record.current_units)
    }
}

#[cfg(test)]
#[path = "tests/inventory_tests.rs"]
mod tests;
