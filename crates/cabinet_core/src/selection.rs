use std::collections::BTreeMap;

use shared::domain::MedicationId;

use crate::formulary::FormularySnapshot;

/// Pending quantities for one session. Keys are always a subset of the bound
/// formulary, and no quantity exceeds that entitlement's remaining allowance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    quantities: BTreeMap<MedicationId, u32>,
}

impl Selection {
    pub fn for_formulary(formulary: &FormularySnapshot) -> Self {
        let quantities = formulary
            .entries()
            .iter()
            .map(|entry| (entry.medication_id.clone(), 0))
            .collect();
        Self { quantities }
    }

    pub fn quantity(&self, medication_id: &MedicationId) -> u32 {
        self.quantities.get(medication_id).copied().unwrap_or(0)
    }

    /// Applies `delta` clamped to `[0, remaining allowance]`. Returns `None`
    /// and leaves the selection untouched for medications outside the
    /// formulary.
    pub fn adjust(
        &mut self,
        formulary: &FormularySnapshot,
        medication_id: &MedicationId,
        delta: i32,
    ) -> Option<u32> {
        let entitlement = formulary.entitlement(medication_id)?;
        let slot = self.quantities.get_mut(medication_id)?;

        let ceiling = i64::from(entitlement.remaining());
        let next = (i64::from(*slot) + i64::from(delta)).clamp(0, ceiling);
        *slot = u32::try_from(next).unwrap_or(0);
        Some(*slot)
    }

    pub fn total_units(&self) -> u32 {
        self.quantities
            .values()
            .fold(0u32, |sum, qty| sum.saturating_add(*qty))
    }

    pub fn is_empty(&self) -> bool {
        self.total_units() == 0
    }

    /// Non-zero lines in formulary order.
    pub fn requested(&self, formulary: &FormularySnapshot) -> Vec<(MedicationId, u32)> {
        formulary
            .entries()
            .iter()
            .filter_map(|entry| {
                let qty = self.quantity(&entry.medication_id);
                (qty > 0).then(|| (entry.medication_id.clone(), qty))
            })
            .collect()
    }
}
