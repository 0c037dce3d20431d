use chrono::NaiveDate;
use shared::{
    domain::{MedicationEntitlement, MedicationId, Subject},
    protocol::SubjectSummary,
};
use storage::UsageLedger;
use tracing::warn;

/// Immutable copy of a subject's entitlements taken when the subject is
/// bound to a session. Later changes to the enrolled record do not reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormularySnapshot {
    subject: SubjectSummary,
    entries: Vec<MedicationEntitlement>,
}

impl FormularySnapshot {
    pub fn subject(&self) -> &SubjectSummary {
        &self.subject
    }

    pub fn entries(&self) -> &[MedicationEntitlement] {
        &self.entries
    }

    pub fn entitlement(&self, medication_id: &MedicationId) -> Option<&MedicationEntitlement> {
        self.entries
            .iter()
            .find(|entry| &entry.medication_id == medication_id)
    }
}

/// Builds the session formulary for `subject`. Units this cabinet already
/// dispensed to the subject on `today` count towards `taken_today`.
pub fn resolve(subject: &Subject, usage: &UsageLedger, today: NaiveDate) -> FormularySnapshot {
    let mut entries: Vec<MedicationEntitlement> = Vec::with_capacity(subject.formulary.len());
    for entry in &subject.formulary {
        if entries
            .iter()
            .any(|seen| seen.medication_id == entry.medication_id)
        {
            warn!(subject = %subject.id, medication = %entry.medication_id, "formulary: duplicate entitlement ignored");
            continue;
        }
        let dispensed_here = usage.units_on(&subject.id, &entry.medication_id, today);
        let mut entry = entry.clone();
        entry.taken_today = entry
            .taken_today
            .saturating_add(dispensed_here)
            .min(entry.daily_limit);
        entries.push(entry);
    }

    FormularySnapshot {
        subject: SubjectSummary {
            subject_id: subject.id.clone(),
            display_name: subject.display_name.clone(),
            role: subject.role.clone(),
        },
        entries,
    }
}
