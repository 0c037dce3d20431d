use chrono::{NaiveDate, Utc};
use shared::domain::{DispensedItem, MedicationId};
use storage::{seed, AuditLog, InventoryLedger, NewDispense, UsageLedger};

#[test]
fn seeded_crew_formularies_are_backed_by_stock_records() {
    let inventory = InventoryLedger::new(seed::initial_stock());

    for subject in seed::enrolled_subjects() {
        for entry in &subject.formulary {
            assert!(
                inventory.get(&entry.medication_id).is_some(),
                "{} has no stock record",
                entry.medication_id
            );
            assert!(entry.taken_today <= entry.daily_limit);
        }
    }
}

#[test]
fn debit_audit_and_usage_roll_back_together() {
    let mut inventory = InventoryLedger::new(seed::initial_stock());
    let mut audit = AuditLog::new(2);
    let mut usage = UsageLedger::new();
    let crew = seed::enrolled_subjects();
    let commander = &crew[0];
    let ibuprofen = MedicationId::new("ibuprofen");
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");

    let stock_before = inventory.snapshot();
    let items = vec![(ibuprofen.clone(), 3)];

    let debit = inventory.debit(&items).expect("debit");
    let appended = audit.append(NewDispense {
        subject_id: commander.id.clone(),
        subject_name: commander.display_name.clone(),
        items: vec![DispensedItem {
            medication_id: ibuprofen.clone(),
            display_name: "Ibuprofen".to_string(),
            dosage_label: "200mg".to_string(),
            quantity: 3,
        }],
        timestamp: Utc::now(),
    });
    let credited = usage.credit(&commander.id, &items, today);

    assert_eq!(inventory.units(&ibuprofen), 242);
    assert_eq!(usage.units_on(&commander.id, &ibuprofen, today), 3);

    inventory.restore(debit);
    assert!(audit.retract(appended).is_some());
    usage.revert(credited);

    assert_eq!(inventory.snapshot(), stock_before);
    assert!(audit.is_empty());
    assert_eq!(usage.units_on(&commander.id, &ibuprofen, today), 0);
}
