use super::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("date")
}

#[test]
fn credit_accumulates_per_day_and_revert_undoes_it() {
    let subject = SubjectId::new("astronaut_1");
    let ibuprofen = MedicationId::new("ibuprofen");
    let mut usage = UsageLedger::new();

    let _ = usage.credit(&subject, &[(ibuprofen.clone(), 2)], day(18));
    let receipt = usage.credit(&subject, &[(ibuprofen.clone(), 1)], day(18));
    assert_eq!(usage.units_on(&subject, &ibuprofen, day(18)), 3);

    usage.revert(receipt);
    assert_eq!(usage.units_on(&subject, &ibuprofen, day(18)), 2);
}

#[test]
fn counts_roll_over_at_day_boundary() {
    let subject = SubjectId::new("astronaut_1");
    let melatonin = MedicationId::new("melatonin");
    let mut usage = UsageLedger::new();

    let _ = usage.credit(&subject, &[(melatonin.clone(), 2)], day(17));
    assert_eq!(usage.units_on(&subject, &melatonin, day(18)), 0);

    let _ = usage.credit(&subject, &[(melatonin.clone(), 1)], day(18));
    assert_eq!(usage.units_on(&subject, &melatonin, day(17)), 0);
    assert_eq!(usage.units_on(&subject, &melatonin, day(18)), 1);
}
