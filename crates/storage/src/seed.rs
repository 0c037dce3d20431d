//! Fixture crew and stock used by the simulated deployment.

use chrono::NaiveDate;
use shared::domain::{MedicationEntitlement, MedicationId, StockRecord, Subject, SubjectId};

fn entitlement(
    id: &str,
    name: &str,
    dosage: &str,
    frequency: &str,
    daily_limit: u32,
    taken_today: u32,
    instructions: &str,
) -> MedicationEntitlement {
    MedicationEntitlement {
        medication_id: MedicationId::new(id),
        display_name: name.to_string(),
        dosage_label: dosage.to_string(),
        frequency_label: frequency.to_string(),
        daily_limit,
        taken_today,
        instructions: instructions.to_string(),
    }
}

fn vitamin_d() -> MedicationEntitlement {
    entitlement(
        "vitamin_d",
        "Vitamin D",
        "1000 IU",
        "Daily",
        1,
        1,
        "Take with breakfast.",
    )
}

pub fn enrolled_subjects() -> Vec<Subject> {
    vec![
        Subject {
            id: SubjectId::new("astronaut_1"),
            display_name: "Commander Sarah Chen".to_string(),
            role: "Mission Commander".to_string(),
            last_access: None,
            formulary: vec![
                entitlement(
                    "ibuprofen",
                    "Ibuprofen",
                    "200mg",
                    "As needed",
                    6,
                    2,
                    "Take with food. Maximum 1200mg per day.",
                ),
                entitlement(
                    "antihistamine",
                    "Antihistamine",
                    "10mg",
                    "Daily",
                    1,
                    0,
                    "Take before sleep if drowsiness occurs.",
                ),
                vitamin_d(),
            ],
        },
        Subject {
            id: SubjectId::new("astronaut_2"),
            display_name: "Dr. Michael Torres".to_string(),
            role: "Medical Officer".to_string(),
            last_access: None,
            formulary: vec![
                entitlement(
                    "melatonin",
                    "Melatonin",
                    "3mg",
                    "Before sleep",
                    2,
                    0,
                    "Take 30 minutes before bedtime.",
                ),
                vitamin_d(),
            ],
        },
    ]
}

fn stock(id: &str, units: u32, weekly_usage_rate: f64, expiry: (i32, u32, u32)) -> StockRecord {
    let (year, month, day) = expiry;
    StockRecord {
        medication_id: MedicationId::new(id),
        current_units: units,
        weekly_usage_rate,
        expiry_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX),
    }
}

pub fn initial_stock() -> Vec<StockRecord> {
    vec![
        stock("ibuprofen", 245, 12.0, (2026, 3, 15)),
        stock("antihistamine", 30, 8.0, (2025, 12, 20)),
        stock("melatonin", 15, 5.0, (2026, 1, 10)),
        stock("vitamin_d", 180, 15.0, (2026, 6, 30)),
        stock("antibiotic", 50, 2.0, (2025, 11, 15)),
    ]
}
