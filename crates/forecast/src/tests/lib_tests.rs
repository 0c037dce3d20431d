use super::*;

fn record(id: &str, units: u32, rate: f64) -> StockRecord {
    StockRecord {
        medication_id: MedicationId::new(id),
        current_units: units,
        weekly_usage_rate: rate,
        expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30).expect("date"),
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("date")
}

#[test]
fn default_horizon_spans_twenty_six_weeks() {
    assert_eq!(weeks_in_horizon(180), 26);
    assert_eq!(weeks_in_horizon(7), 1);
    assert_eq!(weeks_in_horizon(8), 2);
}

#[test]
fn ibuprofen_needs_reorder_over_default_horizon() {
    let line = forecast_line(&record("ibuprofen", 245, 12.0), &ForecastSettings::default(), as_of());

    assert_eq!(line.predicted_need, 312.0);
    // 312 + ceil(93.6) - 245
    assert_eq!(line.reorder_qty, 161);
    assert_eq!(line.status, StockStatus::Critical);
    assert!((line.coverage_ratio - 245.0 / 312.0).abs() < 1e-9);
}

#[test]
fn status_thresholds_follow_predicted_need() {
    let settings = ForecastSettings {
        horizon_days: 7,
        safety_margin_fraction: 0.3,
    };

    let critical = forecast_line(&record("a", 9, 10.0), &settings, as_of());
    let low = forecast_line(&record("a", 14, 10.0), &settings, as_of());
    let good = forecast_line(&record("a", 15, 10.0), &settings, as_of());

    assert_eq!(critical.status, StockStatus::Critical);
    assert_eq!(low.status, StockStatus::Low);
    assert_eq!(good.status, StockStatus::Good);
    assert_eq!(good.reorder_qty, 0);
    assert_eq!(good.coverage_ratio, COVERAGE_RATIO_CAP);
}

#[test]
fn zero_predicted_need_caps_ratio_instead_of_dividing() {
    let line = forecast_line(&record("spare", 0, 0.0), &ForecastSettings::default(), as_of());

    assert_eq!(line.predicted_need, 0.0);
    assert_eq!(line.coverage_ratio, COVERAGE_RATIO_CAP);
    assert!(line.coverage_ratio.is_finite());
    assert_eq!(line.reorder_qty, 0);
    assert_eq!(line.status, StockStatus::Good);
}

#[test]
fn fractional_need_rounds_reorder_up_to_whole_units() {
    let settings = ForecastSettings {
        horizon_days: 7,
        safety_margin_fraction: 0.0,
    };
    let line = forecast_line(&record("a", 0, 2.5), &settings, as_of());
    assert_eq!(line.reorder_qty, 3);
}

#[test]
fn forecast_is_repeatable_and_isolates_changes() {
    let settings = ForecastSettings::default();
    let mut stock = vec![
        record("ibuprofen", 245, 12.0),
        record("melatonin", 15, 5.0),
        record("antibiotic", 500, 2.0),
    ];

    let first = forecast(&stock, &settings, as_of());
    let second = forecast(&stock, &settings, as_of());
    assert_eq!(first, second);

    stock[0].current_units = 1_000;
    let changed = forecast(&stock, &settings, as_of());

    assert_ne!(changed.lines[0].status, first.lines[0].status);
    assert_ne!(changed.lines[0].reorder_qty, first.lines[0].reorder_qty);
    assert_eq!(changed.lines[1], first.lines[1]);
    assert_eq!(changed.lines[2], first.lines[2]);
}

#[test]
fn report_counts_and_expiry_flags() {
    let mut short_dated = record("antibiotic", 50, 2.0);
    short_dated.expiry_date = NaiveDate::from_ymd_opt(2026, 12, 1).expect("date");
    let stock = vec![short_dated, record("vitamin_d", 1_000, 15.0), record("melatonin", 15, 5.0)];

    let report = forecast(&stock, &ForecastSettings::default(), as_of());

    assert_eq!(report.horizon_days, 180);
    assert_eq!(report.critical_count, 2);
    assert_eq!(report.low_count, 0);
    let antibiotic = report
        .line(&MedicationId::new("antibiotic"))
        .expect("antibiotic line");
    assert!(antibiotic.expires_before_resupply);
    assert!(!report
        .line(&MedicationId::new("vitamin_d"))
        .expect("vitamin line")
        .expires_before_resupply);
}

#[test]
fn report_serializes_status_as_snake_case() {
    let report = forecast(&[record("a", 0, 1.0)], &ForecastSettings::default(), as_of());
    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(json["lines"][0]["status"], "critical");
}
