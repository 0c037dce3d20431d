//! Resupply forecasting over stock records. Every function here is pure:
//! the same records, settings and date always produce the same report.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::domain::{MedicationId, StockRecord};

pub const DEFAULT_HORIZON_DAYS: u32 = 180;
pub const DEFAULT_SAFETY_MARGIN_FRACTION: f64 = 0.3;
/// Stock below this multiple of predicted need is reported as low.
pub const LOW_STOCK_FACTOR: f64 = 1.5;
pub const COVERAGE_RATIO_CAP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub horizon_days: u32,
    pub safety_margin_fraction: f64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            safety_margin_fraction: DEFAULT_SAFETY_MARGIN_FRACTION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Good,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResupplyLine {
    pub medication_id: MedicationId,
    pub current_units: u32,
    pub weekly_usage_rate: f64,
    pub predicted_need: f64,
    pub reorder_qty: u32,
    pub status: StockStatus,
    /// `current_units / predicted_need`, capped at [`COVERAGE_RATIO_CAP`].
    pub coverage_ratio: f64,
    pub expiry_date: NaiveDate,
    pub expires_before_resupply: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResupplyReport {
    pub as_of: NaiveDate,
    pub horizon_days: u32,
    pub lines: Vec<ResupplyLine>,
    pub critical_count: usize,
    pub low_count: usize,
}

impl ResupplyReport {
    pub fn line(&self, medication_id: &MedicationId) -> Option<&ResupplyLine> {
        self.lines
            .iter()
            .find(|line| &line.medication_id == medication_id)
    }
}

pub fn weeks_in_horizon(horizon_days: u32) -> u32 {
    horizon_days.div_ceil(7)
}

pub fn forecast_line(
    record: &StockRecord,
    settings: &ForecastSettings,
    as_of: NaiveDate,
) -> ResupplyLine {
    let weekly_usage_rate = record.weekly_usage_rate.max(0.0);
    let margin = settings.safety_margin_fraction.max(0.0);
    let current = f64::from(record.current_units);

    let predicted_need = weekly_usage_rate * f64::from(weeks_in_horizon(settings.horizon_days));
    let safety_buffer = (predicted_need * margin).ceil();
    let shortfall = predicted_need + safety_buffer - current;
    let reorder_qty = if shortfall > 0.0 {
        shortfall.ceil().min(f64::from(u32::MAX)) as u32
    } else {
        0
    };

    let status = if current < predicted_need {
        StockStatus::Critical
    } else if current < predicted_need * LOW_STOCK_FACTOR {
        StockStatus::Low
    } else {
        StockStatus::Good
    };

    let coverage_ratio = if predicted_need > 0.0 {
        (current / predicted_need).min(COVERAGE_RATIO_CAP)
    } else {
        COVERAGE_RATIO_CAP
    };

    let expires_before_resupply = as_of
        .checked_add_days(Days::new(u64::from(settings.horizon_days)))
        .map(|resupply_date| record.expiry_date < resupply_date)
        .unwrap_or(false);

    ResupplyLine {
        medication_id: record.medication_id.clone(),
        current_units: record.current_units,
        weekly_usage_rate,
        predicted_need,
        reorder_qty,
        status,
        coverage_ratio,
        expiry_date: record.expiry_date,
        expires_before_resupply,
    }
}

pub fn forecast<'a>(
    records: impl IntoIterator<Item = &'a StockRecord>,
    settings: &ForecastSettings,
    as_of: NaiveDate,
) -> ResupplyReport {
    let lines: Vec<ResupplyLine> = records
        .into_iter()
        .map(|record| forecast_line(record, settings, as_of))
        .collect();
    let critical_count = lines
        .iter()
        .filter(|line| line.status == StockStatus::Critical)
        .count();
    let low_count = lines
        .iter()
        .filter(|line| line.status == StockStatus::Low)
        .count();

    ResupplyReport {
        as_of,
        horizon_days: settings.horizon_days,
        lines,
        critical_count,
        low_count,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
