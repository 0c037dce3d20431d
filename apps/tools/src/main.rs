use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use cabinet_core::{CabinetController, CabinetDevices, ControllerSettings};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use forecast::{ForecastSettings, StockStatus};
use hardware::simulated::{RandomMatcher, SimulatedCamera, SimulatedLock};
use shared::{domain::LockStatus, protocol::CabinetEvent};
use storage::seed;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser, Debug)]
#[command(about = "Operator tools for the medication cabinet")]
struct Cli {
    /// Log controller activity at info level.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resupply report over the seed stock.
    Forecast {
        #[arg(long, default_value_t = forecast::DEFAULT_HORIZON_DAYS)]
        horizon_days: u32,
        #[arg(long, default_value_t = forecast::DEFAULT_SAFETY_MARGIN_FRACTION)]
        safety_margin: f64,
        /// Report date, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// One scripted dispense against simulated hardware, printing every event.
    Simulate {
        #[arg(long, default_value_t = 1)]
        units: u32,
        #[arg(long, default_value_t = 100)]
        tick_millis: u64,
        #[arg(long, default_value_t = 5)]
        unlock_seconds: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Forecast {
            horizon_days,
            safety_margin,
            as_of,
            json,
        } => {
            if horizon_days == 0 || !safety_margin.is_finite() || safety_margin < 0.0 {
                bail!("horizon must be at least one day and the safety margin non-negative");
            }
            let settings = ForecastSettings {
                horizon_days,
                safety_margin_fraction: safety_margin,
            };
            let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
            let stock = seed::initial_stock();
            let report = forecast::forecast(&stock, &settings, as_of);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!(
                "resupply report as of {} ({} day horizon)",
                report.as_of, report.horizon_days
            );
            println!(
                "{:<14} {:>7} {:>9} {:>8} {:<8} {:>6}  expiry",
                "medication", "stock", "predicted", "reorder", "status", "cover"
            );
            for line in &report.lines {
                let expiry_flag = if line.expires_before_resupply { " !" } else { "" };
                println!(
                    "{:<14} {:>7} {:>9.1} {:>8} {:<8} {:>5.0}%  {}{}",
                    line.medication_id,
                    line.current_units,
                    line.predicted_need,
                    line.reorder_qty,
                    status_label(line.status),
                    line.coverage_ratio * 100.0,
                    line.expiry_date,
                    expiry_flag
                );
            }
            println!(
                "critical={} low={}",
                report.critical_count, report.low_count
            );
        }
        Command::Simulate {
            units,
            tick_millis,
            unlock_seconds,
        } => {
            if units == 0 || tick_millis == 0 || unlock_seconds == 0 {
                bail!("units, tick-millis and unlock-seconds must all be at least 1");
            }
            simulate(units, Duration::from_millis(tick_millis), unlock_seconds).await?;
        }
    }

    Ok(())
}

fn status_label(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Critical => "critical",
        StockStatus::Low => "low",
        StockStatus::Good => "good",
    }
}

async fn simulate(units: u32, tick: Duration, unlock_seconds: u32) -> Result<()> {
    let controller = CabinetController::new(
        ControllerSettings {
            unlock_duration_seconds: unlock_seconds,
            tick,
            ..ControllerSettings::default()
        },
        CabinetDevices {
            camera: Arc::new(SimulatedCamera::new()),
            matcher: Arc::new(RandomMatcher::new(
                seed::enrolled_subjects(),
                Duration::from_millis(300),
            )),
            lock: Arc::new(SimulatedLock::new()),
        },
        seed::initial_stock(),
    );
    let mut events = controller.subscribe_events();

    controller.begin_capture().await?;
    let subject = controller.identify().await?;
    println!("identified {} ({})", subject.display_name, subject.role);

    let snapshot = controller.snapshot().await;
    let Some(line) = snapshot
        .selection
        .iter()
        .find(|line| line.remaining_allowance > 0)
    else {
        controller.cancel().await?;
        bail!("{} has no allowance left today", subject.display_name);
    };
    let medication_id = line.medication_id.clone();
    for _ in 0..units {
        controller.adjust(&medication_id, 1).await?;
    }

    let review = controller.review().await?;
    for line in &review.lines {
        println!(
            "review: {} x{} {} ({})",
            line.quantity, line.display_name, line.dosage_label, line.instructions
        );
    }
    let record = controller
        .confirm()
        .await
        .context("dispense was not authorized")?;
    println!(
        "dispense #{} recorded: {} units",
        record.id.0,
        record.total_units()
    );

    // Drain until the countdown has expired and the re-lock has answered.
    loop {
        match events.recv().await {
            Ok(event) => {
                println!("{}", serde_json::to_string(&event)?);
                if let CabinetEvent::LockStatusChanged {
                    status: LockStatus::Locked | LockStatus::Error,
                } = event
                {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                println!("(skipped {skipped} events)");
            }
            Err(RecvError::Closed) => break,
        }
    }

    let remaining = controller
        .inventory()
        .await
        .into_iter()
        .find(|record| record.medication_id == medication_id)
        .map(|record| record.current_units)
        .unwrap_or(0);
    println!(
        "{medication_id}: {remaining} units left, lock {:?}",
        controller.lock_status().await
    );
    Ok(())
}
