use std::{fs, path::Path, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use cabinet_core::ControllerSettings;
use forecast::ForecastSettings;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "cabinet.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: String,
    pub unlock_duration_seconds: u32,
    pub resupply_horizon_days: u32,
    pub safety_margin_fraction: f64,
    pub audit_ring_size: usize,
    pub tick_millis: u64,
    pub identify_timeout_millis: u64,
    pub recognition_latency_millis: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            unlock_duration_seconds: cabinet_core::DEFAULT_UNLOCK_DURATION_SECONDS,
            resupply_horizon_days: forecast::DEFAULT_HORIZON_DAYS,
            safety_margin_fraction: forecast::DEFAULT_SAFETY_MARGIN_FRACTION,
            audit_ring_size: storage::DEFAULT_AUDIT_RING_SIZE,
            tick_millis: 1000,
            identify_timeout_millis: 5000,
            recognition_latency_millis: 1500,
        }
    }
}

impl Settings {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            unlock_duration_seconds: self.unlock_duration_seconds,
            tick: Duration::from_millis(self.tick_millis),
            audit_ring_size: self.audit_ring_size,
            identify_timeout: Duration::from_millis(self.identify_timeout_millis),
        }
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            horizon_days: self.resupply_horizon_days,
            safety_margin_fraction: self.safety_margin_fraction,
        }
    }

    pub fn recognition_latency(&self) -> Duration {
        Duration::from_millis(self.recognition_latency_millis)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.unlock_duration_seconds == 0 {
            bail!("unlock_duration_seconds must be at least 1");
        }
        if self.resupply_horizon_days == 0 {
            bail!("resupply_horizon_days must be at least 1");
        }
        if !self.safety_margin_fraction.is_finite() || self.safety_margin_fraction < 0.0 {
            bail!(
                "safety_margin_fraction must be a non-negative number, got {}",
                self.safety_margin_fraction
            );
        }
        if self.audit_ring_size == 0 {
            bail!("audit_ring_size must be at least 1");
        }
        if self.tick_millis == 0 || self.identify_timeout_millis == 0 {
            bail!("tick_millis and identify_timeout_millis must be at least 1");
        }
        Ok(())
    }
}

/// Keys accepted in `cabinet.toml`; anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_addr: Option<String>,
    unlock_duration_seconds: Option<u32>,
    resupply_horizon_days: Option<u32>,
    safety_margin_fraction: Option<f64>,
    audit_ring_size: Option<usize>,
    tick_millis: Option<u64>,
    identify_timeout_millis: Option<u64>,
    recognition_latency_millis: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists, then `APP__*` overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        apply_file(&mut settings, file_cfg);
    }

    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    override_parsed(&env, "APP__UNLOCK_DURATION_SECONDS", &mut settings.unlock_duration_seconds)?;
    override_parsed(&env, "APP__RESUPPLY_HORIZON_DAYS", &mut settings.resupply_horizon_days)?;
    override_parsed(&env, "APP__SAFETY_MARGIN_FRACTION", &mut settings.safety_margin_fraction)?;
    override_parsed(&env, "APP__AUDIT_RING_SIZE", &mut settings.audit_ring_size)?;
    override_parsed(&env, "APP__TICK_MILLIS", &mut settings.tick_millis)?;
    override_parsed(&env, "APP__IDENTIFY_TIMEOUT_MILLIS", &mut settings.identify_timeout_millis)?;
    override_parsed(
        &env,
        "APP__RECOGNITION_LATENCY_MILLIS",
        &mut settings.recognition_latency_millis,
    )?;

    settings.validate()?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file_cfg.unlock_duration_seconds {
        settings.unlock_duration_seconds = v;
    }
    if let Some(v) = file_cfg.resupply_horizon_days {
        settings.resupply_horizon_days = v;
    }
    if let Some(v) = file_cfg.safety_margin_fraction {
        settings.safety_margin_fraction = v;
    }
    if let Some(v) = file_cfg.audit_ring_size {
        settings.audit_ring_size = v;
    }
    if let Some(v) = file_cfg.tick_millis {
        settings.tick_millis = v;
    }
    if let Some(v) = file_cfg.identify_timeout_millis {
        settings.identify_timeout_millis = v;
    }
    if let Some(v) = file_cfg.recognition_latency_millis {
        settings.recognition_latency_millis = v;
    }
}

fn override_parsed<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) -> anyhow::Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = env(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
