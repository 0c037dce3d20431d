use super::*;

use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(label: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("cabinet_settings_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("cabinet.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/cabinet.toml"), env_from(&[]))
        .expect("defaults");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    assert_eq!(settings.unlock_duration_seconds, 30);
    assert_eq!(settings.resupply_horizon_days, 180);
    assert_eq!(settings.audit_ring_size, 50);
    assert_eq!(settings.controller_settings().tick, Duration::from_secs(1));
}

#[test]
fn file_values_apply_and_env_wins_over_file() {
    let path = temp_settings_file(
        "layered",
        "unlock_duration_seconds = 45\nsafety_margin_fraction = 0.5\naudit_ring_size = 10\n",
    );

    let settings = load_settings_from(
        &path,
        env_from(&[("APP__AUDIT_RING_SIZE", "20"), ("APP__BIND_ADDR", "0.0.0.0:9000")]),
    )
    .expect("settings");

    assert_eq!(settings.unlock_duration_seconds, 45);
    assert_eq!(settings.safety_margin_fraction, 0.5);
    assert_eq!(settings.audit_ring_size, 20);
    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert_eq!(settings.forecast_settings().safety_margin_fraction, 0.5);

    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).expect("cleanup");
    }
}

#[test]
fn unparsable_env_override_is_reported() {
    let err = load_settings_from(
        Path::new("/nonexistent/cabinet.toml"),
        env_from(&[("APP__TICK_MILLIS", "soon")]),
    )
    .expect_err("bad value");

    assert!(err.to_string().contains("APP__TICK_MILLIS"));
}

#[test]
fn invalid_values_fail_validation() {
    let negative_margin = load_settings_from(
        Path::new("/nonexistent/cabinet.toml"),
        env_from(&[("APP__SAFETY_MARGIN_FRACTION", "-0.1")]),
    );
    assert!(negative_margin.is_err());

    let zero_ring = load_settings_from(
        Path::new("/nonexistent/cabinet.toml"),
        env_from(&[("APP__AUDIT_RING_SIZE", "0")]),
    );
    assert!(zero_ring.is_err());

    let zero_unlock = load_settings_from(
        Path::new("/nonexistent/cabinet.toml"),
        env_from(&[("APP__UNLOCK_DURATION_SECONDS", "0")]),
    );
    assert!(zero_unlock.is_err());
}

#[test]
fn unknown_file_keys_are_rejected() {
    let path = temp_settings_file("unknown_key", "unlock_seconds = 10\n");

    let err = load_settings_from(&path, env_from(&[])).expect_err("unknown key");
    assert!(err.to_string().contains("invalid settings file"));

    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).expect("cleanup");
    }
}
