use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn bare_environment_builds_with_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.headless);
    assert_eq!(cfg.output_dir.to_string_lossy(), "./out");
    assert_eq!(cfg.tasks_path.to_string_lossy(), "./config/tasks.yaml");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.nav_timeout_secs, 30);
    assert_eq!(cfg.task_timeout_secs, 60);
    assert_eq!(cfg.capture_wait_secs, 10);
    assert_eq!(cfg.capture_idle_ms, 1500);
    assert_eq!(cfg.selector_wait_secs, 5);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 5);
    assert_eq!(cfg.task_delay_ms, 2000);
    assert_eq!(cfg.viewport, (1280, 720));
    assert!(cfg.chrome_binary.is_none());
    assert!(cfg.user_agent.contains("Mozilla/5.0"));
}

#[test]
fn headless_accepts_common_spellings() {
    for (raw, expected) in [("true", true), ("1", true), ("no", false), ("0", false)] {
        let mut map = HashMap::new();
        map.insert("SHELFWATCH_HEADLESS", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.headless, expected, "raw = {raw}");
    }
}

#[test]
fn headless_rejects_garbage() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHELFWATCH_HEADLESS"),
        "expected InvalidEnvVar(SHELFWATCH_HEADLESS), got: {result:?}"
    );
}

#[test]
fn task_timeout_override() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_TASK_TIMEOUT_SECS", "120");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.task_timeout_secs, 120);
}

#[test]
fn task_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_TASK_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHELFWATCH_TASK_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SHELFWATCH_TASK_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_override() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_MAX_RETRIES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 5);
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn chrome_binary_is_picked_up() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_CHROME_BIN", "/usr/bin/chromium");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.chrome_binary.as_deref(),
        Some(std::path::Path::new("/usr/bin/chromium"))
    );
}

#[test]
fn viewport_override() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_VIEWPORT", "1920x1080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.viewport, (1920, 1080));
}

#[test]
fn viewport_rejects_missing_separator() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_VIEWPORT", "1280");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHELFWATCH_VIEWPORT"),
        "expected InvalidEnvVar(SHELFWATCH_VIEWPORT), got: {result:?}"
    );
}

#[test]
fn viewport_rejects_zero_dimension() {
    let mut map = HashMap::new();
    map.insert("SHELFWATCH_VIEWPORT", "0x720");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHELFWATCH_VIEWPORT"),
        "expected InvalidEnvVar(SHELFWATCH_VIEWPORT), got: {result:?}"
    );
}
