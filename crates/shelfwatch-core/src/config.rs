use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tasks file {path}: {source}")]
    TasksFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tasks file: {0}")]
    TasksFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. All variables have
/// defaults, so a bare environment is valid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let headless = parse_bool("SHELFWATCH_HEADLESS", "true")?;
    let output_dir = PathBuf::from(or_default("SHELFWATCH_OUTPUT_DIR", "./out"));
    let tasks_path = PathBuf::from(or_default("SHELFWATCH_TASKS_PATH", "./config/tasks.yaml"));
    let log_level = or_default("SHELFWATCH_LOG_LEVEL", "info");

    let nav_timeout_secs = parse_u64("SHELFWATCH_NAV_TIMEOUT_SECS", "30")?;
    let task_timeout_secs = parse_u64("SHELFWATCH_TASK_TIMEOUT_SECS", "60")?;
    let capture_wait_secs = parse_u64("SHELFWATCH_CAPTURE_WAIT_SECS", "10")?;
    let capture_idle_ms = parse_u64("SHELFWATCH_CAPTURE_IDLE_MS", "1500")?;
    let selector_wait_secs = parse_u64("SHELFWATCH_SELECTOR_WAIT_SECS", "5")?;
    let max_retries = parse_u32("SHELFWATCH_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("SHELFWATCH_RETRY_BACKOFF_BASE_SECS", "5")?;
    let task_delay_ms = parse_u64("SHELFWATCH_TASK_DELAY_MS", "2000")?;

    let user_agent = or_default(
        "SHELFWATCH_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36",
    );
    let viewport_raw = or_default("SHELFWATCH_VIEWPORT", "1280x720");
    let viewport = parse_viewport("SHELFWATCH_VIEWPORT", &viewport_raw)?;
    let chrome_binary = lookup("SHELFWATCH_CHROME_BIN").ok().map(PathBuf::from);

    Ok(AppConfig {
        headless,
        output_dir,
        tasks_path,
        log_level,
        nav_timeout_secs,
        task_timeout_secs,
        capture_wait_secs,
        capture_idle_ms,
        selector_wait_secs,
        max_retries,
        retry_backoff_base_secs,
        task_delay_ms,
        user_agent,
        viewport,
        chrome_binary,
    })
}

/// Parse a `WIDTHxHEIGHT` viewport string (e.g. `1280x720`).
fn parse_viewport(var: &str, raw: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| invalid(format!("expected WIDTHxHEIGHT, got '{raw}'")))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|e| invalid(format!("bad width '{w}': {e}")))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|e| invalid(format!("bad height '{h}': {e}")))?;

    if width == 0 || height == 0 {
        return Err(invalid("viewport dimensions must be non-zero".to_string()));
    }

    Ok((width, height))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
