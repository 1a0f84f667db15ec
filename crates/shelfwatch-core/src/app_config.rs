use std::path::PathBuf;

/// Runtime configuration for a shelfwatch run, loaded from the environment.
///
/// All timing knobs are plain integers (seconds or milliseconds as named)
/// so they can be set from `.env` without unit parsing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub headless: bool,
    pub output_dir: PathBuf,
    pub tasks_path: PathBuf,
    pub log_level: String,
    /// Upper bound for a single page navigation.
    pub nav_timeout_secs: u64,
    /// Upper bound for one full search task (navigate + capture + extract).
    pub task_timeout_secs: u64,
    /// How long to wait for the first matching API response after a search.
    pub capture_wait_secs: u64,
    /// Quiet gap after the last matching response before capture is
    /// considered settled.
    pub capture_idle_ms: u64,
    /// Upper bound when polling for a DOM element.
    pub selector_wait_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Courtesy pause between consecutive search tasks.
    pub task_delay_ms: u64,
    pub user_agent: String,
    pub viewport: (u32, u32),
    /// Explicit browser binary; when `None` well-known install paths are
    /// probed at launch.
    pub chrome_binary: Option<PathBuf>,
}
