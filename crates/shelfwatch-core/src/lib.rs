//! Shared data model and configuration for the shelfwatch workspace.
//!
//! Defines the platform enum, the search-task matrix, the normalized
//! [`ProductRecord`] produced by extraction, and the env-driven
//! [`AppConfig`] every binary loads at startup.

pub mod app_config;
pub mod config;
pub mod platform;
pub mod records;
pub mod task;
pub mod tasks;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use platform::Platform;
pub use records::ProductRecord;
pub use task::{build_run_matrix, SearchTask};
pub use tasks::{load_tasks, TasksFile};
