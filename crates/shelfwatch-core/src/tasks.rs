use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Task manifest: the keyword and region lists whose cross product forms the
/// run matrix. Loaded from YAML so recurring tracking runs don't need long
/// CLI invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksFile {
    pub keywords: Vec<String>,
    pub regions: Vec<String>,
}

impl TasksFile {
    /// Check the manifest invariants: both lists non-empty, no blank
    /// entries, no duplicate keywords (case-insensitive) or regions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::Validation(
                "tasks file must list at least one keyword".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(ConfigError::Validation(
                "tasks file must list at least one region".to_string(),
            ));
        }

        let mut seen_keywords = HashSet::new();
        for keyword in &self.keywords {
            if keyword.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "keywords must be non-empty".to_string(),
                ));
            }
            if !seen_keywords.insert(keyword.trim().to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate keyword: '{keyword}'"
                )));
            }
        }

        let mut seen_regions = HashSet::new();
        for region in &self.regions {
            if region.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "regions must be non-empty".to_string(),
                ));
            }
            if !seen_regions.insert(region.trim().to_string()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate region: '{region}'"
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate a task manifest from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_tasks(path: &Path) -> Result<TasksFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TasksFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let tasks_file: TasksFile = serde_yaml::from_str(&content)?;

    tasks_file.validate()?;

    Ok(tasks_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn validate_accepts_well_formed_manifest() {
        let tasks = TasksFile {
            keywords: strings(&["milk", "bread", "hair oil"]),
            regions: strings(&["560001", "400001"]),
        };
        assert!(tasks.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_keyword_list() {
        let tasks = TasksFile {
            keywords: vec![],
            regions: strings(&["560001"]),
        };
        let err = tasks.validate().unwrap_err();
        assert!(err.to_string().contains("at least one keyword"));
    }

    #[test]
    fn validate_rejects_empty_region_list() {
        let tasks = TasksFile {
            keywords: strings(&["milk"]),
            regions: vec![],
        };
        let err = tasks.validate().unwrap_err();
        assert!(err.to_string().contains("at least one region"));
    }

    #[test]
    fn validate_rejects_blank_keyword() {
        let tasks = TasksFile {
            keywords: strings(&["milk", "   "]),
            regions: strings(&["560001"]),
        };
        let err = tasks.validate().unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_duplicate_keyword_case_insensitively() {
        let tasks = TasksFile {
            keywords: strings(&["Milk", "milk"]),
            regions: strings(&["560001"]),
        };
        let err = tasks.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate keyword"));
    }

    #[test]
    fn validate_rejects_duplicate_region() {
        let tasks = TasksFile {
            keywords: strings(&["milk"]),
            regions: strings(&["560001", "560001"]),
        };
        let err = tasks.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate region"));
    }

    #[test]
    fn load_tasks_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("tasks.yaml");
        assert!(
            path.exists(),
            "tasks.yaml missing at {path:?} — required for this test"
        );
        let result = load_tasks(&path);
        assert!(result.is_ok(), "failed to load tasks.yaml: {result:?}");
        let tasks = result.unwrap();
        assert!(!tasks.keywords.is_empty());
        assert!(!tasks.regions.is_empty());
    }

    #[test]
    fn load_tasks_missing_file_is_io_error() {
        let result = load_tasks(Path::new("/nonexistent/tasks.yaml"));
        assert!(matches!(result, Err(ConfigError::TasksFileIo { .. })));
    }
}
