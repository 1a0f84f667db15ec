use serde::{Deserialize, Serialize};

/// One cell of the run matrix: search `keyword` as seen from `region`.
///
/// Regions are delivery pincodes (e.g. `"560001"`); the storefronts key
/// availability and ranking on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTask {
    pub keyword: String,
    pub region: String,
}

impl SearchTask {
    #[must_use]
    pub fn new(keyword: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            region: region.into(),
        }
    }
}

impl std::fmt::Display for SearchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' @ {}", self.keyword, self.region)
    }
}

/// Cross product of regions × keywords, region-major.
///
/// Region-major order means a single browser session switches delivery
/// location once per region block instead of once per task.
#[must_use]
pub fn build_run_matrix(keywords: &[String], regions: &[String]) -> Vec<SearchTask> {
    let mut matrix = Vec::with_capacity(keywords.len() * regions.len());
    for region in regions {
        for keyword in keywords {
            matrix.push(SearchTask::new(keyword.clone(), region.clone()));
        }
    }
    matrix
}
