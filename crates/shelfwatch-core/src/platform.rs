use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Quick-commerce storefronts shelfwatch knows how to drive.
///
/// The set is closed on purpose: adding a platform means adding a site
/// profile and an extraction mapper, not registering a string at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Zepto,
    Blinkit,
}

impl Platform {
    /// All supported platforms, in the order the CLI lists them.
    pub const ALL: [Platform; 2] = [Platform::Zepto, Platform::Blinkit];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Zepto => "zepto",
            Platform::Blinkit => "blinkit",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zepto" => Ok(Platform::Zepto),
            "blinkit" => Ok(Platform::Blinkit),
            other => Err(ConfigError::Validation(format!(
                "unsupported platform '{other}'; available: zepto, blinkit"
            ))),
        }
    }
}
