//! Form configuration

use anyhow::Result;
use serde::Deserialize;

/// Deployment configuration, read from `MYCORISK_*` environment variables.
/// Command-line flags override these values.
#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Path to the classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Tier policy in force: `probability` or `class`
    #[serde(default = "default_tier_policy")]
    pub tier_policy: String,
}

fn default_model_path() -> String {
    risk_lib::store::DEFAULT_MODEL_PATH.to_string()
}

fn default_tier_policy() -> String {
    "probability".to_string()
}

impl FormConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("MYCORISK"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| FormConfig {
            model_path: default_model_path(),
            tier_policy: default_tier_policy(),
        }))
    }
}
