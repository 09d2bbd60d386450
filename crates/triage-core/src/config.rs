use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the classification service. The endpoint path itself is
    /// fixed by the service contract.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://email-api-classifier.onrender.com".to_string()
}
fn default_timeout() -> u64 {
    120
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl TriageConfig {
    /// Load config from ~/.config/triage/config.toml, creating defaults if missing.
    pub fn load() -> crate::error::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|e| {
                crate::error::TriageError::Config(format!("Failed to read config: {e}"))
            })?;
            let config: TriageConfig = toml::from_str(&contents).map_err(|e| {
                crate::error::TriageError::Config(format!("Failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            let config = TriageConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> crate::error::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            crate::error::TriageError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> crate::error::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            crate::error::TriageError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("triage").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config: TriageConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config.api.base_url, default_base_url());
        assert_eq!(config.api.timeout_seconds, 120);
    }

    #[test]
    fn partial_config_keeps_explicit_values() {
        let config: TriageConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://127.0.0.1:8000"
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_seconds, 120);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = TriageConfig::default();
        let serialized = toml::to_string_pretty(&config).expect("serialize");
        let parsed: TriageConfig = toml::from_str(&serialized).expect("reparse");
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.api.timeout_seconds, config.api.timeout_seconds);
    }
}
