//! `cvescan.toml` configuration surface: missing file falls back to
//! defaults, CLI flags override whatever the file set.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub nvd: NvdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NvdConfig {
    /// NVD API key. Present ⇒ the 0.6s rate-limit band instead of 6.0s.
    pub api_key: Option<String>,
    /// Override for the NVD REST base URL, overridable so integration tests
    /// can point at a mock server.
    pub base_url: Option<String>,
    /// Per-request timeout override, in seconds. Defaults to 15.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing or unparseable config is not fatal — the run proceeds with
    /// built-in defaults, the same fail-soft posture applied to an absent
    /// CMake manifest.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_api_key() {
        let config = Config::default();
        assert!(config.nvd.api_key.is_none());
        assert!(config.nvd.timeout_secs.is_none());
    }

    #[test]
    fn parses_nvd_section() {
        let toml = r#"
[nvd]
api_key = "secret"
timeout_secs = 30
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.nvd.api_key.as_deref(), Some("secret"));
        assert_eq!(config.nvd.timeout_secs, Some(30));
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/cvescan.toml"));
        assert!(config.nvd.api_key.is_none());
    }
}
