use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_typing_delay() -> u64 {
    600
}

fn default_response_delay() -> u64 {
    300
}

/// UX tuning and profile selection, persisted as JSON under the platform
/// config directory.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Delay before the typing placeholder appears in the transcript.
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,
    /// Additional delay before the reply replaces the placeholder. The two
    /// delays stack.
    #[serde(default = "default_response_delay")]
    pub response_delay_ms: u64,
    /// Optional JSON profile overriding the compiled-in knowledge base.
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            typing_delay_ms: default_typing_delay(),
            response_delay_ms: default_response_delay(),
            profile_path: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::read_from(&Self::get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::get_config_path()?)
    }

    fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("foliobot").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.typing_delay_ms, 600);
        assert_eq!(config.response_delay_ms, 300);
        assert!(config.profile_path.is_none());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.typing_delay_ms = 0;
        config.response_delay_ms = 0;
        config.profile_path = Some("profile.json".to_string());
        config.write_to(&path).unwrap();

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded.typing_delay_ms, 0);
        assert_eq!(loaded.response_delay_ms, 0);
        assert_eq!(loaded.profile_path.as_deref(), Some("profile.json"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"typing_delay_ms": 100}"#).unwrap();

        let config = Config::read_from(&path).unwrap();
        assert_eq!(config.typing_delay_ms, 100);
        assert_eq!(config.response_delay_ms, 300);
    }
}
