use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "VIDY_YOUTUBE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API key, used only when oEmbed refuses a YouTube video.
    pub youtube_api_key: Option<String>,
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            user_agent: format!("vidy/{}", env!("CARGO_PKG_VERSION")),
            timeout: 30,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vidy").join("config.toml"))
    }

    /// Reads `path` when it exists, otherwise starts from defaults. The API key
    /// environment variable wins over the file.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.youtube_api_key = Some(key);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// A blank key counts as not configured.
    pub fn youtube_api_key(&self) -> Option<&str> {
        self.youtube_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_blank_key_is_unset() {
        let mut config = Config::default();
        assert_eq!(config.youtube_api_key(), None);

        config.youtube_api_key = Some("   ".to_string());
        assert_eq!(config.youtube_api_key(), None);

        config.youtube_api_key = Some("AIza-key".to_string());
        assert_eq!(config.youtube_api_key(), Some("AIza-key"));
    }

    #[test]
    fn test_save_and_reload() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            youtube_api_key: Some("AIza-key".to_string()),
            timeout: 5,
            ..Config::default()
        };
        config.save(&path)?;

        assert_eq!(Config::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout = 10\n")?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.timeout, 10);
        assert_eq!(config.youtube_api_key, None);
        assert_eq!(config.user_agent, Config::default().user_agent);
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout = \"soon\"\n")?;

        assert!(Config::from_file(&path).is_err());
        Ok(())
    }
}
