//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! service URLs, API keys, where the session lives and the last email used
//! to log in.
//!
//! Configuration is stored at `~/.config/apihub/config.json`. Environment
//! variables (after `.env` is loaded by the binary) take precedence over the
//! file and are never written back to it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::DEFAULT_AUTH_BASE_URL;
use crate::catalog;
use crate::guard::ApiId;

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "apihub";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_AUTH_URL: &str = "APIHUB_AUTH_URL";
pub const ENV_API_KEY: &str = "APIHUB_API_KEY";
pub const ENV_WEATHER_API_KEY: &str = "APIHUB_WEATHER_API_KEY";
pub const ENV_STORAGE_DIR: &str = "APIHUB_STORAGE_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EnvOverrides {
    auth_base_url: Option<String>,
    api_key: Option<String>,
    weather_api_key: Option<String>,
    storage_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub auth_base_url: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    /// The weather service issues its own keys.
    pub weather_api_key: Option<String>,
    /// Off unless set: a hung auth request stays pending.
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
    #[serde(default)]
    pub base_urls: BTreeMap<ApiId, String>,

    #[serde(skip)]
    env: EnvOverrides,

    /// Set when the file on disk could not be parsed; saving is refused.
    #[serde(skip)]
    unreadable: bool,
}

impl Config {
    /// Load from the default path with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Like [`Config::load`], but an unparsable file yields defaults that
    /// will not be saved over it.
    pub fn load_or_default() -> Self {
        let mut config = match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                warn!(error = %e, "No config path, using defaults");
                Self::default()
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Config unreadable, using defaults");
                Self {
                    unreadable: true,
                    ..Self::default()
                }
            }
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.unreadable
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if self.unreadable {
            bail!("Config file {} could not be parsed; not overwriting it", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record environment values. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        self.env = EnvOverrides {
            auth_base_url: get(ENV_AUTH_URL),
            api_key: get(ENV_API_KEY),
            weather_api_key: get(ENV_WEATHER_API_KEY),
            storage_dir: get(ENV_STORAGE_DIR).map(PathBuf::from),
        };
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn auth_base_url(&self) -> String {
        self.env
            .auth_base_url
            .clone()
            .or_else(|| self.auth_base_url.clone())
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string())
    }

    /// Directory holding the session files.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.env.storage_dir.clone().or_else(|| self.storage_dir.clone()) {
            return Ok(dir);
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.env.api_key.as_deref().or(self.api_key.as_deref())
    }

    /// The key to send to `api`. Weather prefers its own key.
    pub fn key_for(&self, api: ApiId) -> Option<&str> {
        if api == ApiId::Weather {
            let weather = self
                .env
                .weather_api_key
                .as_deref()
                .or(self.weather_api_key.as_deref());
            if weather.is_some() {
                return weather;
            }
        }
        self.api_key()
    }

    pub fn base_url(&self, api: ApiId) -> String {
        self.base_urls
            .get(&api)
            .cloned()
            .unwrap_or_else(|| catalog::get(api).base_url.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth_base_url(), DEFAULT_AUTH_BASE_URL);
        assert_eq!(
            config.base_url(ApiId::Quran),
            "https://quran-api-ny11.onrender.com/api/v2/quran"
        );
        assert!(config.api_key().is_none());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            auth_base_url: Some("https://file.example.com".to_string()),
            api_key: Some("file-key".to_string()),
            ..Default::default()
        };
        config.apply_env(|name| match name {
            ENV_AUTH_URL => Some("https://env.example.com".to_string()),
            ENV_API_KEY => Some("   ".to_string()), // blank is ignored
            ENV_STORAGE_DIR => Some("/tmp/apihub-test".to_string()),
            _ => None,
        });

        assert_eq!(config.auth_base_url(), "https://env.example.com");
        assert_eq!(config.api_key(), Some("file-key"));
        assert_eq!(config.storage_dir().unwrap(), PathBuf::from("/tmp/apihub-test"));
    }

    #[test]
    fn test_weather_key_falls_back() {
        let mut config = Config {
            api_key: Some("shared".to_string()),
            ..Default::default()
        };
        assert_eq!(config.key_for(ApiId::Weather), Some("shared"));

        config.weather_api_key = Some("weather".to_string());
        assert_eq!(config.key_for(ApiId::Weather), Some("weather"));
        assert_eq!(config.key_for(ApiId::Hadith), Some("shared"));
    }

    #[test]
    fn test_save_does_not_persist_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config {
            last_email: Some("user@example.com".to_string()),
            ..Default::default()
        };
        config.base_urls.insert(ApiId::Recipe, "http://localhost:9000".to_string());
        config.apply_env(|name| (name == ENV_API_KEY).then(|| "secret".to_string()));
        config.save_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret"));
        assert!(raw.contains("\"recipe\""));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.last_email.as_deref(), Some("user@example.com"));
        assert_eq!(loaded.base_url(ApiId::Recipe), "http://localhost:9000");
        assert!(loaded.api_key().is_none());
    }

    #[test]
    fn test_unparsable_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = "{\"api_key\": \"hand-edited\",";
        std::fs::write(&path, original).unwrap();

        assert!(Config::load_from(&path).is_err());
        let mut config = Config::load_from_or_default(&path);
        assert!(config.is_unreadable());
        assert!(config.api_key().is_none());

        config.last_email = Some("user@example.com".to_string());
        let err = config.save_to(&path).unwrap_err();
        assert!(err.to_string().contains("not overwriting"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());

        // A missing file can still be written
        let config = Config::load_from_or_default(&dir.path().join("absent.json"));
        config.save_to(&dir.path().join("absent.json")).unwrap();
    }
}
