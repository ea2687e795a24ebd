//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-courier\config.toml
//! - macOS: ~/Library/Application Support/music-courier/config.toml
//! - Linux: ~/.config/music-courier/config.toml
//!
//! The file is human-readable and editable. Settings load at startup; CLI
//! flags and environment variables override individual values per run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::downstream::{AddDefaults, PollingPolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Downstream library service connection
    pub server: ServerConfig,

    /// Defaults applied when creating artists
    pub defaults: LibraryDefaults,

    /// Convergence-wait tuning
    pub polling: PollingConfig,
}

/// Connection settings for the library service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base address, e.g. `http://localhost:8686`
    pub base_url: String,

    /// API key. Never logged; see `downstream::redact_api_key`.
    pub api_key: String,
}

/// Library-side defaults for artist creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryDefaults {
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    /// Storage root assigned to new artists unless a request overrides it
    pub root_folder: String,
}

impl Default for LibraryDefaults {
    fn default() -> Self {
        Self {
            quality_profile_id: 1,
            metadata_profile_id: 1,
            root_folder: "/music".to_string(),
        }
    }
}

/// Tuning for the discography convergence wait
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Sleep between discography polls
    pub interval_ms: u64,

    /// Give up after this many polls
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: 30,
        }
    }
}

impl Config {
    /// The add-defaults view the artist client wants.
    pub fn add_defaults(&self) -> AddDefaults {
        AddDefaults {
            quality_profile_id: self.defaults.quality_profile_id,
            metadata_profile_id: self.defaults.metadata_profile_id,
            root_folder: self.defaults.root_folder.clone(),
        }
    }

    /// The polling-policy view the convergence wait wants.
    pub fn polling_policy(&self) -> PollingPolicy {
        PollingPolicy {
            interval: Duration::from_millis(self.polling.interval_ms),
            max_attempts: self.polling.max_attempts,
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-courier"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific path.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk.
///
/// Creates the config directory if it doesn't exist and writes atomically
/// (temp file, then rename).
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[defaults]"));
        assert!(toml.contains("[polling]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.server.base_url = "http://lidarr.local:8686".to_string();
        config.server.api_key = "test-key-123".to_string();
        config.polling.max_attempts = 5;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.server.base_url, "http://lidarr.local:8686");
        assert_eq!(parsed.server.api_key, "test-key-123");
        assert_eq!(parsed.polling.max_attempts, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[server]
base_url = "http://lidarr.local:8686"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.base_url, "http://lidarr.local:8686");
        assert_eq!(config.server.api_key, "");
        assert_eq!(config.defaults.quality_profile_id, 1);
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.polling.max_attempts, 30);
    }

    #[test]
    fn test_polling_policy_conversion() {
        let mut config = Config::default();
        config.polling.interval_ms = 250;
        config.polling.max_attempts = 4;

        let policy = config.polling_policy();
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 4);
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.server.base_url, "");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nbase_url = \"http://x:8686\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = load_from(&path);
        assert_eq!(config.server.base_url, "http://x:8686");
        assert_eq!(config.server.api_key, "k");
    }
}
