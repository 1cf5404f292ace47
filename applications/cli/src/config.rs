//! CLI configuration

use encore_client::{BackendConfig, CacheSettings};
use encore_core::UserId;
use encore_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

const ENV_PREFIX: &str = "ENCORE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendConfig,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Signed-in user, used for purchase entitlements
    #[serde(default)]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// How often the audio clock reports progress
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Simulated clock speed multiplier
    #[serde(default = "default_speed")]
    pub speed: u32,
}

impl PlaybackSettings {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            progress_interval_ms: self.progress_interval_ms,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
            speed: default_speed(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` is read if
    /// present. `ENCORE_*` variables override the file, with `__` separating
    /// nested keys (`ENCORE_BACKEND__ANON_KEY`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    pub(crate) fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend URL is required (set ENCORE_BACKEND__URL)".to_string(),
            ));
        }

        if self.backend.anon_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend anon key is required (set ENCORE_BACKEND__ANON_KEY)".to_string(),
            ));
        }

        if self.playback.progress_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.progress_interval_ms must be positive".to_string(),
            ));
        }

        if self.playback.speed == 0 {
            return Err(ConfigError::Invalid(
                "playback.speed must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_backend() -> BackendConfig {
    BackendConfig::new("http://localhost:54321", "")
}

fn default_progress_interval_ms() -> u64 {
    SessionConfig::default().progress_interval_ms
}

fn default_speed() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_fail_validation_without_key() {
        let config = AppConfig::load_with(None, env_from(&[])).unwrap();
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.playback.progress_interval_ms, 500);
        assert_eq!(config.cache.capacity, 256);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_values() {
        let file = write_config(
            r#"
user_id = "u1"

[backend]
url = "https://xyz.supabase.co"
anon_key = "file-key"

[cache]
capacity = 32

[playback]
progress_interval_ms = 250
speed = 20
"#,
        );

        let config = AppConfig::load_with(Some(file.path()), env_from(&[])).unwrap();
        config.validate().unwrap();
        assert_eq!(config.backend.anon_key, "file-key");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.cache.capacity, 32);
        assert_eq!(config.playback.progress_interval_ms, 250);
        assert_eq!(config.playback.speed, 20);
        assert_eq!(config.user_id, Some(UserId::new("u1")));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config(
            r#"
[backend]
url = "https://xyz.supabase.co"
anon_key = "file-key"
"#,
        );

        let env = env_from(&[
            ("ENCORE_BACKEND__ANON_KEY", "env-key"),
            ("ENCORE_PLAYBACK__SPEED", "8"),
        ]);
        let config = AppConfig::load_with(Some(file.path()), env).unwrap();
        assert_eq!(config.backend.anon_key, "env-key");
        assert_eq!(config.backend.url, "https://xyz.supabase.co");
        assert_eq!(config.playback.speed, 8);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load_with(Some(Path::new("/nonexistent/encore.toml")), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_zero_speed_rejected() {
        let mut config = AppConfig::load_with(None, env_from(&[])).unwrap();
        config.backend.anon_key = "key".into();
        config.validate().unwrap();

        config.playback.speed = 0;
        assert!(config.validate().is_err());
    }
}
