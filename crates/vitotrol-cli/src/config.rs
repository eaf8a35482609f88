//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vitotrol_core::WaitConfig;
use vitotrol_types::{DeviceId, LocationId};

/// Default wait timeout in seconds when neither the command line nor the
/// config file give one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service URL
    #[serde(default)]
    pub url: Option<String>,

    /// Account login
    #[serde(default)]
    pub login: Option<String>,

    /// Account password
    #[serde(default)]
    pub password: Option<String>,

    /// Default device id
    #[serde(default)]
    pub device: Option<DeviceId>,

    /// Default installation id
    #[serde(default)]
    pub location: Option<LocationId>,

    /// Wait timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Status polling settings
    #[serde(default)]
    pub wait: WaitSettings,
}

/// Status polling settings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSettings {
    /// Delay before the first write status poll
    #[serde(default = "default_write_min_wait_ms")]
    pub write_min_wait_ms: u64,

    /// Delay between write status polls
    #[serde(default = "default_poll_interval_ms")]
    pub write_poll_interval_ms: u64,

    /// Delay before the first refresh status poll
    #[serde(default = "default_refresh_min_wait_ms")]
    pub refresh_min_wait_ms: u64,

    /// Delay between refresh status polls
    #[serde(default = "default_poll_interval_ms")]
    pub refresh_poll_interval_ms: u64,
}

fn default_write_min_wait_ms() -> u64 {
    WaitConfig::for_write().min_wait.as_millis() as u64
}

fn default_refresh_min_wait_ms() -> u64 {
    WaitConfig::for_refresh().min_wait.as_millis() as u64
}

fn default_poll_interval_ms() -> u64 {
    WaitConfig::for_write().poll_interval.as_millis() as u64
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            write_min_wait_ms: default_write_min_wait_ms(),
            write_poll_interval_ms: default_poll_interval_ms(),
            refresh_min_wait_ms: default_refresh_min_wait_ms(),
            refresh_poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WaitSettings {
    /// Poll timings for writes.
    pub fn write(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_millis(self.write_min_wait_ms),
            Duration::from_millis(self.write_poll_interval_ms),
        )
    }

    /// Poll timings for refreshes.
    pub fn refresh(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_millis(self.refresh_min_wait_ms),
            Duration::from_millis(self.refresh_poll_interval_ms),
        )
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitotrol")
            .join("config.toml")
    }

    /// Load config from `path`, or return default if not found or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Copy of the config that is safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

/// Resolve an optional value: the command line wins over the config file.
pub fn resolve<T: Clone>(arg: Option<T>, config: Option<&T>) -> Option<T> {
    arg.or_else(|| config.cloned())
}

/// Resolve the wait timeout: use provided value, fall back to config, then default
pub fn resolve_timeout(arg: Option<u64>, config: &Config) -> Duration {
    Duration::from_secs(arg.or(config.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_arg() {
        let config = Config {
            device: Some(DeviceId(1)),
            ..Default::default()
        };
        assert_eq!(
            resolve(Some(DeviceId(2)), config.device.as_ref()),
            Some(DeviceId(2))
        );
    }

    #[test]
    fn test_resolve_falls_back_to_config() {
        let config = Config {
            device: Some(DeviceId(1)),
            ..Default::default()
        };
        assert_eq!(resolve(None, config.device.as_ref()), Some(DeviceId(1)));
    }

    #[test]
    fn test_resolve_none_when_both_empty() {
        let config = Config::default();
        assert_eq!(resolve(None, config.location.as_ref()), None);
    }

    #[test]
    fn test_resolve_timeout_uses_explicit_value() {
        let config = Config {
            timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(resolve_timeout(Some(45), &config), Duration::from_secs(45));
    }

    #[test]
    fn test_resolve_timeout_uses_config() {
        let config = Config {
            timeout: Some(90),
            ..Default::default()
        };
        assert_eq!(resolve_timeout(None, &config), Duration::from_secs(90));
    }

    #[test]
    fn test_resolve_timeout_uses_default_when_no_config() {
        assert_eq!(
            resolve_timeout(None, &Config::default()),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_wait_settings_default_to_library_timings() {
        let settings = WaitSettings::default();
        assert_eq!(settings.write(), WaitConfig::for_write());
        assert_eq!(settings.refresh(), WaitConfig::for_refresh());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            login = "user@example.com"
            device = 12345
            location = 678

            [wait]
            write_min_wait_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.login.as_deref(), Some("user@example.com"));
        assert_eq!(config.device, Some(DeviceId(12345)));
        assert_eq!(config.location, Some(LocationId(678)));
        assert_eq!(config.wait.write_min_wait_ms, 500);
        assert_eq!(
            config.wait.refresh(),
            WaitConfig::for_refresh(),
            "unset fields keep their defaults"
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            url: Some("http://localhost:8080".to_string()),
            timeout: Some(30),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "device = \"not a number\"").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load_from(&dir.path().join("missing.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_redacted_hides_password() {
        let config = Config {
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert_eq!(config.redacted().password.as_deref(), Some("********"));
        assert_eq!(Config::default().redacted().password, None);
    }
}
