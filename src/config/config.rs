// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default config file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "smb-notifier.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown log format: {} (expected pretty or json)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay between two polls of the watched directory, in milliseconds
    pub poll_interval_ms: u64,

    /// Upper bound on a single listing of the share, in milliseconds
    pub list_timeout_ms: u64,

    /// Where the OS mounts SMB shares; `smb://host/share/` lives at `<mount_root>/host/share/`
    pub mount_root: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log line format on stderr
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("SMB_NOTIFIER_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = Self::load_from(Path::new(&config_path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Read `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `SMB_NOTIFIER_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(val) = lookup("SMB_NOTIFIER_POLL_INTERVAL_MS") {
            self.poll_interval_ms = val.parse()?;
        }
        if let Some(val) = lookup("SMB_NOTIFIER_LIST_TIMEOUT_MS") {
            self.list_timeout_ms = val.parse()?;
        }
        if let Some(val) = lookup("SMB_NOTIFIER_MOUNT_ROOT") {
            self.mount_root = PathBuf::from(val);
        }
        if let Some(val) = lookup("SMB_NOTIFIER_LOG_LEVEL") {
            self.log_level = val;
        }
        if let Some(val) = lookup("SMB_NOTIFIER_LOG_FORMAT") {
            self.log_format = val.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("poll_interval_ms must be greater than zero"));
        }
        if self.list_timeout_ms == 0 {
            return Err(anyhow::anyhow!("list_timeout_ms must be greater than zero"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_millis(self.list_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            list_timeout_ms: 10_000,
            mount_root: PathBuf::from("/mnt/smb"),
            log_level: String::from("info"),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.list_timeout(), Duration::from_secs(10));
        assert_eq!(config.mount_root, PathBuf::from("/mnt/smb"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config_file() {
        let config = Config::load_from(Path::new("/nonexistent/smb-notifier.toml")).unwrap();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.mount_root, PathBuf::from("/mnt/smb"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
poll_interval_ms = 2000
list_timeout_ms = 3000
mount_root = "/media/shares"
log_level = "debug"
log_format = "json"
"#;
        fs::write(temp_file.path(), config_content).unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.list_timeout_ms, 3000);
        assert_eq!(config.mount_root, PathBuf::from("/media/shares"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "poll_interval_ms = 250\n").unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.mount_root, PathBuf::from("/mnt/smb"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "poll_interval_ms = \"soon\"\n").unwrap();
        assert!(Config::load_from(temp_file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("SMB_NOTIFIER_POLL_INTERVAL_MS", "1500"),
                ("SMB_NOTIFIER_LIST_TIMEOUT_MS", "750"),
                ("SMB_NOTIFIER_MOUNT_ROOT", "/env/mounts"),
                ("SMB_NOTIFIER_LOG_LEVEL", "trace"),
                ("SMB_NOTIFIER_LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.poll_interval_ms, 1500);
        assert_eq!(config.list_timeout_ms, 750);
        assert_eq!(config.mount_root, PathBuf::from("/env/mounts"));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_no_overrides_leaves_config_untouched() {
        let mut config = Config::default();
        config.apply_overrides(env(&[])).unwrap();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_override_values() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(env(&[("SMB_NOTIFIER_POLL_INTERVAL_MS", "fast")]))
            .is_err());
        assert!(config
            .apply_overrides(env(&[("SMB_NOTIFIER_LOG_FORMAT", "xml")]))
            .is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_list_timeout_rejected() {
        let config = Config {
            list_timeout_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
