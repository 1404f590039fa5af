//! # CLI Configuration
//!
//! Settings are resolved in layers, later layers winning:
//!
//! 1. Built-in defaults: store at `.formkit/forms.json`, log level `warn`.
//! 2. A YAML file named by `--config` or `FORMKIT_CONFIG`.
//! 3. Environment: `FORMKIT_STORE`, `FORMKIT_LOG`.
//! 4. The `--store` flag.
//!
//! ```yaml
//! store_path: /home/me/forms.json
//! log_level: info
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default location of the saved form collection.
pub const DEFAULT_STORE_PATH: &str = ".formkit/forms.json";

/// Default tracing filter when no `-v` flag is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// JSON file holding the saved forms.
    pub store_path: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `formkit_state=debug`.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl CliConfig {
    /// Resolve settings from the process environment.
    pub fn load(config_file: Option<&Path>, store_flag: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(config_file, store_flag, |var| std::env::var(var).ok())
    }

    /// Resolve settings with `env` standing in for the process environment.
    pub fn resolve<F>(
        config_file: Option<&Path>,
        store_flag: Option<&Path>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = config_file
            .map(Path::to_path_buf)
            .or_else(|| env("FORMKIT_CONFIG").map(PathBuf::from));

        let mut config = match file {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };

        if let Some(store) = env("FORMKIT_STORE").filter(|s| !s.is_empty()) {
            config.store_path = PathBuf::from(store);
        }
        if let Some(level) = env("FORMKIT_LOG").filter(|s| !s.is_empty()) {
            config.log_level = level;
        }
        if let Some(store) = store_flag {
            config.store_path = store.to_path_buf();
        }
        Ok(config)
    }

    /// Read a YAML config file. Absent keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = CliConfig::resolve(None, None, env_of(&[])).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.store_path, PathBuf::from(".formkit/forms.json"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("formkit.yaml");
        std::fs::write(&file, "store_path: /from/file.json\nlog_level: debug\n").unwrap();

        let config = CliConfig::resolve(Some(&file), None, env_of(&[])).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/from/file.json"));
        assert_eq!(config.log_level, "debug");

        let env = env_of(&[("FORMKIT_STORE", "/from/env.json")]);
        let config = CliConfig::resolve(Some(&file), None, env).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/from/env.json"));
        assert_eq!(config.log_level, "debug");

        let env = env_of(&[("FORMKIT_STORE", "/from/env.json"), ("FORMKIT_LOG", "trace")]);
        let flag = PathBuf::from("/from/flag.json");
        let config = CliConfig::resolve(Some(&file), Some(&flag), env).unwrap();
        assert_eq!(config.store_path, flag);
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn config_file_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("formkit.yaml");
        std::fs::write(&file, "log_level: info\n").unwrap();

        let file_str = file.to_string_lossy().into_owned();
        let env = env_of(&[("FORMKIT_CONFIG", file_str.as_str())]);
        let config = CliConfig::resolve(None, None, env).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            CliConfig::resolve(Some(&missing), None, env_of(&[])),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("formkit.yaml");
        std::fs::write(&file, "store: /typo.json\n").unwrap();
        assert!(matches!(
            CliConfig::from_yaml_file(&file),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("formkit.yaml");
        std::fs::write(&file, "").unwrap();
        assert_eq!(CliConfig::from_yaml_file(&file).unwrap(), CliConfig::default());
    }
}
