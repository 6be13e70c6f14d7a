//! Settings loaded from `jobchain.toml`.
//!
//! Missing keys fall back to defaults. `JOBCHAIN_MAX_DISPATCHES` overrides
//! the file's dispatch bound.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "jobchain.toml";
pub const MAX_DISPATCHES_ENV: &str = "JOBCHAIN_MAX_DISPATCHES";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobchainConfig {
    /// Give up on a chain after this many dispatches. Unbounded when unset.
    #[serde(default)]
    pub max_dispatches: Option<u64>,

    /// Parameters of the built-in demo chain.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Counters used by `jobchain demo`.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_first_start")]
    pub first_start: i32,

    #[serde(default = "default_second_start")]
    pub second_start: i32,

    #[serde(default = "default_threshold")]
    pub threshold: i32,
}

fn default_first_start() -> i32 {
    -10
}

fn default_second_start() -> i32 {
    -5
}

fn default_threshold() -> i32 {
    crate::jobs::DEFAULT_THRESHOLD
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            first_start: default_first_start(),
            second_start: default_second_start(),
            threshold: default_threshold(),
        }
    }
}

impl JobchainConfig {
    /// Load `jobchain.toml` from the working directory, then apply the
    /// environment override.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))?
            .with_env_override(std::env::var(MAX_DISPATCHES_ENV).ok().as_deref())
    }

    /// Load from `path`, using defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Apply a raw `JOBCHAIN_MAX_DISPATCHES` value. Empty values are ignored.
    pub fn with_env_override(mut self, raw: Option<&str>) -> Result<Self> {
        if let Some(raw) = raw.map(str::trim)
            && !raw.is_empty()
        {
            let limit = raw
                .parse::<u64>()
                .with_context(|| format!("{MAX_DISPATCHES_ENV} must be a whole number, got {raw:?}"))?;
            self.max_dispatches = Some(limit);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = JobchainConfig::default();
        assert_eq!(config.max_dispatches, None);
        assert_eq!(config.demo.first_start, -10);
        assert_eq!(config.demo.second_start, -5);
        assert_eq!(config.demo.threshold, 10);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            max_dispatches = 1000

            [demo]
            second_start = 3
        "#;
        let config: JobchainConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_dispatches, Some(1000));
        assert_eq!(config.demo.first_start, -10);
        assert_eq!(config.demo.second_start, 3);
        assert_eq!(config.demo.threshold, 10);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = JobchainConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.max_dispatches, None);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[demo]\nthreshold = 4\n").unwrap();

        let config = JobchainConfig::load_from(&path).unwrap();
        assert_eq!(config.demo.threshold, 4);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "max_dispatches = \"lots\"\n").unwrap();

        let err = JobchainConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn env_override_takes_precedence() {
        let config = JobchainConfig {
            max_dispatches: Some(10),
            ..Default::default()
        };
        let config = config.with_env_override(Some(" 250 ")).unwrap();
        assert_eq!(config.max_dispatches, Some(250));
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let config = JobchainConfig::default().with_env_override(Some("")).unwrap();
        assert_eq!(config.max_dispatches, None);
        let config = JobchainConfig::default().with_env_override(None).unwrap();
        assert_eq!(config.max_dispatches, None);
    }

    #[test]
    fn invalid_env_override_is_rejected() {
        assert!(
            JobchainConfig::default()
                .with_env_override(Some("-3"))
                .is_err()
        );
    }
}
