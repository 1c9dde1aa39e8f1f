//! # Web Configuration
//!
//! Environment-driven settings of the server binary.

use restdoc_core::{AppResult, GeneratorConfig};
use std::path::PathBuf;

/// Bind address used when `RESTDOC_WEB_BIND` is unset.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Stop right after startup (smoke tests).
    pub oneshot: bool,
    /// Optional generator config file.
    pub generator_config: Option<PathBuf>,
}

impl WebConfig {
    /// Reads `RESTDOC_WEB_BIND`, `RESTDOC_WEB_ONESHOT` and `RESTDOC_CONFIG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind: lookup("RESTDOC_WEB_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            oneshot: lookup("RESTDOC_WEB_ONESHOT").is_some(),
            generator_config: lookup("RESTDOC_CONFIG")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Loads the generator config, falling back to the defaults.
    pub fn load_generator_config(&self) -> AppResult<GeneratorConfig> {
        match &self.generator_config {
            Some(path) => GeneratorConfig::from_path(path),
            None => Ok(GeneratorConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert!(!config.oneshot);
        assert!(config.generator_config.is_none());
        assert!(config.load_generator_config().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = WebConfig::from_lookup(lookup(&[
            ("RESTDOC_WEB_BIND", "0.0.0.0:9000"),
            ("RESTDOC_WEB_ONESHOT", "1"),
            ("RESTDOC_CONFIG", "/etc/restdoc.yaml"),
        ]));
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert!(config.oneshot);
        assert_eq!(
            config.generator_config,
            Some(PathBuf::from("/etc/restdoc.yaml"))
        );
    }

    #[test]
    fn test_missing_config_file_fails() {
        let config = WebConfig::from_lookup(lookup(&[("RESTDOC_CONFIG", "/nope/restdoc.yaml")]));
        assert!(config.load_generator_config().is_err());
    }
}
