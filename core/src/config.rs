//! # Generator Configuration
//!
//! Settings for the documentation generator, loadable from YAML or JSON.

use crate::declaration::{error_response, ResponseDeclaration};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Documentation generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Responses added to every operation unless it declares the same status code.
    pub default_responses: Vec<ResponseDeclaration>,
    /// Description of generated request bodies.
    pub request_body_description: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_responses: vec![error_response()
                .with_status(400)
                .with_description("Bad request")],
            request_body_description: "Payload for request".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a YAML (or JSON) document. Missing keys keep their defaults.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> AppResult<()> {
        for decl in &self.default_responses {
            if !(100..=599).contains(&decl.status) {
                return Err(AppError::Config(format!(
                    "default response status {} is not a valid HTTP status code",
                    decl.status
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_has_bad_request() {
        let config = GeneratorConfig::default();
        assert_eq!(config.default_responses.len(), 1);
        assert_eq!(config.default_responses[0].status, 400);
        assert_eq!(config.default_responses[0].description, "Bad request");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GeneratorConfig::from_yaml_str("request_body_description: Body").unwrap();
        assert_eq!(config.request_body_description, "Body");
        assert_eq!(config.default_responses[0].status, 400);
    }

    #[test]
    fn test_invalid_status_rejected() {
        let yaml = "default_responses:\n  - status: 42\n    description: Odd\n";
        let err = GeneratorConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_responses:\n  - status: 500\n    description: Server error\n    shape: bare"
        )
        .unwrap();

        let config = GeneratorConfig::from_path(file.path()).unwrap();
        assert_eq!(config.default_responses.len(), 1);
        assert_eq!(config.default_responses[0].status, 500);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GeneratorConfig::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
