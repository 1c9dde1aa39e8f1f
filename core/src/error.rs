//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every documentation-time variant is fatal for the operation being built:
//! the generator never returns a partial `OperationDoc`.

use derive_more::{Display, From};

/// The Global Error Enum.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The HTTP method is not one of GET, POST, PUT, PATCH or DELETE.
    #[from(ignore)]
    #[display("Method not supported: {_0}")]
    UnsupportedMethod(String),

    /// A query or body DTO was declared on a method that does not accept it.
    #[from(ignore)]
    #[display("Invalid declaration: {_0}")]
    InvalidDeclaration(String),

    /// A DTO field has no resolvable type.
    #[from(ignore)]
    #[display(
        "Parameter {field} in type {type_name} has no type. It is required to generate OpenAPI documentation."
    )]
    MissingType {
        /// Declaring DTO.
        type_name: String,
        /// Offending field.
        field: String,
    },

    /// An array-typed query field has no explicit parameter descriptor.
    #[from(ignore)]
    #[display(
        "Property {field} in type {type_name} has no parameter descriptor. (Array type parameters must have a parameter descriptor.)"
    )]
    MissingParameterDescriptor {
        /// Declaring DTO.
        type_name: String,
        /// Offending field.
        field: String,
    },

    /// A field carries more than one parameter descriptor.
    #[from(ignore)]
    #[display("Property {field} in type {type_name} has more than one parameter descriptor.")]
    DuplicateDescriptor {
        /// Declaring DTO.
        type_name: String,
        /// Offending field.
        field: String,
    },

    /// A referenced DTO type is not known to the descriptor provider.
    #[from(ignore)]
    #[display("Type \"{_0}\" does not exist.")]
    UnknownType(String),

    /// Wrapper for JSON serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML serialization errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Invalid configuration values.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[test]
    fn test_field_error_messages() {
        let err = AppError::MissingParameterDescriptor {
            type_name: "ListQuery".into(),
            field: "tags".into(),
        };
        assert_eq!(
            err.to_string(),
            "Property tags in type ListQuery has no parameter descriptor. (Array type parameters must have a parameter descriptor.)"
        );

        let err = AppError::UnknownType("Ghost".into());
        assert_eq!(err.to_string(), "Type \"Ghost\" does not exist.");
    }
}
