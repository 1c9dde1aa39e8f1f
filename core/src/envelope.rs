#![deny(missing_docs)]

//! # Response Envelope
//!
//! The uniform wrapper around every API response body, the serialization views
//! that select which envelope fields are emitted, and the error payload models.

use crate::descriptor::{DescribeType, FieldDescriptor, TypeDescriptor, TypeKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Serialization group names used by the envelope.
pub mod groups {
    /// Fields emitted for successful responses.
    pub const API_SUCCESS: &str = "api_success";
    /// Fields emitted for error responses.
    pub const API_ERROR: &str = "api_error";
    /// The machine-readable error code.
    pub const API_ERROR_CODE: &str = "api_error_code";
}

/// Overall outcome carried in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponseStatus {
    /// The request succeeded.
    #[serde(rename = "SUCCESS")]
    Success,
    /// The request failed.
    #[serde(rename = "ERROR")]
    Error,
}

impl ApiResponseStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiResponseStatus::Success => "SUCCESS",
            ApiResponseStatus::Error => "ERROR",
        }
    }
}

/// An ordered, duplicate-free set of serialization group names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SerializationView {
    groups: Vec<String>,
}

impl SerializationView {
    /// Creates a view from group names, dropping duplicates.
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut view = Self::default();
        view.extend(groups);
        view
    }

    /// Adds groups not already present.
    pub fn extend<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for group in groups {
            let group = group.into();
            if !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
    }

    /// True when `group` is part of the view.
    pub fn contains(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// True when any of `groups` is part of the view.
    pub fn contains_any(&self, groups: &[&str]) -> bool {
        groups.iter().any(|g| self.contains(g))
    }

    /// Group names in insertion order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

const DATA_GROUPS: &[&str] = &[groups::API_SUCCESS];
const META_GROUPS: &[&str] = &[groups::API_SUCCESS];
const STATUS_GROUPS: &[&str] = &[groups::API_SUCCESS, groups::API_ERROR];
const MESSAGE_GROUPS: &[&str] = &[groups::API_ERROR];
const ERRORS_GROUPS: &[&str] = &[groups::API_ERROR];
const CODE_GROUPS: &[&str] = &[groups::API_ERROR_CODE];

/// The uniform response wrapper.
///
/// Construct through [`Envelope::success`] or [`Envelope::error`]; `errors` is only
/// ever populated on error envelopes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    data: Value,
    meta: Value,
    status: ApiResponseStatus,
    message: String,
    errors: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl Envelope {
    /// A success envelope around `data` and `meta`.
    pub fn success(data: Value, meta: Value) -> Self {
        Self {
            data,
            meta,
            status: ApiResponseStatus::Success,
            message: String::new(),
            errors: Vec::new(),
            code: None,
        }
    }

    /// An error envelope.
    pub fn error(message: impl Into<String>, errors: Vec<Value>) -> Self {
        Self {
            data: Value::Null,
            meta: Value::Null,
            status: ApiResponseStatus::Error,
            message: message.into(),
            errors,
            code: None,
        }
    }

    /// Sets the machine-readable error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Payload.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Metadata (pagination etc.).
    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Outcome.
    pub fn status(&self) -> ApiResponseStatus {
        self.status
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error details.
    pub fn errors(&self) -> &[Value] {
        &self.errors
    }

    /// Error code, when one was supplied.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Serializes the fields selected by `view`.
    pub fn render(&self, view: &SerializationView) -> Value {
        let mut out = Map::new();
        if view.contains_any(ERRORS_GROUPS) {
            out.insert("errors".to_string(), Value::Array(self.errors.clone()));
        }
        if view.contains_any(DATA_GROUPS) {
            out.insert("data".to_string(), self.data.clone());
        }
        if view.contains_any(META_GROUPS) {
            out.insert("meta".to_string(), self.meta.clone());
        }
        if view.contains_any(STATUS_GROUPS) {
            out.insert("status".to_string(), json!(self.status.as_str()));
        }
        if view.contains_any(MESSAGE_GROUPS) {
            out.insert("message".to_string(), json!(self.message));
        }
        if view.contains_any(CODE_GROUPS) {
            out.insert(
                "code".to_string(),
                json!(self.code.as_deref().unwrap_or_default()),
            );
        }
        Value::Object(out)
    }
}

/// Source of a machine-readable error code.
pub trait ErrorCodeSource {
    /// The code string placed in `errors` or `code`.
    fn error_code(&self) -> &str;
}

/// Error codes produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The requested resource does not exist.
    #[serde(rename = "NOT_FOUND")]
    NotFound,
}

impl ErrorCodeSource for ErrorCode {
    fn error_code(&self) -> &str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

/// A validation failure on one property of a request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    property_path: String,
    value: Value,
    errors: Vec<String>,
}

impl ValidationError {
    /// Name used when documenting this type.
    pub const TYPE_NAME: &'static str = "ValidationError";

    /// Creates an error for `property_path`.
    pub fn new(property_path: impl Into<String>, value: Value, errors: Vec<String>) -> Self {
        Self {
            property_path: property_path.into(),
            value,
            errors,
        }
    }

    /// Appends a message.
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    /// The offending property.
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    /// The rejected value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl DescribeType for ValidationError {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .with_description("A validation failure on one payload property")
            .field(
                FieldDescriptor::new("propertyPath", TypeKind::builtin("String"))
                    .in_groups([groups::API_ERROR]),
            )
            .field(
                FieldDescriptor::new("value", TypeKind::builtin("mixed"))
                    .nullable()
                    .in_groups([groups::API_ERROR]),
            )
            .field(
                FieldDescriptor::new("errors", TypeKind::array_of(TypeKind::builtin("String")))
                    .in_groups([groups::API_ERROR]),
            )
    }
}
