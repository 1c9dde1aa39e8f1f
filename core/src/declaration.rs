#![deny(missing_docs)]

//! # Response Declarations
//!
//! Static descriptions of the responses an operation can produce, and the catalog
//! of presets for the common cases.

use crate::envelope::ValidationError;
use crate::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};

/// How a response body is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// JSON body wrapped in the response envelope.
    #[default]
    Enveloped,
    /// Description only, no body schema.
    Bare,
}

/// One documented status-code response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDeclaration {
    /// HTTP status code.
    pub status: u16,
    /// Response description. Blank descriptions fall back to the reason phrase.
    #[serde(default)]
    pub description: String,
    /// Type placed in `data`.
    #[serde(default)]
    pub payload: Option<String>,
    /// Serialization groups applied to the payload type.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Whether `data` is a list of `payload`.
    #[serde(default)]
    pub is_array: bool,
    /// Type placed in `meta`.
    #[serde(default)]
    pub meta: Option<String>,
    /// Body documentation style.
    #[serde(default)]
    pub shape: ResponseShape,
}

impl ResponseDeclaration {
    /// An enveloped response without payload type.
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            payload: None,
            groups: Vec::new(),
            is_array: false,
            meta: None,
            shape: ResponseShape::Enveloped,
        }
    }

    /// A response documented by its description only.
    pub fn bare(status: u16, description: impl Into<String>) -> Self {
        Self {
            shape: ResponseShape::Bare,
            ..Self::new(status, description)
        }
    }

    /// Sets the payload type.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets the payload serialization groups.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Documents `data` as a list.
    pub fn as_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    /// Sets the meta type.
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Overrides the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Overrides the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// True for 2xx codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An entry in an operation's response list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEntry {
    /// A single declaration.
    Single(ResponseDeclaration),
    /// A bundle of declarations documented together.
    List(Vec<ResponseDeclaration>),
}

impl ResponseEntry {
    /// Iterates the declarations in order.
    pub fn declarations(&self) -> &[ResponseDeclaration] {
        match self {
            ResponseEntry::Single(decl) => std::slice::from_ref(decl),
            ResponseEntry::List(list) => list,
        }
    }
}

impl From<ResponseDeclaration> for ResponseEntry {
    fn from(decl: ResponseDeclaration) -> Self {
        ResponseEntry::Single(decl)
    }
}

impl From<Vec<ResponseDeclaration>> for ResponseEntry {
    fn from(list: Vec<ResponseDeclaration>) -> Self {
        ResponseEntry::List(list)
    }
}

/// 200 with a `payload` body.
pub fn success_response(payload: impl Into<String>) -> ResponseDeclaration {
    ResponseDeclaration::new(200, "Successful response").with_payload(payload)
}

/// 200 with a list of `payload` and pagination meta.
pub fn paginated_success_response(payload: impl Into<String>) -> ResponseDeclaration {
    ResponseDeclaration::new(200, "Successful paginated response")
        .with_payload(payload)
        .as_array(true)
        .with_meta(PaginationMeta::TYPE_NAME)
}

/// 422 carrying validation errors.
pub fn error_response() -> ResponseDeclaration {
    ResponseDeclaration::new(422, "Payload validation failed")
        .with_payload(ValidationError::TYPE_NAME)
        .as_array(true)
}

/// 404 as produced by the not-found controller helper.
pub fn not_found_response() -> ResponseDeclaration {
    error_response()
        .with_status(404)
        .with_description("Resource not found")
}

/// 400 with a `payload` body.
pub fn bad_request_response(payload: impl Into<String>) -> ResponseDeclaration {
    ResponseDeclaration::new(400, "When the request is malformed or invalid").with_payload(payload)
}

/// 204 without body.
pub fn no_content_response() -> ResponseDeclaration {
    ResponseDeclaration::bare(204, "Return success response with no content")
}

/// Responses produced when a JSON request payload fails to map.
pub fn request_payload_error_responses() -> ResponseEntry {
    ResponseEntry::List(vec![
        error_response(),
        error_response()
            .with_status(400)
            .with_description("Invalid payload"),
        error_response()
            .with_status(415)
            .with_description("Unsupported media type"),
    ])
}

/// Responses produced when a query string fails to map.
pub fn query_string_error_responses() -> ResponseEntry {
    ResponseEntry::List(vec![ResponseDeclaration::bare(404, "Invalid query string")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_preset() {
        let decl = paginated_success_response("UserView");
        assert_eq!(decl.status, 200);
        assert!(decl.is_array);
        assert_eq!(decl.meta.as_deref(), Some("PaginationMeta"));
        assert!(decl.is_success());
    }

    #[test]
    fn test_not_found_preset_is_error_list() {
        let decl = not_found_response();
        assert_eq!(decl.status, 404);
        assert_eq!(decl.payload.as_deref(), Some("ValidationError"));
        assert!(decl.is_array);
        assert!(!decl.is_success());
    }

    #[test]
    fn test_payload_error_bundle_order() {
        let codes: Vec<u16> = request_payload_error_responses()
            .declarations()
            .iter()
            .map(|d| d.status)
            .collect();
        assert_eq!(codes, vec![422, 400, 415]);
    }

    #[test]
    fn test_no_content_is_bare() {
        let decl = no_content_response();
        assert_eq!(decl.shape, ResponseShape::Bare);
        assert!(decl.payload.is_none());
    }

    #[test]
    fn test_declaration_from_yaml_defaults() {
        let decl: ResponseDeclaration =
            serde_yaml::from_str("status: 409\ndescription: Conflict").unwrap();
        assert_eq!(decl, ResponseDeclaration::new(409, "Conflict"));
    }
}
