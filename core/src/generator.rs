#![deny(missing_docs)]

//! # Documentation Generator
//!
//! Turns an operation declaration (method, responses, query/body DTOs) into an
//! `OperationDoc`. Runs at documentation time; every error is fatal for the
//! operation being built.

use crate::config::GeneratorConfig;
use crate::declaration::{ResponseDeclaration, ResponseEntry};
use crate::descriptor::TypeDescriptorProvider;
use crate::error::{AppError, AppResult};
use crate::type_mapping::{DefaultTypeMapper, TypeMapper};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Merging of explicit and default responses.
pub mod merge;

/// Parameters from query DTOs.
pub mod params;

pub use merge::{index_responses, merge_responses};
pub use params::{parameters_from_type, QueryParameter};

/// The HTTP methods an operation can be documented for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

/// Methods that may declare query DTOs.
pub const QUERY_DTO_METHODS: &[HttpMethod] = &[HttpMethod::Get, HttpMethod::Post];

/// Methods that may declare a request body DTO.
pub const BODY_DTO_METHODS: &[HttpMethod] = &[HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch];

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lower-case key used in OpenAPI path items.
    pub fn path_item_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(AppError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Everything needed to document one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// HTTP method name, case-insensitive.
    pub method: String,
    /// Unique operation id.
    pub operation_id: String,
    /// One-line summary.
    pub summary: String,
    /// Declared responses, in declaration order.
    pub responses: Vec<ResponseEntry>,
    /// DTOs whose fields become parameters.
    pub query_types: Vec<String>,
    /// DTO documented as JSON request body.
    pub body_type: Option<String>,
    /// Serialization groups for the request body.
    pub groups: Vec<String>,
}

impl OperationRequest {
    /// Starts a declaration without responses or DTOs.
    pub fn new(
        method: impl Into<String>,
        operation_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            operation_id: operation_id.into(),
            summary: summary.into(),
            responses: Vec::new(),
            query_types: Vec::new(),
            body_type: None,
            groups: Vec::new(),
        }
    }

    /// Adds a response entry.
    pub fn response(mut self, entry: impl Into<ResponseEntry>) -> Self {
        self.responses.push(entry.into());
        self
    }

    /// Adds a query DTO.
    pub fn query(mut self, type_name: impl Into<String>) -> Self {
        self.query_types.push(type_name.into());
        self
    }

    /// Sets the request body DTO.
    pub fn body(mut self, type_name: impl Into<String>) -> Self {
        self.body_type = Some(type_name.into());
        self
    }

    /// Sets the request body serialization groups.
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// Documented JSON request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyDoc {
    /// Referenced DTO.
    pub type_name: String,
    /// Serialization groups applied to the DTO.
    pub groups: Vec<String>,
    /// Description.
    pub description: String,
    /// Always true for generated bodies.
    pub required: bool,
}

/// The documentation of one HTTP operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDoc {
    /// HTTP method.
    pub method: HttpMethod,
    /// Unique operation id.
    pub operation_id: String,
    /// One-line summary.
    pub summary: String,
    /// Parameters from the query DTOs, in DTO then field order.
    pub parameters: Vec<QueryParameter>,
    /// JSON request body.
    pub request_body: Option<RequestBodyDoc>,
    /// Responses keyed by status code, explicit declarations first.
    pub responses: IndexMap<u16, ResponseDeclaration>,
}

/// Builds `OperationDoc`s against a type descriptor provider.
pub struct DocumentationGenerator<'a, P: TypeDescriptorProvider> {
    provider: &'a P,
    config: GeneratorConfig,
    mapper: Box<dyn TypeMapper + Send + Sync>,
}

impl<'a, P: TypeDescriptorProvider> DocumentationGenerator<'a, P> {
    /// A generator with the default configuration.
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            config: GeneratorConfig::default(),
            mapper: Box::new(DefaultTypeMapper),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the type mapper.
    pub fn with_mapper(mut self, mapper: impl TypeMapper + Send + Sync + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Documents one operation.
    pub fn build_operation(&self, request: &OperationRequest) -> AppResult<OperationDoc> {
        let method: HttpMethod = request.method.parse()?;
        validate_dto_methods(method, request)?;

        let mut parameters = Vec::new();
        for type_name in &request.query_types {
            let descriptor = self
                .provider
                .describe_fields(type_name)
                .ok_or_else(|| AppError::UnknownType(type_name.clone()))?;
            parameters.extend(parameters_from_type(descriptor, self.mapper.as_ref())?);
        }

        let request_body = match &request.body_type {
            Some(type_name) => {
                if !self.provider.contains(type_name) {
                    return Err(AppError::UnknownType(type_name.clone()));
                }
                Some(RequestBodyDoc {
                    type_name: type_name.clone(),
                    groups: request.groups.clone(),
                    description: self.config.request_body_description.clone(),
                    required: true,
                })
            }
            None => None,
        };

        let defaults: Vec<ResponseEntry> = self
            .config
            .default_responses
            .iter()
            .cloned()
            .map(ResponseEntry::Single)
            .collect();
        let responses = merge_responses(&request.responses, &defaults);

        debug!(
            operation_id = %request.operation_id,
            method = %method,
            parameters = parameters.len(),
            responses = responses.len(),
            "built operation documentation"
        );

        Ok(OperationDoc {
            method,
            operation_id: request.operation_id.clone(),
            summary: request.summary.clone(),
            parameters,
            request_body,
            responses,
        })
    }
}

fn validate_dto_methods(method: HttpMethod, request: &OperationRequest) -> AppResult<()> {
    if !request.query_types.is_empty() && !QUERY_DTO_METHODS.contains(&method) {
        return Err(AppError::InvalidDeclaration(format!(
            "query DTOs can be used only with {} methods",
            join_methods(QUERY_DTO_METHODS)
        )));
    }
    if request.body_type.is_some() && !BODY_DTO_METHODS.contains(&method) {
        return Err(AppError::InvalidDeclaration(format!(
            "request body DTOs can be used only with {} methods",
            join_methods(BODY_DTO_METHODS)
        )));
    }
    Ok(())
}

fn join_methods(methods: &[HttpMethod]) -> String {
    methods
        .iter()
        .map(HttpMethod::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
