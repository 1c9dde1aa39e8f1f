#![deny(missing_docs)]

//! # Restdoc Core
//!
//! OpenAPI operation documentation from response declarations and DTO
//! descriptors, and the uniform JSON response envelope those operations return.

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// DTO descriptors and the descriptor registry.
pub mod descriptor;

/// Type mapping logic (declared type -> OpenAPI).
pub mod type_mapping;

/// Envelope model and serialization views.
pub mod envelope;

/// Pagination metadata.
pub mod pagination;

/// Response declarations and presets.
pub mod declaration;

/// Operation documentation generator.
pub mod generator;

/// OpenAPI operation rendering.
pub mod render;

/// OpenAPI document assembly.
pub mod assembler;

/// Response builder.
pub mod response;

pub use assembler::{ApiInfo, DocumentAssembler};
pub use config::GeneratorConfig;
pub use declaration::{
    bad_request_response, error_response, no_content_response, not_found_response,
    paginated_success_response, query_string_error_responses, request_payload_error_responses,
    success_response, ResponseDeclaration, ResponseEntry, ResponseShape,
};
pub use descriptor::{
    DescribeType, DescriptorRegistry, FieldDescriptor, ParamLocation, ParamStyle,
    ParameterDescriptor, TypeDescriptor, TypeDescriptorProvider, TypeKind,
};
pub use envelope::{
    groups, ApiResponseStatus, Envelope, ErrorCode, ErrorCodeSource, SerializationView,
    ValidationError,
};
pub use error::{AppError, AppResult};
pub use generator::{
    DocumentationGenerator, HttpMethod, OperationDoc, OperationRequest, QueryParameter,
    RequestBodyDoc,
};
pub use pagination::{Page, PageResult, PaginationMeta, PerPage};
pub use render::render_operation;
pub use response::{
    build_described_paginated, build_described_success, build_error, build_not_found,
    build_paginated, build_success, filter_by_groups, ApiResponse,
};
pub use type_mapping::{DefaultTypeMapper, FieldType, TypeMapper};
