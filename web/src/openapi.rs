//! # OpenAPI Document
//!
//! Documentation of the demo routes, generated from their declarations.

use crate::controller::internal_error;
use crate::users::{CreateUserPayload, ListUsersQuery, UserView, DETAIL_GROUP, LIST_GROUP};
use actix_web::{get, web, HttpResponse};
use restdoc_core::{
    no_content_response, not_found_response, paginated_success_response,
    query_string_error_responses, request_payload_error_responses, success_response, ApiInfo,
    AppResult, DescriptorRegistry, DocumentAssembler, DocumentationGenerator, GeneratorConfig,
    OperationRequest, PaginationMeta, ValidationError,
};
use serde_json::Value;
use tracing::debug;

/// Every type the demo routes reference.
pub fn registry() -> DescriptorRegistry {
    DescriptorRegistry::new()
        .with::<UserView>()
        .with::<CreateUserPayload>()
        .with::<ListUsersQuery>()
        .with::<PaginationMeta>()
        .with::<ValidationError>()
}

/// Operation declarations keyed by path.
pub fn operations() -> Vec<(&'static str, OperationRequest)> {
    vec![
        (
            "/users",
            OperationRequest::new("GET", "listUsers", "List users")
                .query("ListUsersQuery")
                .response(paginated_success_response("UserView").with_groups([LIST_GROUP]))
                .response(query_string_error_responses()),
        ),
        (
            "/users",
            OperationRequest::new("POST", "createUser", "Register a user")
                .body("CreateUserPayload")
                .response(
                    success_response("UserView")
                        .with_groups([DETAIL_GROUP])
                        .with_status(201)
                        .with_description("User created"),
                )
                .response(request_payload_error_responses()),
        ),
        (
            "/users/{id}",
            OperationRequest::new("GET", "getUser", "Fetch a user")
                .response(success_response("UserView").with_groups([DETAIL_GROUP]))
                .response(not_found_response()),
        ),
        (
            "/users/{id}",
            OperationRequest::new("DELETE", "deleteUser", "Delete a user")
                .response(no_content_response())
                .response(not_found_response()),
        ),
    ]
}

/// Builds the full document.
pub fn api_document(config: &GeneratorConfig) -> AppResult<Value> {
    let registry = registry();
    let generator = DocumentationGenerator::new(&registry).with_config(config.clone());
    let mut assembler = DocumentAssembler::new(
        ApiInfo::new("restdoc demo", env!("CARGO_PKG_VERSION"))
            .with_description("Users resource answering with the response envelope"),
    );
    for (path, request) in operations() {
        let doc = generator.build_operation(&request)?;
        assembler.add(path, &doc);
    }
    debug!(
        operations = assembler.operation_count(),
        "assembled OpenAPI document"
    );
    Ok(assembler.to_json(&registry))
}

/// Serves the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json(config: web::Data<GeneratorConfig>) -> actix_web::Result<HttpResponse> {
    let doc = api_document(&config).map_err(internal_error)?;
    Ok(HttpResponse::Ok().json(doc))
}
