//! # Controller Helpers
//!
//! Shortcuts used by handlers to answer with the response envelope.

use actix_web::body::BoxBody;
use actix_web::error::{
    ErrorInternalServerError, ErrorNotFound, InternalError, JsonPayloadError, QueryPayloadError,
};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use restdoc_core::response::{HTTP_NOT_FOUND, HTTP_OK, HTTP_UNPROCESSABLE_ENTITY};
use restdoc_core::{
    build_described_paginated, build_described_success, build_error, build_not_found,
    ApiResponse, AppError, DescribeType, ErrorCode, ErrorCodeSource, PageResult,
    ValidationError,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Message of validation failure responses.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Body of [`unprocessable_response`] when no message is given.
pub const UNPROCESSABLE_ERROR: &str = "Unprocessable error";

/// A built response, sent as JSON with its own status code.
#[derive(Debug, Clone)]
pub struct JsonEnvelope(pub ApiResponse);

impl Responder for JsonEnvelope {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        debug!(status = status.as_u16(), "sending envelope");
        HttpResponse::build(status).json(self.0.body())
    }
}

/// Maps a core error to a 500.
pub fn internal_error(err: AppError) -> actix_web::Error {
    error!(error = %err, "failed to build response");
    ErrorInternalServerError(err)
}

/// 200 success envelope, `data` restricted to the fields in `groups`.
pub fn success_response<T: Serialize + DescribeType>(
    data: &T,
    groups: &[&str],
) -> actix_web::Result<JsonEnvelope> {
    success_response_with_status(data, groups, HTTP_OK)
}

/// Success envelope with a custom status (e.g. 201).
pub fn success_response_with_status<T: Serialize + DescribeType>(
    data: &T,
    groups: &[&str],
    status: u16,
) -> actix_web::Result<JsonEnvelope> {
    build_described_success(data, groups, None, status)
        .map(JsonEnvelope)
        .map_err(internal_error)
}

/// 200 success envelope with pagination meta.
pub fn paginate_response<P>(page: &P, groups: &[&str]) -> actix_web::Result<JsonEnvelope>
where
    P: PageResult + ?Sized,
    P::Item: Serialize + DescribeType,
{
    build_described_paginated(page, groups)
        .map(JsonEnvelope)
        .map_err(internal_error)
}

/// Error envelope without error code.
pub fn error_response(message: &str, errors: Vec<Value>, status: u16) -> JsonEnvelope {
    JsonEnvelope(build_error(message, errors, status, None))
}

/// Error envelope carrying a machine-readable code.
pub fn coded_error_response(
    message: &str,
    errors: Vec<Value>,
    status: u16,
    code: &dyn ErrorCodeSource,
) -> JsonEnvelope {
    JsonEnvelope(build_error(message, errors, status, Some(code.error_code())))
}

/// 404. With `thrown` the request fails with actix' not-found error instead
/// of answering with an envelope.
pub fn not_found_response(thrown: bool) -> actix_web::Result<JsonEnvelope> {
    if thrown {
        return Err(ErrorNotFound(ErrorCode::NotFound.error_code().to_string()));
    }
    Ok(JsonEnvelope(build_not_found()))
}

/// 204 without body.
pub fn no_content_response() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Plain-text 422 carrying `message`.
pub fn unprocessable_response(message: Option<&str>) -> HttpResponse {
    HttpResponse::UnprocessableEntity()
        .content_type("text/plain; charset=utf-8")
        .body(message.unwrap_or(UNPROCESSABLE_ERROR).to_string())
}

/// 422 error envelope listing validation errors.
pub fn validation_failed_response(
    errors: &[ValidationError],
) -> actix_web::Result<JsonEnvelope> {
    let errors = errors
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| internal_error(err.into()))?;
    Ok(error_response(
        VALIDATION_FAILED,
        errors,
        HTTP_UNPROCESSABLE_ENTITY,
    ))
}

/// Query strings that fail to map answer 404 "Invalid query string".
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "query string rejected");
    let body = build_error(
        "Invalid query string",
        vec![json!(err.to_string())],
        HTTP_NOT_FOUND,
        None,
    )
    .body();
    InternalError::from_response(err, HttpResponse::NotFound().json(body)).into()
}

/// JSON payloads that fail to map answer 415 for a wrong content type and 400
/// otherwise.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "json payload rejected");
    let (status, message) = match &err {
        JsonPayloadError::ContentType => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type")
        }
        _ => (StatusCode::BAD_REQUEST, "Invalid payload"),
    };
    let body = build_error(message, vec![json!(err.to_string())], status.as_u16(), None).body();
    InternalError::from_response(err, HttpResponse::build(status).json(body)).into()
}
