#![deny(missing_docs)]

//! # Operation Rendering
//!
//! Renders an `OperationDoc` into an OpenAPI operation object. Enveloped
//! responses are documented with the envelope schema around the declared
//! payload; bare responses carry their description only.

use crate::declaration::{ResponseDeclaration, ResponseShape};
use crate::descriptor::ParamLocation;
use crate::envelope::groups;
use crate::generator::{OperationDoc, QueryParameter, RequestBodyDoc};
use crate::type_mapping::SCHEMA_REF_PREFIX;
use serde_json::{json, Map, Value};

/// Renders an operation object keyed as in an OpenAPI path item.
pub fn render_operation(doc: &OperationDoc) -> Value {
    let mut op = Map::new();
    op.insert("operationId".to_string(), json!(doc.operation_id));
    if !doc.summary.is_empty() {
        op.insert("summary".to_string(), json!(doc.summary));
    }
    if !doc.parameters.is_empty() {
        op.insert(
            "parameters".to_string(),
            Value::Array(doc.parameters.iter().map(build_parameter).collect()),
        );
    }
    if let Some(body) = &doc.request_body {
        op.insert("requestBody".to_string(), build_request_body(body));
    }

    let mut responses = Map::new();
    for (status, decl) in &doc.responses {
        responses.insert(status.to_string(), build_response(decl));
    }
    op.insert("responses".to_string(), Value::Object(responses));
    Value::Object(op)
}

/// Component name of `type_name` restricted to `groups`.
///
/// `UserView` with groups `["list", "admin"]` becomes `UserView.list.admin`.
pub fn component_name(type_name: &str, groups: &[String]) -> String {
    if groups.is_empty() {
        return type_name.to_string();
    }
    format!("{}.{}", type_name, groups.join("."))
}

/// `$ref` object pointing at the (possibly grouped) component.
pub fn schema_ref(type_name: &str, groups: &[String]) -> Value {
    json!({ "$ref": format!("{}{}", SCHEMA_REF_PREFIX, component_name(type_name, groups)) })
}

/// Standard reason phrase of an HTTP status code.
pub fn reason_phrase(status: u16) -> Option<&'static str> {
    let phrase = match status {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Content Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Content",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => return None,
    };
    Some(phrase)
}

/// The declared description, or `"<reason> Response for <code>"` when blank.
pub fn response_description(decl: &ResponseDeclaration) -> String {
    if !decl.description.trim().is_empty() {
        return decl.description.clone();
    }
    format!(
        "{} Response for {}",
        reason_phrase(decl.status).unwrap_or("Unknown"),
        decl.status
    )
}

fn build_response(decl: &ResponseDeclaration) -> Value {
    let mut resp = Map::new();
    resp.insert("description".to_string(), json!(response_description(decl)));
    if decl.shape == ResponseShape::Enveloped {
        resp.insert(
            "content".to_string(),
            json!({ "application/json": { "schema": envelope_schema(decl) } }),
        );
    }
    Value::Object(resp)
}

/// Envelope schema documenting `decl`'s payload and meta types.
pub fn envelope_schema(decl: &ResponseDeclaration) -> Value {
    let data = match &decl.payload {
        Some(payload) if decl.is_array => json!({
            "type": "array",
            "items": schema_ref(payload, &decl.groups),
        }),
        Some(payload) => schema_ref(payload, &decl.groups),
        None if decl.is_array => json!({ "type": "array", "items": {} }),
        None => json!({ "type": "object" }),
    };
    let meta = match &decl.meta {
        Some(meta) => schema_ref(meta, &response_groups(decl)),
        None => json!({ "type": "object" }),
    };
    let status_example = if decl.is_success() {
        "SUCCESS"
    } else {
        "ERROR"
    };

    let mut properties = Map::new();
    properties.insert("data".to_string(), data);
    properties.insert("meta".to_string(), meta);
    properties.insert(
        "status".to_string(),
        json!({ "type": "string", "examples": [status_example] }),
    );
    properties.insert("message".to_string(), json!({ "type": "string" }));

    json!({
        "type": "object",
        "properties": Value::Object(properties),
    })
}

/// Envelope groups a response is serialized with: `api_success` for 2xx,
/// `api_error` and `api_error_code` otherwise.
pub fn response_groups(decl: &ResponseDeclaration) -> Vec<String> {
    let names: &[&str] = if decl.is_success() {
        &[groups::API_SUCCESS]
    } else {
        &[groups::API_ERROR, groups::API_ERROR_CODE]
    };
    names.iter().map(|g| g.to_string()).collect()
}

fn build_parameter(param: &QueryParameter) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(param.name));
    obj.insert("in".to_string(), json!(param.location.as_str()));
    if let Some(desc) = &param.description {
        obj.insert("description".to_string(), json!(desc));
    }
    // Path parameters are always required in OpenAPI.
    let required = match param.location {
        ParamLocation::Path => true,
        _ => param.required.unwrap_or(false),
    };
    obj.insert("required".to_string(), json!(required));
    if param.deprecated == Some(true) {
        obj.insert("deprecated".to_string(), json!(true));
    }
    if let Some(allow) = param.allow_empty_value {
        obj.insert("allowEmptyValue".to_string(), json!(allow));
    }
    obj.insert("schema".to_string(), param.schema.clone());
    if let Some(example) = &param.example {
        obj.insert("example".to_string(), example.clone());
    }
    if let Some(style) = &param.style {
        obj.insert("style".to_string(), json!(style.as_str()));
    }
    if let Some(explode) = param.explode {
        obj.insert("explode".to_string(), json!(explode));
    }
    if let Some(allow) = param.allow_reserved {
        obj.insert("allowReserved".to_string(), json!(allow));
    }
    Value::Object(obj)
}

fn build_request_body(body: &RequestBodyDoc) -> Value {
    json!({
        "description": body.description,
        "required": body.required,
        "content": {
            "application/json": {
                "schema": schema_ref(&body.type_name, &body.groups),
            }
        }
    })
}
