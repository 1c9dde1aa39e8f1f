#![deny(missing_docs)]

//! # Response Builder
//!
//! Wraps live payloads into the [`Envelope`] and picks the serialization view:
//! success envelopes render under `api_success` plus caller groups, error
//! envelopes under `api_error` (and `api_error_code` when a code is given).
//!
//! Described payloads are also pruned to the fields in the caller groups, the
//! same fields their documented `Type.group` component lists.

use crate::descriptor::{DescribeType, DescriptorRegistry, TypeDescriptor, TypeDescriptorProvider};
use crate::envelope::{groups, Envelope, ErrorCode, ErrorCodeSource, SerializationView};
use crate::error::AppResult;
use crate::pagination::{PageResult, PaginationMeta};
use crate::type_mapping::{DefaultTypeMapper, FieldType, TypeMapper};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Default status of success responses.
pub const HTTP_OK: u16 = 200;
/// Status of not-found responses.
pub const HTTP_NOT_FOUND: u16 = 404;
/// Status of validation failures.
pub const HTTP_UNPROCESSABLE_ENTITY: u16 = 422;

/// An envelope together with its view and transport status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    envelope: Envelope,
    view: SerializationView,
    status_code: u16,
}

impl ApiResponse {
    /// The wrapped envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The serialization view the body is rendered under.
    pub fn view(&self) -> &SerializationView {
        &self.view
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The envelope rendered through the view.
    pub fn body(&self) -> Value {
        self.envelope.render(&self.view)
    }

    /// `body()` serialized to a JSON string.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(&self.body())?)
    }
}

/// Success envelope around `data`. `meta` defaults to an empty object.
pub fn build_success<T: Serialize + ?Sized>(
    data: &T,
    extra_groups: &[&str],
    meta: Option<Value>,
    status_code: u16,
) -> AppResult<ApiResponse> {
    let data = serde_json::to_value(data)?;
    let meta = meta.unwrap_or_else(|| json!({}));
    let mut view = SerializationView::new([groups::API_SUCCESS]);
    view.extend(extra_groups.iter().copied());
    Ok(ApiResponse {
        envelope: Envelope::success(data, meta),
        view,
        status_code,
    })
}

/// Like [`build_success`], with `data` pruned to the fields of `T` in
/// `extra_groups`. Without caller groups every field is kept.
pub fn build_described_success<T: Serialize + DescribeType>(
    data: &T,
    extra_groups: &[&str],
    meta: Option<Value>,
    status_code: u16,
) -> AppResult<ApiResponse> {
    let data = described_value::<T, _>(data, extra_groups)?;
    build_success(&data, extra_groups, meta, status_code)
}

/// Error envelope. The error-code view is added only when `code` is given.
pub fn build_error(
    message: impl Into<String>,
    errors: Vec<Value>,
    status_code: u16,
    code: Option<&str>,
) -> ApiResponse {
    let mut envelope = Envelope::error(message, errors);
    let mut view = SerializationView::new([groups::API_ERROR]);
    if let Some(code) = code {
        envelope = envelope.with_code(code);
        view.extend([groups::API_ERROR_CODE]);
    }
    ApiResponse {
        envelope,
        view,
        status_code,
    }
}

/// Success envelope for a page, with [`PaginationMeta`] as `meta`.
pub fn build_paginated<P>(page: &P, extra_groups: &[&str]) -> AppResult<ApiResponse>
where
    P: PageResult + ?Sized,
    P::Item: Serialize,
{
    let meta = serde_json::to_value(PaginationMeta::from_page(page))?;
    build_success(page.items(), extra_groups, Some(meta), HTTP_OK)
}

/// Like [`build_paginated`], with every item pruned to the fields in
/// `extra_groups`.
pub fn build_described_paginated<P>(page: &P, extra_groups: &[&str]) -> AppResult<ApiResponse>
where
    P: PageResult + ?Sized,
    P::Item: Serialize + DescribeType,
{
    let meta = serde_json::to_value(PaginationMeta::from_page(page))?;
    let data = described_value::<P::Item, _>(page.items(), extra_groups)?;
    build_success(&data, extra_groups, Some(meta), HTTP_OK)
}

fn described_value<T: DescribeType, V: Serialize + ?Sized>(
    data: &V,
    extra_groups: &[&str],
) -> AppResult<Value> {
    let value = serde_json::to_value(data)?;
    let groups: Vec<String> = extra_groups.iter().map(|g| g.to_string()).collect();
    let registry = DescriptorRegistry::new().with::<T>();
    Ok(filter_by_groups(value, &T::describe(), &groups, &registry))
}

/// Keeps the keys of `value` that `descriptor` declares in any of `groups`,
/// descending into arrays and into fields referencing types `provider`
/// knows. Empty `groups` keep everything.
pub fn filter_by_groups<P: TypeDescriptorProvider>(
    value: Value,
    descriptor: &TypeDescriptor,
    groups: &[String],
    provider: &P,
) -> Value {
    if groups.is_empty() {
        return value;
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| filter_by_groups(item, descriptor, groups, provider))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                let Some(field) = descriptor.fields.iter().find(|f| f.name == key) else {
                    continue;
                };
                if !field.in_any_group(groups) {
                    continue;
                }
                let nested = field
                    .ty
                    .as_ref()
                    .and_then(|kind| referenced_type(&DefaultTypeMapper.map(kind)))
                    .and_then(|name| provider.describe_fields(&name));
                let val = match nested {
                    Some(nested) => filter_by_groups(val, nested, groups, provider),
                    None => val,
                };
                out.insert(key, val);
            }
            Value::Object(out)
        }
        other => other,
    }
}

fn referenced_type(field_type: &FieldType) -> Option<String> {
    if !field_type.is_builtin {
        return Some(field_type.name.clone());
    }
    field_type.items.as_deref().and_then(referenced_type)
}

/// 404 error envelope with the `NOT_FOUND` code as message and sole error.
pub fn build_not_found() -> ApiResponse {
    let code = ErrorCode::NotFound.error_code();
    build_error(code, vec![json!(code)], HTTP_NOT_FOUND, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, TypeKind};
    use crate::envelope::{ApiResponseStatus, ValidationError};
    use crate::pagination::{Page, PerPage};
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: &'static str,
    }

    #[derive(Serialize)]
    struct Account {
        id: u32,
        email: &'static str,
        owner: Owner,
        tags: Vec<Owner>,
    }

    #[derive(Serialize)]
    struct Owner {
        name: &'static str,
        secret: &'static str,
    }

    impl DescribeType for Owner {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new("Owner")
                .field(FieldDescriptor::new("name", TypeKind::builtin("String")).in_groups(["list"]))
                .field(FieldDescriptor::new("secret", TypeKind::builtin("String")))
        }
    }

    impl DescribeType for Account {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new("Account")
                .field(FieldDescriptor::new("id", TypeKind::builtin("u32")).in_groups(["list"]))
                .field(
                    FieldDescriptor::new("email", TypeKind::builtin("String"))
                        .in_groups(["detail"]),
                )
                .field(
                    FieldDescriptor::new("owner", TypeKind::reference("Owner"))
                        .in_groups(["list", "detail"]),
                )
                .field(
                    FieldDescriptor::new("tags", TypeKind::array_of(TypeKind::reference("Owner")))
                        .in_groups(["list"]),
                )
        }

        fn register_nested(registry: &mut DescriptorRegistry) {
            registry.register::<Owner>();
        }
    }

    fn account(id: u32) -> Account {
        Account {
            id,
            email: "ada@example.com",
            owner: Owner {
                name: "Ada",
                secret: "s3cret",
            },
            tags: vec![Owner {
                name: "admin",
                secret: "x",
            }],
        }
    }

    #[test]
    fn test_success_body() {
        let resp = build_success(&User { id: 1, name: "Ada" }, &["detail"], None, 201).unwrap();
        assert_eq!(resp.status_code(), 201);
        assert!(resp.view().contains("detail"));
        assert_eq!(
            resp.body(),
            json!({
                "data": { "id": 1, "name": "Ada" },
                "meta": {},
                "status": "SUCCESS"
            })
        );
    }

    #[test]
    fn test_error_without_code() {
        let resp = build_error("Validation failed", vec![], 422, None);
        assert_eq!(resp.envelope().status(), ApiResponseStatus::Error);
        assert!(!resp.view().contains(groups::API_ERROR_CODE));
        assert_eq!(
            resp.body(),
            json!({ "errors": [], "status": "ERROR", "message": "Validation failed" })
        );
    }

    #[test]
    fn test_error_with_code() {
        let errors = vec![serde_json::to_value(ValidationError::new(
            "email",
            json!("nope"),
            vec!["This value is not a valid email address.".to_string()],
        ))
        .unwrap()];
        let resp = build_error("Invalid", errors, 422, Some("INVALID_EMAIL"));
        assert!(resp.view().contains(groups::API_ERROR_CODE));
        let body = resp.body();
        assert_eq!(body["code"], json!("INVALID_EMAIL"));
        assert_eq!(body["errors"][0]["propertyPath"], json!("email"));
        assert!(body.get("data").is_none());
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn test_paginated() {
        let page = Page::from_all((1..=25).collect::<Vec<u32>>(), 2, PerPage::Limited(10));
        let resp = build_paginated(&page, &[]).unwrap();
        let body = resp.body();
        assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
        assert_eq!(body["meta"]["from"], json!(11));
        assert_eq!(body["meta"]["to"], json!(20));
        assert_eq!(body["meta"]["hasMore"], json!(true));
    }

    #[test]
    fn test_caller_groups_prune_payload() {
        let resp = build_described_success(&account(1), &["list"], None, HTTP_OK).unwrap();
        assert!(resp.view().contains("list"));
        assert_eq!(
            resp.body()["data"],
            json!({
                "id": 1,
                "owner": { "name": "Ada" },
                "tags": [{ "name": "admin" }]
            })
        );
    }

    #[test]
    fn test_no_caller_groups_keep_payload() {
        let resp = build_described_success(&account(1), &[], None, HTTP_OK).unwrap();
        let data = &resp.body()["data"];
        assert_eq!(data["email"], json!("ada@example.com"));
        assert_eq!(data["owner"]["secret"], json!("s3cret"));
    }

    #[test]
    fn test_paginated_items_pruned() {
        let page = Page::from_all(vec![account(1), account(2)], 1, PerPage::Limited(10));
        let body = build_described_paginated(&page, &["detail"]).unwrap().body();
        assert_eq!(
            body["data"],
            json!([
                { "email": "ada@example.com", "owner": {} },
                { "email": "ada@example.com", "owner": {} }
            ])
        );
        assert_eq!(body["meta"]["total"], json!(2));
    }

    #[test]
    fn test_paginated_huge_page_number() {
        let page = Page::new(vec![1_u32], u64::MAX, PerPage::Limited(2), 5);
        let body = build_paginated(&page, &[]).unwrap().body();
        assert_eq!(body["meta"]["from"], json!(u64::MAX));
        assert_eq!(body["meta"]["to"], json!(u64::MAX));
        assert_eq!(body["meta"]["hasMore"], json!(false));
    }

    #[test]
    fn test_not_found() {
        let resp = build_not_found();
        assert_eq!(resp.status_code(), 404);
        assert_eq!(
            resp.body(),
            json!({ "errors": ["NOT_FOUND"], "status": "ERROR", "message": "NOT_FOUND" })
        );
    }

    #[test]
    fn test_to_json_string() {
        let resp = build_success(&[1, 2], &[], Some(json!({"total": 2})), HTTP_OK).unwrap();
        let text = resp.to_json().unwrap();
        assert!(text.contains("\"total\":2"));
    }
}
