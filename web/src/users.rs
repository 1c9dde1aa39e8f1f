//! # Users
//!
//! In-memory user resource exercising every controller helper.

use crate::controller::{
    no_content_response, not_found_response, paginate_response, success_response,
    success_response_with_status, validation_failed_response, JsonEnvelope,
};
use actix_web::{delete, get, post, web, Either, HttpResponse};
use chrono::{DateTime, Utc};
use restdoc_core::{
    DescribeType, FieldDescriptor, Page, ParameterDescriptor, PerPage, TypeDescriptor, TypeKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{PoisonError, RwLock};
use tracing::info;
use uuid::Uuid;

/// Page size when the query string has none.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Group of the fields shown in user lists.
pub const LIST_GROUP: &str = "list";

/// Group of the fields shown for a single user.
pub const DETAIL_GROUP: &str = "detail";

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl DescribeType for UserView {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("UserView")
            .with_description("A registered user")
            .field(
                FieldDescriptor::new("id", TypeKind::builtin("Uuid"))
                    .in_groups([LIST_GROUP, DETAIL_GROUP]),
            )
            .field(
                FieldDescriptor::new("email", TypeKind::builtin("String"))
                    .in_groups([DETAIL_GROUP]),
            )
            .field(
                FieldDescriptor::new("name", TypeKind::builtin("String"))
                    .in_groups([LIST_GROUP, DETAIL_GROUP]),
            )
            .field(
                FieldDescriptor::new("createdAt", TypeKind::builtin("DateTime"))
                    .in_groups([DETAIL_GROUP]),
            )
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserPayload {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl CreateUserPayload {
    /// Checks the payload, one entry per invalid property.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !self.email.contains('@') {
            errors.push(ValidationError::new(
                "email",
                json!(self.email),
                vec!["This value is not a valid email address.".to_string()],
            ));
        }
        if self.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "name",
                json!(self.name),
                vec!["This value should not be blank.".to_string()],
            ));
        }
        errors
    }
}

impl DescribeType for CreateUserPayload {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("CreateUserPayload")
            .field(FieldDescriptor::new("email", TypeKind::builtin("String")))
            .field(FieldDescriptor::new("name", TypeKind::builtin("String")))
    }
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    /// One-based page number.
    pub page: Option<u64>,
    /// Page size, `-1` for everything.
    pub per_page: Option<PerPage>,
}

impl DescribeType for ListUsersQuery {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("ListUsersQuery")
            .field(
                FieldDescriptor::new("page", TypeKind::builtin("u64"))
                    .with_description("One-based page number"),
            )
            .field(
                FieldDescriptor::new("perPage", TypeKind::builtin("i64")).with_parameter(
                    ParameterDescriptor::new()
                        .with_description("Page size, -1 for everything")
                        .with_example(json!(DEFAULT_PER_PAGE)),
                ),
            )
    }
}

/// Shared user storage.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<UserView>>,
}

impl UserStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new user.
    pub fn insert(&self, user: UserView) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user);
    }

    /// Looks a user up.
    pub fn get(&self, id: Uuid) -> Option<UserView> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Removes a user, returning whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let before = users.len();
        users.retain(|user| user.id != id);
        users.len() != before
    }

    /// Snapshot of all users in insertion order.
    pub fn all(&self) -> Vec<UserView> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Lists users page by page.
#[get("/users")]
pub async fn list_users(
    store: web::Data<UserStore>,
    query: web::Query<ListUsersQuery>,
) -> actix_web::Result<JsonEnvelope> {
    let page = Page::from_all(
        store.all(),
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(PerPage::Limited(DEFAULT_PER_PAGE)),
    );
    paginate_response(&page, &[LIST_GROUP])
}

/// Fetches one user; unknown ids fail with actix' not-found error.
#[get("/users/{id}")]
pub async fn get_user(
    store: web::Data<UserStore>,
    id: web::Path<Uuid>,
) -> actix_web::Result<JsonEnvelope> {
    match store.get(*id) {
        Some(user) => success_response(&user, &[DETAIL_GROUP]),
        None => not_found_response(true),
    }
}

/// Registers a user.
#[post("/users")]
pub async fn create_user(
    store: web::Data<UserStore>,
    payload: web::Json<CreateUserPayload>,
) -> actix_web::Result<JsonEnvelope> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return validation_failed_response(&errors);
    }
    let payload = payload.into_inner();
    let user = UserView {
        id: Uuid::new_v4(),
        email: payload.email,
        name: payload.name,
        created_at: Utc::now(),
    };
    info!(user_id = %user.id, "user created");
    store.insert(user.clone());
    success_response_with_status(&user, &[DETAIL_GROUP], 201)
}

/// Deletes a user; unknown ids answer with a 404 envelope.
#[delete("/users/{id}")]
pub async fn delete_user(
    store: web::Data<UserStore>,
    id: web::Path<Uuid>,
) -> actix_web::Result<Either<HttpResponse, JsonEnvelope>> {
    if store.remove(*id) {
        info!(user_id = %id, "user deleted");
        return Ok(Either::Left(no_content_response()));
    }
    not_found_response(false).map(Either::Right)
}
