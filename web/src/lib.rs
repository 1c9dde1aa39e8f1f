#![deny(missing_docs)]

//! # Restdoc Web Library
//!
//! actix-web integration for the response envelope: controller helpers, the
//! demo user resource, and the handler serving the generated OpenAPI document.

use actix_web::{get, web, HttpResponse, Responder};

/// Server configuration from the environment.
pub mod config;

/// Controller helpers turning envelopes into HTTP responses.
pub mod controller;

/// Demo user resource.
pub mod users;

/// OpenAPI document of the demo service.
pub mod openapi;

/// A simple health check handler.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Registers every route of the service and the extractor error handlers.
///
/// The caller provides `web::Data<UserStore>` and `web::Data<GeneratorConfig>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(controller::query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(controller::json_error_handler))
        .service(health_check)
        .service(openapi::openapi_json)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::delete_user);
}
