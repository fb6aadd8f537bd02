#[macro_use]
extern crate actix_web;

pub mod auth;
pub mod budget;
pub mod config;
mod error;
mod health;
pub mod tracing;
pub mod transaction;
pub mod user;

use crate::auth::jwt::JWTAuth;
use ::tracing::error;
use actix_web::error::JsonPayloadError;
use actix_web::web::{self, Data, ServiceConfig};
use actix_web::HttpResponse;
use actix_web_httpauth::middleware::HttpAuthentication;
use tracker_repo::Repos;

pub use error::HandlerError;

/// Registers shared state and every route. Budget, transaction and user routes
/// require a bearer token.
pub fn app_config_func(
    jwt_auth: JWTAuth,
    repos: Repos,
    signups_enabled: bool,
) -> impl Fn(&mut ServiceConfig) + Clone {
    move |cfg: &mut ServiceConfig| {
        let bearer_auth_middleware = HttpAuthentication::bearer(auth::credentials_validator);
        cfg.app_data(Data::new(jwt_auth.clone()))
            .app_data(Data::new(repos.users.clone()))
            .app_data(Data::new(repos.budgets.clone()))
            .app_data(Data::new(repos.transactions.clone()))
            .app_data(Data::new(repos.health.clone()))
            .app_data(json_config())
            .service(health::health)
            .service(budget::budget_service().wrap(bearer_auth_middleware.clone()))
            .service(transaction::transaction_service().wrap(bearer_auth_middleware.clone()))
            .service(user::user_service().wrap(bearer_auth_middleware));
        auth::auth_routes(cfg, signups_enabled);
    }
}

/// Answers malformed JSON bodies with a 400 describing the parse error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}
