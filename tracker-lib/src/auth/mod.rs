use crate::error::HandlerError;
use actix_web::dev::ServiceRequest;
use actix_web::web::{self, ServiceConfig};
use actix_web::{Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use actix_web_httpauth::extractors::{bearer, AuthenticationError};
use actix_web_httpauth::headers::www_authenticate::bearer::Bearer;
use jwt::JWTAuth;
use tracing::error;
use tracing_actix_web::RootSpan;
use tracker_repo::UserId;

pub mod credentials;
mod handlers;
pub mod jwt;
pub mod password;

/// Validates credentials using [JWTAuth]. If valid, injects the user id into request and into the
/// [RootSpan]
pub async fn credentials_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(jwt_auth) = req.app_data::<web::Data<JWTAuth>>() else {
        error!("JWTAuth missing from app data");
        return Err((
            actix_web::error::ErrorInternalServerError("Server error"),
            req,
        ));
    };

    if let Ok(user_id) = jwt_auth.validate_token(credentials.token()) {
        if let Some(root_span) = req.extensions().get::<RootSpan>() {
            root_span.record("user_id", &user_id);
        }
        req.extensions_mut().insert::<UserId>(user_id);
        Ok(req)
    } else {
        let challenge = Bearer::build().error(bearer::Error::InvalidToken).finish();
        Err((AuthenticationError::new(challenge).into(), req))
    }
}

/// Rejects requests where the id in the path or body is not the authenticated user.
pub fn authorize(authenticated: &UserId, requested: UserId) -> Result<(), HandlerError> {
    if *authenticated == requested {
        Ok(())
    } else {
        Err(HandlerError::Forbidden(requested))
    }
}

/// Registers `/signup` and `/login`. These routes sit outside the bearer middleware.
pub fn auth_routes(cfg: &mut ServiceConfig, signups_enabled: bool) {
    if signups_enabled {
        cfg.service(handlers::signup);
    } else {
        cfg.service(handlers::signups_disabled);
    }
    cfg.service(handlers::login);
}
