use crate::auth::credentials::{self, CredentialError, Registration};
use crate::auth::jwt::JWTAuth;
use crate::error::HandlerError;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_repo::user_repo::UserRepo;
use tracker_repo::UserId;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: UserId,
    pub token: String,
}

#[post("/signup")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    request: web::Json<SignupRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    credentials::register(
        user_repo.get_ref().as_ref(),
        Registration {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().body("User registered successfully!"))
}

#[post("/signup")]
pub async fn signups_disabled() -> Result<HttpResponse, HandlerError> {
    Err(HandlerError::SignupsDisabled)
}

#[post("/login")]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    jwt_auth: web::Data<JWTAuth>,
    request: web::Json<LoginRequest>,
) -> Result<impl Responder, HandlerError> {
    let user_repo = user_repo.get_ref().as_ref();
    let user_id = match credentials::authenticate(user_repo, &request.email, &request.password).await
    {
        Ok(user_id) => user_id,
        Err(CredentialError::NotFound) => {
            return Err(HandlerError::Unauthorized("User not found."));
        }
        Err(CredentialError::InvalidCredentials) => {
            return Err(HandlerError::Unauthorized("Incorrect password."));
        }
        Err(e) => return Err(e.into()),
    };

    let token = jwt_auth.create_token(user_id)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful!",
        user_id,
        token,
    }))
}
