use crate::auth::authorize;
use crate::auth::credentials::{self, CredentialError};
use crate::error::HandlerError;
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_repo::user_repo::{Profile, User, UserRepo};
use tracker_repo::UserId;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            age: user.profile.age,
            address: user.profile.address,
            birthday: user.profile.birthday,
            gender: user.profile.gender,
        }
    }
}

/// Profile form as the client submits it. Blank fields clear the stored value.
#[derive(Deserialize, Debug, PartialEq)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
}

impl From<UpdateProfileRequest> for Profile {
    fn from(request: UpdateProfileRequest) -> Self {
        Profile {
            age: request.age,
            address: request.address,
            birthday: request.birthday,
            gender: request.gender,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i32),
    Text(String),
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(age)) => Ok(Some(age)),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(de::Error::custom)
            }
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty()))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = blank_as_none(deserializer)? else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&text)
        .map(|datetime| Some(datetime.date_naive()))
        .map_err(|_| de::Error::custom(format!("invalid date: {}", text)))
}

#[get("/{user_id}")]
pub async fn get_profile(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    let user = user_repo.get_user(user_id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}

#[put("/update/{user_id}")]
pub async fn update_profile(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    user_repo
        .update_profile(user_id, request.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().body("Profile updated successfully"))
}

#[put("/change-password/{user_id}")]
pub async fn change_password(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
    request: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    let result = credentials::change_password(
        user_repo.get_ref().as_ref(),
        user_id,
        &request.current_password,
        &request.new_password,
    )
    .await;
    match result {
        Ok(()) => Ok(HttpResponse::Ok().body("Password updated successfully")),
        Err(CredentialError::InvalidCredentials) => {
            Err(HandlerError::Unauthorized("Incorrect current password"))
        }
        Err(e) => Err(e.into()),
    }
}

#[delete("/{user_id}")]
pub async fn delete_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    user_repo.delete_user(user_id).await?;
    Ok(HttpResponse::Ok().body("User deleted"))
}
