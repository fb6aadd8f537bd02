//! Registration and password checks on top of [UserRepo]. Passwords only
//! ever reach the repo as salted argon2 hashes.
use crate::auth::password;
use thiserror::Error;
use tracing::info;
use tracker_repo::user_repo::{NewUser, UserRepo, UserRepoError};
use tracker_repo::UserId;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User not found")]
    NotFound,
    #[error("Incorrect password")]
    InvalidCredentials,
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),
    #[error("Unable to hash password: {0}")]
    Hashing(#[from] argon2::Error),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<UserRepoError> for CredentialError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::UserNotFound(_) => CredentialError::NotFound,
            UserRepoError::EmailAlreadyExists(email) => CredentialError::DuplicateEmail(email),
            UserRepoError::Other(e) => CredentialError::Other(e),
        }
    }
}

pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    user_repo: &dyn UserRepo,
    registration: Registration,
) -> Result<UserId, CredentialError> {
    let password_hash = password::encode_password(&registration.password)?;
    let user_id = user_repo
        .create_user(NewUser::new(
            registration.first_name,
            registration.last_name,
            registration.email.trim().to_owned(),
            password_hash,
        ))
        .await?;
    info!(user_id, "Registered user");
    Ok(user_id)
}

pub async fn authenticate(
    user_repo: &dyn UserRepo,
    email: &str,
    password: &str,
) -> Result<UserId, CredentialError> {
    let user = user_repo.get_user_by_email(email.trim()).await?;
    if password::verify_password(password, &user.password_hash)? {
        Ok(user.id)
    } else {
        Err(CredentialError::InvalidCredentials)
    }
}

pub async fn change_password(
    user_repo: &dyn UserRepo,
    user_id: UserId,
    current_password: &str,
    new_password: &str,
) -> Result<(), CredentialError> {
    let user = user_repo.get_user(user_id).await?;
    if !password::verify_password(current_password, &user.password_hash)? {
        return Err(CredentialError::InvalidCredentials);
    }

    let password_hash = password::encode_password(new_password)?;
    user_repo
        .update_password_hash(user_id, &password_hash)
        .await?;
    Ok(())
}
