use crate::UserId;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError>;
    /// Stores a new user and returns the id assigned to it.
    async fn create_user(&self, new_user: NewUser) -> Result<UserId, UserRepoError>;
    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserRepoError>;
    async fn update_profile(&self, user_id: UserId, profile: Profile)
        -> Result<(), UserRepoError>;
    /// Removes the user along with every budget and transaction they own.
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError>;
}

#[derive(Clone, PartialEq, Debug)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
}

impl User {
    pub fn from_new_user(id: UserId, new_user: NewUser) -> User {
        User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            profile: Profile::default(),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(first_name: String, last_name: String, email: String, password_hash: String) -> Self {
        NewUser {
            first_name,
            last_name,
            email,
            password_hash,
        }
    }
}

/// The optional fields a user fills in after signing up.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Debug)]
pub struct Profile {
    pub age: Option<i32>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("A user with email {0} already exists")]
    EmailAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
