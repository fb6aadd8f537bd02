use crate::sqlx_repo::{is_unique_violation, SQLxRepo};
use crate::user_repo::{NewUser, Profile, User, UserRepo, UserRepoError};
use crate::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, age, address, birthday, gender";

#[derive(sqlx::FromRow)]
struct UserEntry {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    age: Option<i32>,
    address: Option<String>,
    birthday: Option<NaiveDate>,
    gender: Option<String>,
}

impl From<UserEntry> for User {
    fn from(value: UserEntry) -> Self {
        User {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password_hash: value.password_hash,
            profile: Profile {
                age: value.age,
                address: value.address,
                birthday: value.birthday,
                gender: value.gender,
            },
        }
    }
}

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let user: Option<UserEntry> =
            query_as::<_, UserEntry>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get user {}", user_id))?;
        user.map(User::from)
            .ok_or_else(|| UserRepoError::UserNotFound(user_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let user: Option<UserEntry> = query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", email))?;
        user.map(User::from)
            .ok_or_else(|| UserRepoError::UserNotFound(email.to_owned()))
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<UserId, UserRepoError> {
        let result = query_scalar::<_, UserId>(
            "INSERT INTO users(first_name, last_name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            Err(e) if is_unique_violation(&e) => {
                Err(UserRepoError::EmailAlreadyExists(new_user.email))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Unable to create user {}", new_user.email))
                .into()),
        }
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let result = query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to update password for {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_string()))
        }
    }

    #[instrument(skip(self))]
    async fn update_profile(
        &self,
        user_id: UserId,
        profile: Profile,
    ) -> Result<(), UserRepoError> {
        let result = query(
            "UPDATE users SET age = $1, address = $2, birthday = $3, gender = $4 WHERE id = $5",
        )
        .bind(profile.age)
        .bind(profile.address)
        .bind(profile.birthday)
        .bind(profile.gender)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update profile for {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_string()))
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_string()))
        }
    }
}
