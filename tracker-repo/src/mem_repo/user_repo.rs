use crate::mem_repo::MemRepo;
use crate::user_repo::UserRepoError::{EmailAlreadyExists, UserNotFound};
use crate::user_repo::{NewUser, Profile, User, UserRepo, UserRepoError};
use crate::UserId;
use async_trait::async_trait;

#[async_trait]
impl UserRepo for MemRepo {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| UserNotFound(user_id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        let email = email.to_lowercase();
        read_guard
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned()
            .ok_or_else(|| UserNotFound(email))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserId, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        let email = new_user.email.to_lowercase();
        if write_guard
            .users
            .values()
            .any(|u| u.email.to_lowercase() == email)
        {
            return Err(EmailAlreadyExists(new_user.email));
        }

        let id = write_guard.next_user_id;
        write_guard.next_user_id += 1;
        write_guard
            .users
            .insert(id, User::from_new_user(id, new_user));

        Ok(id)
    }

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        let user = write_guard
            .users
            .get_mut(&user_id)
            .ok_or_else(|| UserNotFound(user_id.to_string()))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        profile: Profile,
    ) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        let user = write_guard
            .users
            .get_mut(&user_id)
            .ok_or_else(|| UserNotFound(user_id.to_string()))?;
        user.profile = profile;
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.users.remove(&user_id).is_none() {
            return Err(UserNotFound(user_id.to_string()));
        }
        write_guard.budgets.retain(|_, b| b.user_id != user_id);
        write_guard.transactions.retain(|_, t| t.user_id != user_id);
        Ok(())
    }
}
