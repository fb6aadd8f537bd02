use std::sync::Arc;
use tracing::info;
use tracker_repo::user_repo::{NewUser, UserRepo};
use tracker_repo::UserId;
use uuid::Uuid;

#[allow(dead_code)]
pub fn unique_email() -> String {
    format!("test-user-{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn new_user(email: String) -> NewUser {
    NewUser::new(
        "Test".to_owned(),
        "User".to_owned(),
        email,
        "not a real hash".to_owned(),
    )
}

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let email = unique_email();
        let id = user_repo.create_user(new_user(email.clone())).await.unwrap();
        info!(%id, %email, "Created user");
        TestUser {
            id,
            email,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.id).await.unwrap()
    }
}
