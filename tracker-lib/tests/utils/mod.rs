#![allow(dead_code)]

use std::sync::Arc;

use rstest::*;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

use tracker_lib::auth::credentials::{self, Registration};
use tracker_repo::user_repo::UserRepo;
use tracker_repo::{Repos, UserId};

pub mod mock;

pub const TEST_PASSWORD: &str = "pass";

/// App with every protected scope wrapped in [mock::MockAuthentication] for `$user_id`.
macro_rules! build_app {
    ($repos:ident, $user_id:expr) => {{
        let user_id: tracker_repo::UserId = $user_id;
        let app = App::new()
            .app_data(Data::new($repos.users.clone()))
            .app_data(Data::new($repos.budgets.clone()))
            .app_data(Data::new($repos.transactions.clone()))
            .app_data(tracker_lib::json_config())
            .wrap(tracker_lib::tracing::create_middleware())
            .service(tracker_lib::budget::budget_service().wrap(MockAuthentication { user_id }))
            .service(
                tracker_lib::transaction::transaction_service()
                    .wrap(MockAuthentication { user_id }),
            )
            .service(tracker_lib::user::user_service().wrap(MockAuthentication { user_id }));
        tracing::info!("Built app");
        app
    }};
}

/// Sends `$body` as JSON and asserts a successful response.
macro_rules! post_json {
    (&$service:ident, $uri:expr, $body:expr) => {{
        let request = TestRequest::post()
            .uri($uri)
            .set_json(&$body)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response for POST {}",
            response.status(),
            $uri
        );
        test::read_body(response).await
    }};
}

macro_rules! get_balance {
    (&$service:ident, $user_id:expr) => {{
        let request = TestRequest::get()
            .uri(&format!("/budget/{}", $user_id))
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert!(response.status().is_success());
        let balance: tracker_repo::budget_repo::Balance = test::read_body_json(response).await;
        balance
    }};
}

pub struct TestUser {
    pub user_id: UserId,
    pub email: String,
    repo: Arc<dyn UserRepo>,
}

impl TestUser {
    pub async fn new(user_repo: Arc<dyn UserRepo>) -> TestUser {
        let email = format!("test-user-{}@example.com", Uuid::new_v4());
        let user_id = credentials::register(
            user_repo.as_ref(),
            Registration {
                first_name: "Test".to_owned(),
                last_name: "User".to_owned(),
                email: email.clone(),
                password: TEST_PASSWORD.to_owned(),
            },
        )
        .await
        .unwrap();
        info!(%user_id, "Created user");
        TestUser {
            user_id,
            email,
            repo: user_repo,
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.user_id).await.unwrap()
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> Repos {
    tracker_repo::mem_repo::create_repos()
}
