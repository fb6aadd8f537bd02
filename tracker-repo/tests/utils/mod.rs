pub mod generator;
pub mod test_user;

use std::env;
use tracker_repo::Repos;
use tracing::warn;

const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

/// Builds the repos for `repo_type`. PostgreSQL repos need `TEST_DATABASE_URL`;
/// without it `None` is returned and the caller skips the test.
pub async fn build_repos(repo_type: RepoType) -> Option<Repos> {
    match repo_type {
        RepoType::SQLx => {
            let Ok(database_url) = env::var(TEST_DATABASE_URL) else {
                let _ = tracing_subscriber::fmt().with_test_writer().try_init();
                warn!("{} not set, skipping PostgreSQL test", TEST_DATABASE_URL);
                return None;
            };
            Some(
                tracker_repo::sqlx_repo::create_repos(&database_url, 1)
                    .await
                    .unwrap(),
            )
        }
        RepoType::Mem => Some(tracker_repo::mem_repo::create_repos()),
    }
}
