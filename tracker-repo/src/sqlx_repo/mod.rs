mod budget_repo;
mod transaction_repo;
mod user_repo;

use crate::{HealthCheck, Repos};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, Pool, Postgres};
use std::sync::Arc;
use tracing::info;

pub struct SQLxRepo {
    pool: Pool<Postgres>,
}

impl SQLxRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxRepo {
        SQLxRepo { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), anyhow::Error> {
        info!("Running migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Unable to run migrations")
    }
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

pub async fn create_repos(
    database_url: &str,
    max_pool_size: u32,
) -> Result<Repos, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;

    let repo = Arc::new(SQLxRepo::new(pool));
    repo.run_migrations().await?;

    Ok(Repos {
        users: repo.clone(),
        budgets: repo.clone(),
        transactions: repo.clone(),
        health: repo,
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// `numeric_value_out_of_range`, raised when a result does not fit its column.
fn is_numeric_overflow(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("22003"))
}
