use crate::budget_repo::{check_amount, Budget, BudgetRepo, BudgetRepoError};
use crate::sqlx_repo::{is_foreign_key_violation, is_numeric_overflow, SQLxRepo};
use crate::UserId;
use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{query_as, Executor, Postgres};
use tracing::instrument;

#[derive(sqlx::FromRow)]
pub(super) struct BudgetEntry {
    id: i32,
    user_id: i32,
    total: Decimal,
    available: Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<BudgetEntry> for Budget {
    fn from(value: BudgetEntry) -> Self {
        Budget {
            id: value.id,
            user_id: value.user_id,
            total: value.total,
            available: value.available,
            created_at: value.created_at,
        }
    }
}

impl SQLxRepo {
    /// Adds `delta` to the available amount of the user's newest budget row.
    /// Returns `None` when the user has no budget.
    #[instrument(skip(db_executor))]
    pub(super) async fn adjust_available<'e, E>(
        db_executor: E,
        user_id: UserId,
        delta: Decimal,
    ) -> Result<Option<BudgetEntry>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        query_as::<_, BudgetEntry>(
            "UPDATE budgets SET available = available + $1 WHERE id = (SELECT MAX(id) FROM budgets WHERE user_id = $2) RETURNING id, user_id, total, available, created_at",
        )
        .bind(delta)
        .bind(user_id)
        .fetch_optional(db_executor)
        .await
    }

    async fn adjust_budget(
        &self,
        user_id: UserId,
        delta: Decimal,
    ) -> Result<Budget, BudgetRepoError> {
        match Self::adjust_available(&self.pool, user_id, delta).await {
            Ok(Some(budget_entry)) => Ok(budget_entry.into()),
            Ok(None) => Err(BudgetRepoError::NoBudget(user_id)),
            Err(e) if is_numeric_overflow(&e) => Err(BudgetRepoError::OutOfRange(user_id)),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Unable to adjust budget of user {}", user_id))
                .into()),
        }
    }
}

#[async_trait]
impl BudgetRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn set_budget(
        &self,
        user_id: UserId,
        amount: Decimal,
    ) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        let result = query_as::<_, BudgetEntry>(
            "INSERT INTO budgets(user_id, total, available) VALUES ($1, $2, $2) RETURNING id, user_id, total, available, created_at",
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(budget_entry) => Ok(budget_entry.into()),
            Err(e) if is_foreign_key_violation(&e) => Err(BudgetRepoError::UserNotFound(user_id)),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Unable to set budget for user {}", user_id))
                .into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_current_budget(
        &self,
        user_id: UserId,
    ) -> Result<Option<Budget>, BudgetRepoError> {
        let budget_entry = query_as::<_, BudgetEntry>(
            "SELECT id, user_id, total, available, created_at FROM budgets WHERE user_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get budget for user {}", user_id))?;
        Ok(budget_entry.map(Budget::from))
    }

    #[instrument(skip(self))]
    async fn deduct(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        self.adjust_budget(user_id, -amount).await
    }

    #[instrument(skip(self))]
    async fn restore(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        self.adjust_budget(user_id, amount).await
    }
}
