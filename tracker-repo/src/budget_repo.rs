use crate::{to_cents, within_amount_limit, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A budget row. A user accumulates one row per set-budget call; the row with
/// the highest id is the current one.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Budget {
    pub id: i32,
    pub user_id: UserId,
    pub total: Decimal,
    pub available: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Balance {
    pub total: Decimal,
    pub available: Decimal,
}

impl Default for Balance {
    fn default() -> Self {
        Balance {
            total: Decimal::new(0, 2),
            available: Decimal::new(0, 2),
        }
    }
}

impl From<Budget> for Balance {
    fn from(budget: Budget) -> Self {
        Balance {
            total: budget.total,
            available: budget.available,
        }
    }
}

#[async_trait]
pub trait BudgetRepo: Sync + Send {
    /// Starts a new budget with `available` equal to `amount`. Transactions
    /// recorded against earlier budgets are not carried over.
    async fn set_budget(&self, user_id: UserId, amount: Decimal)
        -> Result<Budget, BudgetRepoError>;

    async fn get_current_budget(&self, user_id: UserId)
        -> Result<Option<Budget>, BudgetRepoError>;

    async fn deduct(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError>;

    async fn restore(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError>;

    /// Totals of the current budget, or zero for a user who never set one.
    async fn get_balance(&self, user_id: UserId) -> Result<Balance, BudgetRepoError> {
        let budget = self.get_current_budget(user_id).await?;
        Ok(budget.map(Balance::from).unwrap_or_default())
    }
}

#[derive(Error, Debug)]
pub enum BudgetRepoError {
    #[error("User {0} has no budget")]
    NoBudget(UserId),
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("Invalid amount {0}: must be at least 0 and below 100000000")]
    InvalidAmount(Decimal),
    #[error("Available balance of user {0} would leave the supported range")]
    OutOfRange(UserId),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Rounds `amount` to cents, rejecting negative values and values the ledger
/// cannot store.
pub fn check_amount(amount: Decimal) -> Result<Decimal, BudgetRepoError> {
    let amount = to_cents(amount);
    if amount < Decimal::ZERO || !within_amount_limit(amount) {
        Err(BudgetRepoError::InvalidAmount(amount))
    } else {
        Ok(amount)
    }
}
