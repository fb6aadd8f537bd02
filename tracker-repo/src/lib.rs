use crate::budget_repo::BudgetRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

pub mod budget_repo;
pub mod transaction_repo;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

pub type UserId = i32;

/// Handles to every repository, all backed by the same store.
#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepo>,
    pub budgets: Arc<dyn BudgetRepo>,
    pub transactions: Arc<dyn TransactionRepo>,
    pub health: Arc<dyn HealthCheck>,
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

/// Amounts and balances are stored as `NUMERIC(10, 2)`, so their magnitude
/// must stay below this.
pub const AMOUNT_LIMIT: i64 = 100_000_000;

/// Rounds an amount to the two decimal places the ledger stores, keeping a
/// scale of exactly two.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);
    amount
}

pub fn within_amount_limit(amount: Decimal) -> bool {
    amount.abs() < Decimal::from(AMOUNT_LIMIT)
}
