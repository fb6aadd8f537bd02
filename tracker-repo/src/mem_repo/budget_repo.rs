use crate::budget_repo::BudgetRepoError::{NoBudget, OutOfRange, UserNotFound};
use crate::budget_repo::{check_amount, Budget, BudgetRepo, BudgetRepoError};
use crate::mem_repo::{shift_available, MemRepo};
use crate::UserId;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

impl MemRepo {
    fn adjust_available(
        &self,
        user_id: UserId,
        delta: Decimal,
    ) -> Result<Budget, BudgetRepoError> {
        let mut write_guard = self.write_lock()?;

        let budget = write_guard
            .current_budget_mut(user_id)
            .ok_or(NoBudget(user_id))?;
        budget.available =
            shift_available(budget.available, delta).ok_or(OutOfRange(user_id))?;
        Ok(budget.clone())
    }
}

#[async_trait]
impl BudgetRepo for MemRepo {
    async fn set_budget(
        &self,
        user_id: UserId,
        amount: Decimal,
    ) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        let mut write_guard = self.write_lock()?;

        if !write_guard.users.contains_key(&user_id) {
            return Err(UserNotFound(user_id));
        }

        let id = write_guard.next_budget_id;
        write_guard.next_budget_id += 1;

        let budget = Budget {
            id,
            user_id,
            total: amount,
            available: amount,
            created_at: Utc::now(),
        };
        write_guard.budgets.insert(id, budget.clone());

        Ok(budget)
    }

    async fn get_current_budget(
        &self,
        user_id: UserId,
    ) -> Result<Option<Budget>, BudgetRepoError> {
        let read_guard = self.read_lock()?;

        Ok(read_guard.current_budget(user_id).cloned())
    }

    async fn deduct(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        self.adjust_available(user_id, -amount)
    }

    async fn restore(&self, user_id: UserId, amount: Decimal) -> Result<Budget, BudgetRepoError> {
        let amount = check_amount(amount)?;
        self.adjust_available(user_id, amount)
    }
}
