use crate::mem_repo::{shift_available, MemRepo};
use crate::transaction_repo::TransactionRepoError::{
    InvalidTransaction, TransactionNotFound, UserNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, Transaction, TransactionRepo, TransactionRepoError,
};
use crate::UserId;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl TransactionRepo for MemRepo {
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .transactions
            .get(&transaction_id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or(TransactionNotFound(transaction_id))
    }

    async fn get_all_transactions(
        &self,
        user_id: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let transactions = read_guard
            .transactions
            .values()
            .rev()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.kind.map_or(true, |kind| t.kind == kind))
            .cloned()
            .collect();

        Ok(transactions)
    }

    async fn record_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let new_transaction = new_transaction.validate()?;
        let mut write_guard = self.write_lock()?;

        if !write_guard.users.contains_key(&user_id) {
            return Err(UserNotFound(user_id));
        }

        if new_transaction.kind.affects_ledger() {
            if let Some(budget) = write_guard.current_budget_mut(user_id) {
                budget.available = shift_available(budget.available, -new_transaction.amount)
                    .ok_or_else(|| out_of_range(user_id))?;
            }
        }

        let id = write_guard.next_transaction_id;
        write_guard.next_transaction_id += 1;

        let transaction = new_transaction.to_transaction(id, user_id, Utc::now());
        write_guard.transactions.insert(id, transaction.clone());

        Ok(transaction)
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let transaction = match write_guard.transactions.get(&transaction_id) {
            Some(t) if t.user_id == user_id => t.clone(),
            _ => return Err(TransactionNotFound(transaction_id)),
        };

        if transaction.kind.affects_ledger() {
            if let Some(budget) = write_guard.current_budget_mut(user_id) {
                budget.available = shift_available(budget.available, transaction.amount)
                    .ok_or_else(|| out_of_range(user_id))?;
            }
        }
        write_guard.transactions.remove(&transaction_id);

        Ok(transaction)
    }
}

fn out_of_range(user_id: UserId) -> TransactionRepoError {
    InvalidTransaction(format!(
        "available balance of user {} would leave the supported range",
        user_id
    ))
}
