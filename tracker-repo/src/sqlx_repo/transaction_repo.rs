use crate::sqlx_repo::{is_foreign_key_violation, is_numeric_overflow, SQLxRepo};
use crate::transaction_repo::TransactionRepoError::{
    InvalidTransaction, TransactionNotFound, UserNotFound,
};
use crate::transaction_repo::{
    Filter, NewTransaction, Transaction, TransactionRepo, TransactionRepoError,
};
use crate::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{query_as, Postgres, QueryBuilder};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i32,
    user_id: i32,
    amount: Decimal,
    description: String,
    kind: String,
    category: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: value.id,
            user_id: value.user_id,
            amount: value.amount,
            description: value.description,
            kind: value.kind.parse()?,
            category: value.category,
            created_at: value.created_at,
        })
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry = query_as::<_, TransactionEntry>(
            "SELECT id, user_id, amount, description, kind, category, created_at FROM transactions WHERE id = $1 AND user_id = $2",
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?
        .ok_or(TransactionNotFound(transaction_id))?;
        Ok(transaction_entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user_id: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::<Postgres>::new(
            "SELECT id, user_id, amount, description, kind, category, created_at FROM transactions WHERE user_id = ",
        );
        query_builder.push_bind(user_id);
        if let Some(kind) = filter.kind {
            query_builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        query_builder.push(" ORDER BY id DESC");

        let transaction_entries: Vec<TransactionEntry> = query_builder
            .build_query_as::<TransactionEntry>()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get transactions for user {}", user_id))?;

        let transactions = transaction_entries
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    #[instrument(skip(self, new_transaction))]
    async fn record_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let new_transaction = new_transaction.validate()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to start database transaction")?;

        let result = query_as::<_, TransactionEntry>(
            "INSERT INTO transactions(user_id, amount, description, kind, category) VALUES ($1, $2, $3, $4, $5) RETURNING id, user_id, amount, description, kind, category, created_at",
        )
        .bind(user_id)
        .bind(new_transaction.amount)
        .bind(&new_transaction.description)
        .bind(new_transaction.kind.as_str())
        .bind(new_transaction.category.as_deref())
        .fetch_one(&mut *tx)
        .await;
        let transaction_entry = match result {
            Ok(transaction_entry) => transaction_entry,
            Err(e) if is_foreign_key_violation(&e) => return Err(UserNotFound(user_id)),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("Unable to insert transaction")
                    .into())
            }
        };

        if new_transaction.kind.affects_ledger() {
            let budget = Self::adjust_available(&mut *tx, user_id, -new_transaction.amount)
                .await
                .map_err(|e| ledger_error(e, user_id))?;
            if budget.is_none() {
                tracing::debug!(user_id, "No budget to deduct expense from");
            }
        }

        tx.commit()
            .await
            .context("Unable to commit database transaction")?;

        Ok(transaction_entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to start database transaction")?;

        let transaction: Transaction = query_as::<_, TransactionEntry>(
            "DELETE FROM transactions WHERE id = $1 AND user_id = $2 RETURNING id, user_id, amount, description, kind, category, created_at",
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Unable to delete transaction {}", transaction_id))?
        .ok_or(TransactionNotFound(transaction_id))?
        .try_into()?;

        if transaction.kind.affects_ledger() {
            Self::adjust_available(&mut *tx, user_id, transaction.amount)
                .await
                .map_err(|e| ledger_error(e, user_id))?;
        }

        tx.commit()
            .await
            .context("Unable to commit database transaction")?;

        Ok(transaction)
    }
}

fn ledger_error(e: sqlx::Error, user_id: UserId) -> TransactionRepoError {
    if is_numeric_overflow(&e) {
        InvalidTransaction(format!(
            "available balance of user {} would leave the supported range",
            user_id
        ))
    } else {
        anyhow::Error::new(e)
            .context(format!("Unable to adjust budget of user {}", user_id))
            .into()
    }
}
