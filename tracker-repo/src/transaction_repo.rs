use crate::{to_cents, within_amount_limit, UserId, AMOUNT_LIMIT};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Length limit of descriptions and categories, matching their `VARCHAR(255)` columns.
pub const MAX_TEXT_LENGTH: usize = 255;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Whether recording or deleting a transaction of this kind moves the
    /// available balance of the current budget. Income is informational only.
    pub const fn affects_ledger(&self) -> bool {
        matches!(self, TransactionKind::Expense)
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow!("Unknown transaction kind: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: i32,
    pub user_id: UserId,
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTransaction {
    pub const fn new(
        amount: Decimal,
        description: String,
        kind: TransactionKind,
        category: Option<String>,
    ) -> NewTransaction {
        NewTransaction {
            amount,
            description,
            kind,
            category,
        }
    }

    pub const fn expense(amount: Decimal, description: String) -> NewTransaction {
        Self::new(amount, description, TransactionKind::Expense, None)
    }

    pub const fn income(amount: Decimal, description: String) -> NewTransaction {
        Self::new(amount, description, TransactionKind::Income, None)
    }

    /// Normalizes the amount to cents and the description to its trimmed
    /// form, rejecting non-positive amounts and blank descriptions.
    pub fn validate(self) -> Result<NewTransaction, TransactionRepoError> {
        let amount = to_cents(self.amount);
        if amount <= Decimal::ZERO {
            return Err(TransactionRepoError::InvalidTransaction(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if !within_amount_limit(amount) {
            return Err(TransactionRepoError::InvalidTransaction(format!(
                "amount must be below {}, got {}",
                AMOUNT_LIMIT, self.amount
            )));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TransactionRepoError::InvalidTransaction(
                "description must not be empty".to_owned(),
            ));
        }
        if description.chars().count() > MAX_TEXT_LENGTH {
            return Err(TransactionRepoError::InvalidTransaction(format!(
                "description must be at most {} characters",
                MAX_TEXT_LENGTH
            )));
        }
        let category = self
            .category
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        if category
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_TEXT_LENGTH)
        {
            return Err(TransactionRepoError::InvalidTransaction(format!(
                "category must be at most {} characters",
                MAX_TEXT_LENGTH
            )));
        }

        Ok(NewTransaction {
            amount,
            description: description.to_owned(),
            kind: self.kind,
            category,
        })
    }

    pub fn to_transaction(
        self,
        id: i32,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            user_id,
            amount: self.amount,
            description: self.description,
            kind: self.kind,
            category: self.category,
            created_at,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct Filter {
    pub kind: Option<TransactionKind>,
}

impl Filter {
    pub const NONE: Filter = Filter { kind: None };

    pub const fn kind(kind: TransactionKind) -> Filter {
        Filter { kind: Some(kind) }
    }
}

/// The transaction log. Implementations apply each mutation and its effect on
/// the current budget as a single atomic unit.
#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Transactions of the user, newest first.
    async fn get_all_transactions(
        &self,
        user_id: UserId,
        filter: Filter,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    /// Appends the transaction. An expense also lowers the available balance
    /// of the current budget, if the user has one.
    async fn record_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Removes the transaction. Deleting an expense gives its amount back to
    /// the current budget.
    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
