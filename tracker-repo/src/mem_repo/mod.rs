use crate::budget_repo::Budget;
use crate::transaction_repo::Transaction;
use crate::user_repo::User;
use crate::{within_amount_limit, HealthCheck, Repos, UserId};
use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod budget_repo;
mod transaction_repo;
mod user_repo;

struct State {
    users: HashMap<UserId, User>,
    budgets: BTreeMap<i32, Budget>,
    transactions: BTreeMap<i32, Transaction>,
    next_user_id: UserId,
    next_budget_id: i32,
    next_transaction_id: i32,
}

impl State {
    fn current_budget(&self, user_id: UserId) -> Option<&Budget> {
        self.budgets.values().rev().find(|b| b.user_id == user_id)
    }

    fn current_budget_mut(&mut self, user_id: UserId) -> Option<&mut Budget> {
        self.budgets.values_mut().rev().find(|b| b.user_id == user_id)
    }
}

/// `available + delta`, or `None` when the result cannot be stored.
fn shift_available(available: Decimal, delta: Decimal) -> Option<Decimal> {
    available
        .checked_add(delta)
        .filter(|available| within_amount_limit(*available))
}

/// Keeps users, budgets and transactions behind one lock so that a
/// transaction and its budget adjustment are applied together.
pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let state = State {
            users: HashMap::new(),
            budgets: BTreeMap::new(),
            transactions: BTreeMap::new(),
            next_user_id: 1,
            next_budget_id: 1,
            next_transaction_id: 1,
        };
        MemRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}

pub fn create_repos() -> Repos {
    let repo = Arc::new(MemRepo::new());

    Repos {
        users: repo.clone(),
        budgets: repo.clone(),
        transactions: repo.clone(),
        health: repo,
    }
}
