//! Lock-guarded account balances
//!
//! This module provides the `Account` cell and its `AccountGuard`.
//!
//! # Locking Discipline
//!
//! A balance can only be read or changed through an `AccountGuard`, and a
//! guard only exists while the account's lock is held. The rule "never touch
//! a balance outside its lock" is therefore checked by the compiler rather
//! than by convention. Dropping the guard releases the lock on every exit
//! path, including early returns and task cancellation.
//!
//! Two ways to acquire:
//! - [`Account::lock`] waits for the lock (single-account agents)
//! - [`Account::try_lock`] never waits (transfers and audits)
//!
//! The lock is a FIFO-fair `tokio::sync::Mutex`, so a waiting agent cannot be
//! starved by later arrivals.

use super::traits::FundsObserver;
use crate::types::{AccountId, Amount};
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, MutexGuard};

/// A balance cell guarded by its own exclusive lock
pub struct Account {
    id: AccountId,
    balance: Mutex<Amount>,
    /// Deposit hooks; registered at setup, read under the balance lock
    observers: RwLock<Vec<Arc<dyn FundsObserver>>>,
}

impl Account {
    /// Create an account with a zero balance
    pub fn new(id: AccountId) -> Self {
        Self::with_opening_balance(id, 0)
    }

    /// Create an account that starts with `balance`
    pub fn with_opening_balance(id: AccountId, balance: Amount) -> Self {
        Self {
            id,
            balance: Mutex::new(balance),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Acquire the lock, waiting as long as necessary
    pub async fn lock(&self) -> AccountGuard<'_> {
        AccountGuard {
            account: self,
            balance: self.balance.lock().await,
        }
    }

    /// Acquire the lock only if it is free right now
    pub fn try_lock(&self) -> Option<AccountGuard<'_>> {
        self.balance.try_lock().ok().map(|balance| AccountGuard {
            account: self,
            balance,
        })
    }

    /// Register a hook fired after every deposit into this account
    pub fn subscribe(&self, observer: Arc<dyn FundsObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(observer);
    }

    fn notify_funds_available(&self, balance: Amount) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for observer in observers.iter() {
            observer.funds_available(self.id, balance);
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers = self
            .observers
            .read()
            .map(|observers| observers.len())
            .unwrap_or_default();
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("observers", &observers)
            .finish_non_exhaustive()
    }
}

/// Proof that the account's lock is held
///
/// All balance operations live here. The lock is released when the guard is
/// dropped.
pub struct AccountGuard<'a> {
    account: &'a Account,
    balance: MutexGuard<'a, Amount>,
}

impl AccountGuard<'_> {
    pub fn id(&self) -> AccountId {
        self.account.id
    }

    /// Current balance
    pub fn balance(&self) -> Amount {
        *self.balance
    }

    /// Add `amount` to the balance and fire the deposit hooks
    ///
    /// Deposits always succeed.
    pub fn deposit(&mut self, amount: Amount) {
        *self.balance += amount;
        self.account.notify_funds_available(*self.balance);
    }

    /// Remove `amount` if the balance covers it
    ///
    /// # Returns
    ///
    /// * `true` if the balance was decremented
    /// * `false` if funds were insufficient; the balance is untouched
    ///
    /// Never waits and never fails: insufficient funds is a normal outcome.
    pub fn try_withdraw(&mut self, amount: Amount) -> bool {
        if *self.balance >= amount {
            *self.balance -= amount;
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for AccountGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountGuard")
            .field("id", &self.account.id)
            .field("balance", &*self.balance)
            .finish()
    }
}
