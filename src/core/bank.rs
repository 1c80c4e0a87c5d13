//! The simulation context: account table plus sequencer
//!
//! `Bank` is created once at startup and shared by `Arc` with every agent
//! and auditor. It owns the fixed account table and the global
//! `TransactionSequencer`; nothing else holds account state.
//!
//! # Single-Account Commit Protocol
//!
//! `deposit` and `withdraw` follow the same steps:
//! 1. Acquire the account lock, waiting if needed
//! 2. Mutate the balance
//! 3. Draw a sequence number while still holding the lock
//! 4. Release the lock
//!
//! A failed withdrawal stops after step 2 and draws no sequence number.

use super::account::Account;
use super::sequencer::TransactionSequencer;
use crate::types::{AccountId, Amount, SequenceNumber, SimError};

/// Outcome of a committed deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    pub sequence: SequenceNumber,
    /// Balance right after the deposit
    pub balance: Amount,
}

/// Outcome of a withdrawal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// Funds were removed and a sequence number issued
    Completed {
        sequence: SequenceNumber,
        balance: Amount,
    },
    /// Balance was too low; nothing changed
    InsufficientFunds { balance: Amount },
}

/// Fixed table of accounts and the global transaction counter
#[derive(Debug)]
pub struct Bank {
    accounts: Vec<Account>,
    sequencer: TransactionSequencer,
}

impl Bank {
    /// Create `count` accounts, all with a zero balance
    pub fn new(count: usize) -> Self {
        Self::with_opening_balances(&vec![0; count])
    }

    /// Create one account per entry of `balances`
    pub fn with_opening_balances(balances: &[Amount]) -> Self {
        let mut accounts = Vec::with_capacity(balances.len());
        for (index, &balance) in balances.iter().enumerate() {
            accounts.push(Account::with_opening_balance(AccountId(index), balance));
        }

        Self {
            accounts,
            sequencer: TransactionSequencer::new(),
        }
    }

    /// Number of accounts in the table
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts in index order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Look up an account by id
    pub fn account(&self, id: AccountId) -> Result<&Account, SimError> {
        self.accounts
            .get(id.index())
            .ok_or_else(|| SimError::unknown_account(id, self.accounts.len()))
    }

    pub fn sequencer(&self) -> &TransactionSequencer {
        &self.sequencer
    }

    /// Deposit `amount` into `id`
    ///
    /// # Returns
    ///
    /// * `Ok(DepositReceipt)` with the sequence number and new balance
    /// * `Err(SimError)` if the account does not exist or `amount` is zero
    pub async fn deposit(&self, id: AccountId, amount: Amount) -> Result<DepositReceipt, SimError> {
        if amount == 0 {
            return Err(SimError::ZeroAmount);
        }
        let account = self.account(id)?;

        let mut guard = account.lock().await;
        guard.deposit(amount);
        let sequence = self.sequencer.next();
        let balance = guard.balance();
        drop(guard);

        Ok(DepositReceipt { sequence, balance })
    }

    /// Withdraw `amount` from `id` if the balance covers it
    ///
    /// Never waits for funds. Insufficient funds is reported as
    /// `WithdrawOutcome::InsufficientFunds`, not as an error.
    pub async fn withdraw(
        &self,
        id: AccountId,
        amount: Amount,
    ) -> Result<WithdrawOutcome, SimError> {
        if amount == 0 {
            return Err(SimError::ZeroAmount);
        }
        let account = self.account(id)?;

        let mut guard = account.lock().await;
        let outcome = if guard.try_withdraw(amount) {
            WithdrawOutcome::Completed {
                sequence: self.sequencer.next(),
                balance: guard.balance(),
            }
        } else {
            WithdrawOutcome::InsufficientFunds {
                balance: guard.balance(),
            }
        };
        drop(guard);

        Ok(outcome)
    }

    /// Read every balance, locking one account at a time
    ///
    /// Not a consistent snapshot while agents are running; use the audit
    /// snapshot for that. Intended for quiescent reads such as shutdown.
    pub async fn balances(&self) -> Vec<Amount> {
        let mut balances = Vec::with_capacity(self.accounts.len());
        for account in &self.accounts {
            balances.push(account.lock().await.balance());
        }
        balances
    }

    /// Sum of `balances`; same consistency caveat
    pub async fn total(&self) -> Amount {
        self.balances().await.iter().sum()
    }
}
