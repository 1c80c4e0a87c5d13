//! Deadlock-free two-account transfers
//!
//! A transfer needs its source and destination locked together. Taking the
//! locks in a fixed order and waiting on each would let two transferers
//! moving money in opposite directions each hold one lock and wait forever
//! on the other. Instead every acquisition here is a non-blocking attempt:
//!
//! 1. Try the source lock. On failure nothing is held; back off and retry.
//! 2. Try the destination lock. On failure release the source, back off and
//!    retry from step 1.
//! 3. With both held, withdraw from the source. If that succeeds, deposit
//!    into the destination, draw one sequence number for the pair and
//!    release destination then source.
//! 4. If the source cannot cover the amount, release both and give up on
//!    this transfer. Only lock contention is retried, never a business
//!    failure.
//!
//! No task ever waits for a lock while holding another account lock, so
//! circular wait is impossible among transferers and between transferers
//! and single-account agents.

use super::account::Account;
use super::bank::Bank;
use super::sequencer::TransactionSequencer;
use crate::types::{AccountId, Amount, SequenceNumber, SimError};
use log::debug;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delay policy between contended lock attempts
///
/// The delay doubles after each failed attempt, starting at `initial` and
/// never exceeding `max`. `initial == max` gives a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial: delay,
            max: delay,
        }
    }

    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
        }
    }

    /// Delay after the `attempt`-th failed attempt (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial
            .checked_mul(1 << shift)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(100), Duration::from_millis(800))
    }
}

/// How a transfer ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both legs committed under one sequence number
    Completed {
        sequence: SequenceNumber,
        from_balance: Amount,
        to_balance: Amount,
        /// Lock attempts made, including the successful one
        attempts: u32,
    },
    /// The source could not cover the amount; nothing changed
    InsufficientFunds { balance: Amount, attempts: u32 },
    /// Shutdown was requested while waiting to retry; nothing changed
    Cancelled { attempts: u32 },
}

/// Runs the non-blocking two-lock transfer protocol
#[derive(Debug, Clone, Default)]
pub struct TransferCoordinator {
    backoff: Backoff,
}

impl TransferCoordinator {
    pub fn new(backoff: Backoff) -> Self {
        Self { backoff }
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Retries until both locks are acquired together or `cancel` fires.
    ///
    /// # Returns
    ///
    /// * `Ok(TransferOutcome)` describing how the transfer ended
    /// * `Err(SimError)` if either account does not exist, the accounts are
    ///   the same, or `amount` is zero
    pub async fn transfer(
        &self,
        bank: &Bank,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        cancel: &CancellationToken,
    ) -> Result<TransferOutcome, SimError> {
        if amount == 0 {
            return Err(SimError::ZeroAmount);
        }
        if from == to {
            return Err(SimError::SameAccount { account: from });
        }
        let source = bank.account(from)?;
        let destination = bank.account(to)?;

        let mut attempts = 0;
        loop {
            if cancel.is_cancelled() {
                return Ok(TransferOutcome::Cancelled { attempts });
            }

            attempts += 1;
            if let Some(outcome) =
                Self::attempt(source, destination, amount, bank.sequencer(), attempts)
            {
                return Ok(outcome);
            }

            let delay = self.backoff.delay(attempts);
            debug!(
                "transfer {} -> {} contended on attempt {}, retrying in {:?}",
                from, to, attempts, delay
            );
            tokio::select! {
                _ = cancel.cancelled() => return Ok(TransferOutcome::Cancelled { attempts }),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One pass of steps 1 to 4; `None` means a lock was busy
    fn attempt(
        source: &Account,
        destination: &Account,
        amount: Amount,
        sequencer: &TransactionSequencer,
        attempts: u32,
    ) -> Option<TransferOutcome> {
        let mut from = source.try_lock()?;
        // Returning here drops `from`, so the source is never held while waiting
        let mut to = destination.try_lock()?;

        let outcome = if from.try_withdraw(amount) {
            to.deposit(amount);
            TransferOutcome::Completed {
                sequence: sequencer.next(),
                from_balance: from.balance(),
                to_balance: to.balance(),
                attempts,
            }
        } else {
            TransferOutcome::InsufficientFunds {
                balance: from.balance(),
                attempts,
            }
        };

        drop(to);
        drop(from);
        Some(outcome)
    }
}
