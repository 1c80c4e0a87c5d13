//! Core traits for the simulation's collaborators
//!
//! The engine never draws random numbers or renders output itself. It
//! consumes these capabilities so tests can substitute deterministic or
//! recording implementations.

use crate::types::{AccountId, Amount, SimError, SimEvent};
use std::time::Duration;

/// Source of uniform random integers
///
/// Shared by every agent at once, so implementations must be safe for
/// concurrent use.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, bound)`; returns 0 when `bound` is 0
    fn below(&self, bound: u64) -> u64;

    /// Uniformly chosen account out of `count`
    fn pick_account(&self, count: usize) -> AccountId {
        AccountId(self.below(count as u64) as usize)
    }

    /// Uniform amount in `[1, max]`
    fn amount(&self, max: Amount) -> Amount {
        self.below(max) + 1
    }

    /// Uniform pause in `[0, max)` at millisecond granularity
    fn jitter(&self, max: Duration) -> Duration {
        let bound = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(self.below(bound))
    }
}

/// Receiver of simulation events
///
/// Called after the transaction it describes has committed and its locks
/// have been released. A failing sink never rolls anything back; callers
/// report the error and carry on.
pub trait EventSink: Send + Sync {
    /// Record one event
    fn record(&self, event: &SimEvent) -> Result<(), SimError>;
}

/// Hook fired after every deposit into an account
///
/// Runs while the account lock is still held, so an observer must not try
/// to lock any account itself.
pub trait FundsObserver: Send + Sync {
    /// Funds were added; `balance` is the new balance
    fn funds_available(&self, account: AccountId, balance: Amount);
}
