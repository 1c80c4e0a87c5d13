//! Core concurrency engine
//!
//! This module contains the account, locking and ordering components:
//! - `traits` - Collaborator abstractions (randomness, event sinks, deposit hooks)
//! - `account` - Lock-guarded balance cells
//! - `sequencer` - Global transaction numbering
//! - `bank` - The shared account table and single-account commit protocol
//! - `transfer` - Deadlock-free two-account transfers
//! - `audit` - Freeze-all-accounts snapshots
//! - `ledger` - Serialized replay of committed events
//! - `context` - Handles shared by running agents
//! - `random` - `rand`-backed random sources

pub mod account;
pub mod audit;
pub mod bank;
pub mod context;
pub mod ledger;
pub mod random;
pub mod sequencer;
pub mod traits;
pub mod transfer;

pub use account::{Account, AccountGuard};
pub use audit::{AuditCoordinator, AuditSnapshot, Auditor};
pub use bank::{Bank, DepositReceipt, WithdrawOutcome};
pub use context::SimContext;
pub use ledger::LedgerReplay;
pub use random::{SeededRandom, ThreadRandom};
pub use sequencer::TransactionSequencer;
pub use traits::{EventSink, FundsObserver, RandomSource};
pub use transfer::{Backoff, TransferCoordinator, TransferOutcome};
