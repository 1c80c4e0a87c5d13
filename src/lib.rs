//! Bank Account Simulation Library
//! # Overview
//!
//! Concurrent agents deposit into, withdraw from and transfer between a
//! small set of shared accounts while two auditors periodically freeze every
//! account to take a consistent snapshot.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (account ids, agents, events, errors)
//! - [`config`] - Simulation constants and pacing
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Concurrency engine:
//!   - [`core::account`] - Lock-guarded balances
//!   - [`core::sequencer`] - Global transaction numbering
//!   - [`core::bank`] - Account table and single-account commits
//!   - [`core::transfer`] - Deadlock-free two-account transfers
//!   - [`core::audit`] - Freeze-all-accounts snapshots
//!   - [`core::ledger`] - Serialized replay of committed events
//! - [`agents`] - Depositor, withdrawer and transferer tasks
//! - [`io`] - Transcript, flagged transaction log and event routing
//! - [`simulation`] - Wiring, runtime and shutdown
//!
//! # Guarantees
//!
//! - A balance is only read or written while its account lock is held
//! - No balance ever goes negative
//! - Sequence numbers are unique, strictly increasing and follow commit order
//! - Transfers preserve the total balance and never deadlock
//! - Audit snapshots are consistent with respect to every mutation

// Module declarations
pub mod agents;
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod simulation;
pub mod types;

pub use config::{PacingConfig, SimConfig};
pub use core::{
    AuditCoordinator, Bank, EventSink, LedgerReplay, RandomSource, SeededRandom, ThreadRandom,
    TransferCoordinator,
};
pub use simulation::Simulation;
pub use types::{AccountId, AgentId, Amount, EventKind, SequenceNumber, SimError, SimEvent};
