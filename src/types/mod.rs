//! Types module
//!
//! Contains core data structures used throughout the simulation.
//! - `account`: Account identifiers, amounts and sequence numbers
//! - `agent`: Agent and auditor identities
//! - `event`: Events handed to the output collaborators
//! - `error`: Error types for the simulation

pub mod account;
pub mod agent;
pub mod error;
pub mod event;

pub use account::{AccountId, Amount, SequenceNumber};
pub use agent::{AgentId, AgentKind, AuditorKind};
pub use error::SimError;
pub use event::{AuditReport, EventKind, SimEvent};
