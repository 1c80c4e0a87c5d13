//! Agent and auditor identities
//!
//! Identities only label output; no component behaves differently based on
//! which agent it is talking to.

use std::fmt;

/// The three kinds of account agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Deposits random amounts into random accounts
    Depositor,
    /// Withdraws random amounts from random accounts, never waiting for funds
    Withdrawer,
    /// Moves funds from an account to its successor
    Transferer,
}

impl AgentKind {
    /// Two-letter prefix used in agent labels
    pub fn prefix(self) -> &'static str {
        match self {
            AgentKind::Depositor => "DT",
            AgentKind::Withdrawer => "WT",
            AgentKind::Transferer => "TR",
        }
    }
}

/// Identity of one agent, unique within its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentId {
    pub kind: AgentKind,
    pub index: usize,
}

impl AgentId {
    pub fn depositor(index: usize) -> Self {
        Self {
            kind: AgentKind::Depositor,
            index,
        }
    }

    pub fn withdrawer(index: usize) -> Self {
        Self {
            kind: AgentKind::Withdrawer,
            index,
        }
    }

    pub fn transferer(index: usize) -> Self {
        Self {
            kind: AgentKind::Transferer,
            index,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}{}", self.kind.prefix(), self.index))
    }
}

/// The two independent auditors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditorKind {
    Internal,
    Treasury,
}

impl AuditorKind {
    /// Heading printed at the start and end of an audit report
    pub fn title(self) -> &'static str {
        match self {
            AuditorKind::Internal => "Internal Bank Audit",
            AuditorKind::Treasury => "UNITED STATES DEPARTMENT OF TREASURY - Bank audit",
        }
    }

    /// Name used for the auditor inside report lines
    pub fn auditor_name(self) -> &'static str {
        match self {
            AuditorKind::Internal => "INTERNAL BANK AUDITOR",
            AuditorKind::Treasury => "TREASURY DEPT AUDITOR",
        }
    }

    /// Noun used for "since the last ... Audit"
    pub fn audit_name(self) -> &'static str {
        match self {
            AuditorKind::Internal => "Internal Audit",
            AuditorKind::Treasury => "Treasury Department Audit",
        }
    }
}
