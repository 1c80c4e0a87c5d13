//! Events emitted by agents and auditors
//!
//! Every committed transaction, every rejected attempt and every completed
//! audit produces one [`SimEvent`]. Events are built after the balance
//! mutation and sequence assignment have committed, so whatever an event
//! sink does with them cannot affect account state.

use super::account::{AccountId, Amount, SequenceNumber};
use super::agent::{AgentId, AuditorKind};
use chrono::{DateTime, Utc};

/// A timestamped simulation event
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    /// Wall-clock time the event was built
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

/// What happened
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A committed deposit
    Deposit {
        agent: AgentId,
        account: AccountId,
        amount: Amount,
        /// Balance right after the deposit, read under the account lock
        balance: Amount,
        sequence: SequenceNumber,
        /// Amount exceeded the deposit flag threshold
        flagged: bool,
    },

    /// A committed withdrawal
    Withdrawal {
        agent: AgentId,
        account: AccountId,
        amount: Amount,
        balance: Amount,
        sequence: SequenceNumber,
        flagged: bool,
    },

    /// A committed transfer; one sequence number covers both legs
    Transfer {
        agent: AgentId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        from_balance: Amount,
        to_balance: Amount,
        sequence: SequenceNumber,
    },

    /// A withdrawal or transfer rejected for lack of funds
    ///
    /// Rejected attempts are not transactions and carry no sequence number.
    InsufficientFunds {
        agent: AgentId,
        from: AccountId,
        /// Destination when the rejected attempt was a transfer
        to: Option<AccountId>,
        amount: Amount,
        /// Source balance at the time of the attempt
        balance: Amount,
    },

    /// A completed audit snapshot
    Audit(AuditReport),
}

/// Result of one successful audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub auditor: AuditorKind,
    /// Sequence counter value while every account lock was held
    pub sequence: SequenceNumber,
    /// Transactions committed since this auditor's previous successful audit
    pub transactions_since_last: u64,
    /// Balance of every account, indexed by account
    pub balances: Vec<Amount>,
}

impl AuditReport {
    /// Sum of all audited balances
    pub fn total(&self) -> Amount {
        self.balances.iter().sum()
    }
}

impl SimEvent {
    /// Build an event stamped with the current time
    pub fn now(kind: EventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Whether this event also belongs in the flagged transaction log
    pub fn is_flagged(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Deposit { flagged: true, .. } | EventKind::Withdrawal { flagged: true, .. }
        )
    }

    /// Sequence number of the committed transaction, if any
    pub fn sequence(&self) -> Option<SequenceNumber> {
        match &self.kind {
            EventKind::Deposit { sequence, .. }
            | EventKind::Withdrawal { sequence, .. }
            | EventKind::Transfer { sequence, .. } => Some(*sequence),
            EventKind::InsufficientFunds { .. } | EventKind::Audit(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn deposit(flagged: bool) -> SimEvent {
        SimEvent::now(EventKind::Deposit {
            agent: AgentId::depositor(0),
            account: AccountId(0),
            amount: 500,
            balance: 500,
            sequence: 1,
            flagged,
        })
    }

    fn rejected() -> SimEvent {
        SimEvent::now(EventKind::InsufficientFunds {
            agent: AgentId::withdrawer(1),
            from: AccountId(0),
            to: None,
            amount: 600,
            balance: 500,
        })
    }

    #[rstest]
    #[case::flagged_deposit(deposit(true), true)]
    #[case::plain_deposit(deposit(false), false)]
    #[case::rejected(rejected(), false)]
    fn test_is_flagged(#[case] event: SimEvent, #[case] expected: bool) {
        assert_eq!(event.is_flagged(), expected);
    }

    #[test]
    fn test_rejected_attempt_has_no_sequence() {
        assert_eq!(rejected().sequence(), None);
        assert_eq!(deposit(false).sequence(), Some(1));
    }

    #[test]
    fn test_audit_report_total() {
        let audit = SimEvent::now(EventKind::Audit(AuditReport {
            auditor: AuditorKind::Internal,
            sequence: 4,
            transactions_since_last: 4,
            balances: vec![100, 250],
        }));
        assert_eq!(audit.sequence(), None);
        match &audit.kind {
            EventKind::Audit(report) => assert_eq!(report.total(), 350),
            other => panic!("expected audit, got {:?}", other),
        }
    }
}
