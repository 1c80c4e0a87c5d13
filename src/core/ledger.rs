//! Serialized replay of committed events
//!
//! Sequence numbers totally order commits, so replaying committed events in
//! sequence order on a single thread must reproduce every balance the
//! concurrent run observed. The replay checks that:
//! - sequence numbers are contiguous from 1 (none lost, none duplicated)
//! - no balance ever goes negative
//! - the balance recorded in each event matches the replayed balance
//!
//! Rejected attempts and audits carry no sequence number and are skipped.

use crate::types::{AccountId, Amount, EventKind, SequenceNumber, SimError, SimEvent};

/// Balances rebuilt from an event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReplay {
    balances: Vec<Amount>,
    last_sequence: SequenceNumber,
    deposited: Amount,
    withdrawn: Amount,
}

impl LedgerReplay {
    /// Start from the bank's opening balances
    pub fn new(opening: Vec<Amount>) -> Self {
        Self {
            balances: opening,
            last_sequence: 0,
            deposited: 0,
            withdrawn: 0,
        }
    }

    /// Replay every committed event with a sequence number up to `up_to`
    ///
    /// Events may be passed in any order; they are sorted by sequence first.
    pub fn replay<'a, I>(
        opening: Vec<Amount>,
        events: I,
        up_to: Option<SequenceNumber>,
    ) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = &'a SimEvent>,
    {
        let mut committed: Vec<&SimEvent> = events
            .into_iter()
            .filter(|event| match (event.sequence(), up_to) {
                (Some(sequence), Some(limit)) => sequence <= limit,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect();
        committed.sort_by_key(|event| event.sequence());

        let mut ledger = Self::new(opening);
        for event in committed {
            ledger.apply(event)?;
        }
        Ok(ledger)
    }

    /// Apply one event; events without a sequence number are ignored
    pub fn apply(&mut self, event: &SimEvent) -> Result<(), SimError> {
        let Some(sequence) = event.sequence() else {
            return Ok(());
        };
        if sequence != self.last_sequence + 1 {
            return Err(divergence(
                sequence,
                format!("expected transaction {}", self.last_sequence + 1),
            ));
        }

        match &event.kind {
            EventKind::Deposit {
                account,
                amount,
                balance,
                ..
            } => {
                let replayed = self.credit(sequence, *account, *amount)?;
                expect_balance(sequence, *account, replayed, *balance)?;
                self.deposited += amount;
            }
            EventKind::Withdrawal {
                account,
                amount,
                balance,
                ..
            } => {
                let replayed = self.debit(sequence, *account, *amount)?;
                expect_balance(sequence, *account, replayed, *balance)?;
                self.withdrawn += amount;
            }
            EventKind::Transfer {
                from,
                to,
                amount,
                from_balance,
                to_balance,
                ..
            } => {
                let replayed_from = self.debit(sequence, *from, *amount)?;
                let replayed_to = self.credit(sequence, *to, *amount)?;
                expect_balance(sequence, *from, replayed_from, *from_balance)?;
                expect_balance(sequence, *to, replayed_to, *to_balance)?;
            }
            EventKind::InsufficientFunds { .. } | EventKind::Audit(_) => {}
        }

        self.last_sequence = sequence;
        Ok(())
    }

    pub fn balances(&self) -> &[Amount] {
        &self.balances
    }

    pub fn total(&self) -> Amount {
        self.balances.iter().sum()
    }

    pub fn last_sequence(&self) -> SequenceNumber {
        self.last_sequence
    }

    /// Sum of all replayed deposits
    pub fn deposited(&self) -> Amount {
        self.deposited
    }

    /// Sum of all replayed withdrawals (transfers excluded)
    pub fn withdrawn(&self) -> Amount {
        self.withdrawn
    }

    fn slot(
        &mut self,
        sequence: SequenceNumber,
        account: AccountId,
    ) -> Result<&mut Amount, SimError> {
        let count = self.balances.len();
        match self.balances.get_mut(account.index()) {
            Some(slot) => Ok(slot),
            None => Err(divergence(
                sequence,
                format!("{} is not one of {} accounts", account, count),
            )),
        }
    }

    fn credit(
        &mut self,
        sequence: SequenceNumber,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, SimError> {
        let slot = self.slot(sequence, account)?;
        *slot += amount;
        Ok(*slot)
    }

    fn debit(
        &mut self,
        sequence: SequenceNumber,
        account: AccountId,
        amount: Amount,
    ) -> Result<Amount, SimError> {
        let slot = self.slot(sequence, account)?;
        let balance = *slot;
        let Some(remaining) = balance.checked_sub(amount) else {
            return Err(divergence(
                sequence,
                format!("{} would go negative: {} - {}", account, balance, amount),
            ));
        };
        *slot = remaining;
        Ok(remaining)
    }
}

fn divergence(sequence: SequenceNumber, message: String) -> SimError {
    SimError::Replay { sequence, message }
}

fn expect_balance(
    sequence: SequenceNumber,
    account: AccountId,
    replayed: Amount,
    recorded: Amount,
) -> Result<(), SimError> {
    if replayed == recorded {
        Ok(())
    } else {
        Err(divergence(
            sequence,
            format!(
                "{} replayed to {} but was recorded as {}",
                account, replayed, recorded
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentId;

    fn deposit(
        sequence: SequenceNumber,
        account: usize,
        amount: Amount,
        balance: Amount,
    ) -> SimEvent {
        SimEvent::now(EventKind::Deposit {
            agent: AgentId::depositor(0),
            account: AccountId(account),
            amount,
            balance,
            sequence,
            flagged: false,
        })
    }

    fn withdrawal(
        sequence: SequenceNumber,
        account: usize,
        amount: Amount,
        balance: Amount,
    ) -> SimEvent {
        SimEvent::now(EventKind::Withdrawal {
            agent: AgentId::withdrawer(0),
            account: AccountId(account),
            amount,
            balance,
            sequence,
            flagged: false,
        })
    }

    fn transfer(
        sequence: SequenceNumber,
        amount: Amount,
        from_balance: Amount,
        to_balance: Amount,
    ) -> SimEvent {
        SimEvent::now(EventKind::Transfer {
            agent: AgentId::transferer(0),
            from: AccountId(0),
            to: AccountId(1),
            amount,
            from_balance,
            to_balance,
            sequence,
        })
    }

    #[test]
    fn test_replay_out_of_order_input() {
        let events = vec![
            withdrawal(3, 1, 50, 250),
            deposit(1, 0, 500, 500),
            transfer(2, 300, 200, 300),
        ];

        let ledger = LedgerReplay::replay(vec![0, 0], &events, None).unwrap();
        assert_eq!(ledger.balances(), &[200, 250]);
        assert_eq!(ledger.last_sequence(), 3);
        assert_eq!(ledger.deposited(), 500);
        assert_eq!(ledger.withdrawn(), 50);
        assert_eq!(ledger.total(), ledger.deposited() - ledger.withdrawn());
    }

    #[test]
    fn test_replay_up_to_limit() {
        let events = vec![deposit(1, 0, 100, 100), deposit(2, 0, 20, 120)];
        let ledger = LedgerReplay::replay(vec![0], &events, Some(1)).unwrap();
        assert_eq!(ledger.balances(), &[100]);
    }

    #[test]
    fn test_rejected_attempts_are_skipped() {
        let rejected = SimEvent::now(EventKind::InsufficientFunds {
            agent: AgentId::withdrawer(2),
            from: AccountId(0),
            to: None,
            amount: 600,
            balance: 0,
        });
        let events = vec![rejected, deposit(1, 0, 10, 10)];
        let ledger = LedgerReplay::replay(vec![0], &events, None).unwrap();
        assert_eq!(ledger.balances(), &[10]);
    }

    #[test]
    fn test_gap_in_sequence_is_reported() {
        let events = vec![deposit(1, 0, 10, 10), deposit(3, 0, 10, 20)];
        let err = LedgerReplay::replay(vec![0], &events, None).unwrap_err();
        assert_eq!(
            err,
            SimError::Replay {
                sequence: 3,
                message: "expected transaction 2".to_string()
            }
        );
    }

    #[test]
    fn test_overdraft_is_reported() {
        let events = vec![withdrawal(1, 0, 10, 0)];
        let err = LedgerReplay::replay(vec![5], &events, None).unwrap_err();
        assert!(matches!(err, SimError::Replay { sequence: 1, .. }));
    }

    #[test]
    fn test_balance_mismatch_is_reported() {
        let events = vec![deposit(1, 0, 10, 99)];
        let err = LedgerReplay::replay(vec![0], &events, None).unwrap_err();
        assert!(err.to_string().contains("recorded as 99"));
    }
}
