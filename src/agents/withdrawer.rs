//! Withdrawer agent

use crate::core::{SimContext, WithdrawOutcome};
use crate::types::{AgentId, EventKind, SimError, SimEvent};
use log::{error, info};
use tokio_util::sync::CancellationToken;

/// Withdraws a random amount from a random account, forever
///
/// Never waits for funds: a withdrawal the balance cannot cover is reported
/// as blocked and the agent moves on.
pub struct Withdrawer {
    id: AgentId,
    ctx: SimContext,
}

impl Withdrawer {
    pub fn new(index: usize, ctx: SimContext) -> Self {
        Self {
            id: AgentId::withdrawer(index),
            ctx,
        }
    }

    /// One loop body: pick, attempt, emit
    pub async fn step(&self) -> Result<SimEvent, SimError> {
        let config = &self.ctx.config;
        let account = self.ctx.random.pick_account(self.ctx.bank.len());
        let amount = self.ctx.random.amount(config.max_withdrawal);

        let kind = match self.ctx.bank.withdraw(account, amount).await? {
            WithdrawOutcome::Completed { sequence, balance } => EventKind::Withdrawal {
                agent: self.id,
                account,
                amount,
                balance,
                sequence,
                flagged: config.is_flagged_withdrawal(amount),
            },
            WithdrawOutcome::InsufficientFunds { balance } => EventKind::InsufficientFunds {
                agent: self.id,
                from: account,
                to: None,
                amount,
                balance,
            },
        };

        Ok(self.ctx.emit(kind))
    }

    /// Step, pause, repeat until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        info!("withdrawer {} started", self.id);
        let pause = self.ctx.config.pacing.withdrawer;

        while !cancel.is_cancelled() {
            if let Err(e) = self.step().await {
                error!("withdrawer {} failed: {}", self.id, e);
            }
            if !self.ctx.pause(pause, &cancel).await {
                break;
            }
        }

        info!("withdrawer {} stopped", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{context, ScriptedRandom};
    use crate::types::AccountId;

    #[tokio::test]
    async fn test_blocked_withdrawal_consumes_no_sequence() {
        // amount 98 + 1 = 99 against an empty account
        let (ctx, sink) = context(&[0, 0], ScriptedRandom::new(&[0, 98]));
        let event = Withdrawer::new(4, ctx.clone()).step().await.unwrap();

        assert_eq!(
            event.kind,
            EventKind::InsufficientFunds {
                agent: AgentId::withdrawer(4),
                from: AccountId(0),
                to: None,
                amount: 99,
                balance: 0,
            }
        );
        assert_eq!(ctx.bank.sequencer().current(), 0);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn test_withdrawal_commits_and_flags() {
        let (ctx, _sink) = context(&[0, 500], ScriptedRandom::new(&[1, 94]));
        let event = Withdrawer::new(0, ctx.clone()).step().await.unwrap();

        assert_eq!(
            event.kind,
            EventKind::Withdrawal {
                agent: AgentId::withdrawer(0),
                account: AccountId(1),
                amount: 95,
                balance: 405,
                sequence: 1,
                flagged: true,
            }
        );
        assert_eq!(ctx.bank.balances().await, vec![0, 405]);
    }

    #[tokio::test]
    async fn test_small_withdrawal_not_flagged() {
        let (ctx, _sink) = context(&[100], ScriptedRandom::new(&[0, 89]));
        let event = Withdrawer::new(0, ctx).step().await.unwrap();
        assert!(!event.is_flagged());
        assert_eq!(event.sequence(), Some(1));
    }
}
