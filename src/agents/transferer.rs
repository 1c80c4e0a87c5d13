//! Transferer agent

use crate::core::{SimContext, TransferCoordinator, TransferOutcome};
use crate::types::{AgentId, EventKind, SimError, SimEvent};
use log::{debug, error, info};
use tokio_util::sync::CancellationToken;

/// Moves a random amount from a random account to its successor, forever
///
/// Lock contention is retried inside the coordinator. Insufficient funds
/// abandons the transfer; the next iteration draws a fresh one.
pub struct Transferer {
    id: AgentId,
    ctx: SimContext,
    coordinator: TransferCoordinator,
}

impl Transferer {
    pub fn new(index: usize, ctx: SimContext) -> Self {
        let coordinator = TransferCoordinator::new(ctx.config.pacing.transfer_backoff());
        Self {
            id: AgentId::transferer(index),
            ctx,
            coordinator,
        }
    }

    /// One loop body: pick a pair and amount, transfer, emit
    ///
    /// # Returns
    ///
    /// * `Ok(Some(event))` for a completed or rejected transfer
    /// * `Ok(None)` if `cancel` fired while the transfer was contended
    pub async fn step(&self, cancel: &CancellationToken) -> Result<Option<SimEvent>, SimError> {
        let count = self.ctx.bank.len();
        let from = self.ctx.random.pick_account(count);
        let to = from.successor(count);
        let amount = self.ctx.random.amount(self.ctx.config.max_withdrawal);

        let outcome = self
            .coordinator
            .transfer(&self.ctx.bank, from, to, amount, cancel)
            .await?;

        let kind = match outcome {
            TransferOutcome::Completed {
                sequence,
                from_balance,
                to_balance,
                attempts,
            } => {
                if attempts > 1 {
                    debug!("transfer by {} needed {} lock attempts", self.id, attempts);
                }
                EventKind::Transfer {
                    agent: self.id,
                    from,
                    to,
                    amount,
                    from_balance,
                    to_balance,
                    sequence,
                }
            }
            TransferOutcome::InsufficientFunds { balance, .. } => EventKind::InsufficientFunds {
                agent: self.id,
                from,
                to: Some(to),
                amount,
                balance,
            },
            TransferOutcome::Cancelled { .. } => return Ok(None),
        };

        Ok(Some(self.ctx.emit(kind)))
    }

    /// Step, pause, repeat until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        info!("transferer {} started", self.id);
        let pause = self.ctx.config.pacing.transferer;

        while !cancel.is_cancelled() {
            if let Err(e) = self.step(&cancel).await {
                error!("transferer {} failed: {}", self.id, e);
            }
            if !self.ctx.pause(pause, &cancel).await {
                break;
            }
        }

        info!("transferer {} stopped", self.id);
    }
}
