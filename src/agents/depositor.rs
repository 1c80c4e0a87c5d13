//! Depositor agent

use crate::core::SimContext;
use crate::types::{AgentId, EventKind, SimError, SimEvent};
use log::{error, info};
use tokio_util::sync::CancellationToken;

/// Deposits a random amount into a random account, forever
pub struct Depositor {
    id: AgentId,
    ctx: SimContext,
}

impl Depositor {
    pub fn new(index: usize, ctx: SimContext) -> Self {
        Self {
            id: AgentId::depositor(index),
            ctx,
        }
    }

    /// One loop body: pick, deposit, emit
    ///
    /// The deposit and its sequence number commit before the event is
    /// recorded; deposits above the flag threshold are marked flagged.
    pub async fn step(&self) -> Result<SimEvent, SimError> {
        let config = &self.ctx.config;
        let account = self.ctx.random.pick_account(self.ctx.bank.len());
        let amount = self.ctx.random.amount(config.max_deposit);

        let receipt = self.ctx.bank.deposit(account, amount).await?;

        Ok(self.ctx.emit(EventKind::Deposit {
            agent: self.id,
            account,
            amount,
            balance: receipt.balance,
            sequence: receipt.sequence,
            flagged: config.is_flagged_deposit(amount),
        }))
    }

    /// Step, pause, repeat until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        info!("depositor {} started", self.id);
        let pause = self.ctx.config.pacing.depositor;

        while !cancel.is_cancelled() {
            if let Err(e) = self.step().await {
                error!("depositor {} failed: {}", self.id, e);
            }
            if !self.ctx.pause(pause, &cancel).await {
                break;
            }
        }

        info!("depositor {} stopped", self.id);
    }
}
