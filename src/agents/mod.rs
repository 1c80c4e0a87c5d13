//! Concurrent account agents
//!
//! Three agent kinds run as independent tokio tasks:
//! - [`Depositor`] - random deposits, always succeed
//! - [`Withdrawer`] - random withdrawals, rejected when funds are short
//! - [`Transferer`] - random transfers to the successor account
//!
//! Each agent loops over `step` and a random pause. The cancellation token
//! is checked at every loop boundary and during every pause. No lock is held
//! across either, so shutdown never interrupts a half-finished transaction.

pub mod depositor;
pub mod transferer;
pub mod withdrawer;

pub use depositor::Depositor;
pub use transferer::Transferer;
pub use withdrawer::Withdrawer;

use crate::core::SimContext;
use log::info;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Spawns the configured number of agents of every kind
pub struct AgentPool {
    ctx: SimContext,
}

impl AgentPool {
    pub fn new(ctx: SimContext) -> Self {
        Self { ctx }
    }

    /// Number of agent tasks `spawn` will start
    pub fn size(&self) -> usize {
        self.ctx.config.agent_count()
    }

    /// Start every agent on `tasks`; each runs until `cancel` fires
    pub fn spawn(&self, tasks: &mut JoinSet<()>, cancel: &CancellationToken) {
        let config = &self.ctx.config;

        for index in 0..config.depositors {
            let agent = Depositor::new(index, self.ctx.clone());
            tasks.spawn(agent.run(cancel.clone()));
        }
        for index in 0..config.withdrawers {
            let agent = Withdrawer::new(index, self.ctx.clone());
            tasks.spawn(agent.run(cancel.clone()));
        }
        for index in 0..config.transferers {
            let agent = Transferer::new(index, self.ctx.clone());
            tasks.spawn(agent.run(cancel.clone()));
        }

        info!(
            "spawned {} depositors, {} withdrawers, {} transferers",
            config.depositors, config.withdrawers, config.transferers
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::SimConfig;
    use crate::core::{Bank, RandomSource, SimContext};
    use crate::io::RecordingSink;
    use crate::types::Amount;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed list of draws, then answers the middle of each range
    pub struct ScriptedRandom {
        draws: Mutex<VecDeque<u64>>,
    }

    impl ScriptedRandom {
        pub fn new(draws: &[u64]) -> Self {
            Self {
                draws: Mutex::new(draws.iter().copied().collect()),
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn below(&self, bound: u64) -> u64 {
            let mut draws = self.draws.lock().unwrap();
            let draw = draws.pop_front().unwrap_or(bound / 2);
            assert!(
                bound == 0 || draw < bound,
                "scripted draw {} out of range {}",
                draw,
                bound
            );
            draw
        }
    }

    /// Context over a bank with the given opening balances and default config
    pub fn context(opening: &[Amount], random: ScriptedRandom) -> (SimContext, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let config = SimConfig {
            accounts: opening.len(),
            ..SimConfig::default()
        };
        let ctx = SimContext::new(
            Arc::new(Bank::with_opening_balances(opening)),
            Arc::new(random),
            sink.clone(),
            Arc::new(config),
        );
        (ctx, sink)
    }
}
