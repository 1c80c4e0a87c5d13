//! Simulation wiring
//!
//! Builds the bank and the shared context, starts every agent and both
//! auditors, and tears everything down when shutdown is requested.
//!
//! # Architecture
//!
//! ```text
//! Simulation
//!     ├── SimContext (Arc<Bank>, RandomSource, EventSink, SimConfig)
//!     ├── AgentPool
//!     │   ├── Depositor × depositors
//!     │   ├── Withdrawer × withdrawers
//!     │   └── Transferer × transferers ── TransferCoordinator
//!     └── AuditCoordinator
//!         ├── Auditor (Internal)
//!         └── Auditor (Treasury)
//! ```
//!
//! The worker runtime gets one thread per agent and auditor, so every unit
//! can make progress in parallel.

use crate::agents::AgentPool;
use crate::config::SimConfig;
use crate::core::{AuditCoordinator, Bank, EventSink, RandomSource, SimContext};
use crate::types::{Amount, SimError};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A configured, not yet running simulation
pub struct Simulation {
    ctx: SimContext,
}

impl Simulation {
    /// Validate `config` and open all accounts at zero
    pub fn new(
        config: SimConfig,
        random: Arc<dyn RandomSource>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SimError> {
        let bank = Bank::new(config.accounts);
        Self::with_bank(config, bank, random, sink)
    }

    /// Validate `config` and run against a pre-built bank
    ///
    /// The bank must hold exactly `config.accounts` accounts.
    pub fn with_bank(
        config: SimConfig,
        bank: Bank,
        random: Arc<dyn RandomSource>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if bank.len() != config.accounts {
            return Err(SimError::invalid_config(format!(
                "bank holds {} accounts but {} are configured",
                bank.len(),
                config.accounts
            )));
        }

        Ok(Self {
            ctx: SimContext::new(Arc::new(bank), random, sink, Arc::new(config)),
        })
    }

    pub fn bank(&self) -> &Arc<Bank> {
        &self.ctx.bank
    }

    pub fn config(&self) -> &SimConfig {
        &self.ctx.config
    }

    /// Run every agent and auditor until `cancel` fires
    ///
    /// Waits for every task to stop, then returns the final balances.
    pub async fn run(&self, cancel: CancellationToken) -> Vec<Amount> {
        let mut tasks = JoinSet::new();

        AgentPool::new(self.ctx.clone()).spawn(&mut tasks, &cancel);
        AuditCoordinator::spawn_auditors(&self.ctx, &mut tasks, &cancel);
        info!(
            "simulation running with {} accounts and {} workers",
            self.ctx.bank.len(),
            self.ctx.config.pool_size()
        );

        cancel.cancelled().await;
        info!("shutdown requested, waiting for agents to finish");

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!("Task panicked: {:?}", e);
            }
        }

        let balances = self.ctx.bank.balances().await;
        info!(
            "simulation stopped after {} transactions, final balances {:?}",
            self.ctx.bank.sequencer().current(),
            balances
        );
        balances
    }

    /// Build a worker runtime and run until Ctrl-C or `duration` elapses
    ///
    /// With no duration the simulation only stops on Ctrl-C.
    pub fn run_blocking(self, duration: Option<Duration>) -> Result<Vec<Amount>, SimError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.ctx.config.pool_size())
            .enable_all()
            .build()
            .map_err(|e| SimError::Runtime {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async move {
            let cancel = CancellationToken::new();
            tokio::spawn(shutdown_on_signal(duration, cancel.clone()));
            Ok(self.run(cancel).await)
        })
    }
}

async fn shutdown_on_signal(duration: Option<Duration>, cancel: CancellationToken) {
    match duration {
        Some(duration) => {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Ctrl-C handler unavailable: {}", e);
                        tokio::time::sleep(duration).await;
                    }
                }
                _ = tokio::time::sleep(duration) => info!("run duration of {:?} elapsed", duration),
            }
        }
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl-C handler unavailable, running until killed: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacingConfig;
    use crate::core::SeededRandom;
    use crate::io::RecordingSink;

    fn fast_config() -> SimConfig {
        SimConfig {
            pacing: PacingConfig::scaled_down(100),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            accounts: 0,
            ..SimConfig::default()
        };
        let result = Simulation::new(
            config,
            Arc::new(SeededRandom::new(1)),
            Arc::new(RecordingSink::new()),
        );
        assert!(matches!(result, Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn test_bank_size_must_match_config() {
        let result = Simulation::with_bank(
            SimConfig::default(),
            Bank::new(3),
            Arc::new(SeededRandom::new(1)),
            Arc::new(RecordingSink::new()),
        );
        assert!(matches!(result, Err(SimError::InvalidConfig { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_stops_on_cancel_and_reports_balances() {
        let sink = Arc::new(RecordingSink::new());
        let random = Arc::new(SeededRandom::new(9));
        let config = fast_config();
        let simulation = Simulation::new(config, random, sink.clone()).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let balances = tokio::time::timeout(Duration::from_secs(10), simulation.run(cancel))
            .await
            .expect("simulation did not stop");

        assert_eq!(balances.len(), 2);
        assert!(!sink.events().is_empty());
        assert_eq!(balances, simulation.bank().balances().await);
    }

    #[test]
    fn test_run_blocking_with_duration() {
        let simulation = Simulation::new(
            fast_config(),
            Arc::new(SeededRandom::new(3)),
            Arc::new(RecordingSink::new()),
        )
        .unwrap();

        let balances = simulation
            .run_blocking(Some(Duration::from_millis(100)))
            .unwrap();
        assert_eq!(balances.len(), 2);
    }
}
