//! Freeze-all-accounts audit snapshots
//!
//! An audit tries every account lock in index order without waiting. If any
//! lock is busy, everything acquired so far is released at once and the
//! cycle is skipped; the auditor tries again after its next pause. Holding
//! every lock at once means no balance can change mid-read, so a successful
//! snapshot is consistent with respect to all mutations.
//!
//! Because no lock is ever waited for, auditors cannot deadlock with agents
//! and never hold accounts hostage while queueing for a busy one.
//!
//! The two auditor kinds run independently with separate pacing and
//! separate `last_seen` counters. They may both succeed, both fail, or
//! interleave; each report is self-consistent on its own.

use super::account::AccountGuard;
use super::bank::Bank;
use super::context::SimContext;
use crate::types::{Amount, AuditReport, AuditorKind, EventKind, SequenceNumber};
use log::{debug, info};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Balances and sequence counter read while every account lock was held
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSnapshot {
    pub sequence: SequenceNumber,
    pub balances: Vec<Amount>,
}

/// Acquires all account locks together for a snapshot
pub struct AuditCoordinator;

impl AuditCoordinator {
    /// Take a consistent snapshot, or `None` if any account is busy
    pub fn try_snapshot(bank: &Bank) -> Option<AuditSnapshot> {
        let guards = Self::try_lock_all(bank)?;

        let snapshot = AuditSnapshot {
            sequence: bank.sequencer().current(),
            balances: guards.iter().map(AccountGuard::balance).collect(),
        };

        Self::release(guards);
        Some(snapshot)
    }

    /// Spawn each auditor as its own task on `tasks`
    pub fn spawn_auditors(ctx: &SimContext, tasks: &mut JoinSet<()>, cancel: &CancellationToken) {
        for kind in [AuditorKind::Internal, AuditorKind::Treasury] {
            let auditor = Auditor::new(kind);
            tasks.spawn(auditor.run(ctx.clone(), cancel.clone()));
        }
    }

    fn try_lock_all(bank: &Bank) -> Option<Vec<AccountGuard<'_>>> {
        let mut guards = Vec::with_capacity(bank.len());
        for account in bank.accounts() {
            match account.try_lock() {
                Some(guard) => guards.push(guard),
                None => {
                    Self::release(guards);
                    return None;
                }
            }
        }
        Some(guards)
    }

    /// Release in reverse acquisition order
    fn release(mut guards: Vec<AccountGuard<'_>>) {
        while let Some(guard) = guards.pop() {
            drop(guard);
        }
    }
}

/// One periodic auditor and its transaction-volume bookkeeping
#[derive(Debug, Clone)]
pub struct Auditor {
    kind: AuditorKind,
    /// Sequence counter at this auditor's previous successful audit
    last_seen: SequenceNumber,
}

impl Auditor {
    pub fn new(kind: AuditorKind) -> Self {
        Self { kind, last_seen: 0 }
    }

    pub fn last_seen(&self) -> SequenceNumber {
        self.last_seen
    }

    /// Attempt one audit cycle
    ///
    /// # Returns
    ///
    /// * `Some(AuditReport)` if every lock was acquired; `last_seen` advances
    /// * `None` if an account was busy; nothing changes
    pub fn audit_once(&mut self, bank: &Bank) -> Option<AuditReport> {
        let snapshot = AuditCoordinator::try_snapshot(bank)?;
        let report = AuditReport {
            auditor: self.kind,
            sequence: snapshot.sequence,
            transactions_since_last: snapshot.sequence - self.last_seen,
            balances: snapshot.balances,
        };
        self.last_seen = snapshot.sequence;
        Some(report)
    }

    /// Audit, pause, repeat until `cancel` fires
    pub async fn run(mut self, ctx: SimContext, cancel: CancellationToken) {
        let period = ctx.config.pacing.audit_period(self.kind);
        info!("{:?} auditor started", self.kind);

        while !cancel.is_cancelled() {
            match self.audit_once(&ctx.bank) {
                Some(report) => {
                    ctx.emit(EventKind::Audit(report));
                }
                None => debug!("{:?} audit skipped: an account was busy", self.kind),
            }

            if !ctx.pause(period, &cancel).await {
                break;
            }
        }

        info!("{:?} auditor stopped", self.kind);
    }
}
