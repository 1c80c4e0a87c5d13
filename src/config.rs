//! Simulation configuration
//!
//! Fixed at process start; nothing reads it mutably afterwards. Defaults
//! reproduce the classic two-account scenario: five depositors, ten
//! withdrawers, two transferers and the two auditors.

use crate::core::transfer::Backoff;
use crate::types::{Amount, AuditorKind, SimError};
use std::time::Duration;

/// Upper bounds for the random pauses between loop iterations
///
/// Each agent sleeps a uniformly random duration in `[0, max)` after every
/// iteration. These are pacing only; correctness never depends on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    pub depositor: Duration,
    pub withdrawer: Duration,
    pub transferer: Duration,
    /// First delay after a contended transfer lock attempt
    pub transfer_retry: Duration,
    /// Cap for the doubling transfer retry delay
    pub transfer_retry_max: Duration,
    pub internal_audit: Duration,
    pub treasury_audit: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            depositor: Duration::from_millis(1700),
            withdrawer: Duration::from_millis(200),
            transferer: Duration::from_millis(2500),
            transfer_retry: Duration::from_millis(100),
            transfer_retry_max: Duration::from_millis(800),
            internal_audit: Duration::from_millis(4500),
            treasury_audit: Duration::from_millis(5500),
        }
    }
}

impl PacingConfig {
    /// Every interval divided by `factor`, for fast test runs
    pub fn scaled_down(factor: u32) -> Self {
        let factor = factor.max(1);
        let default = Self::default();
        Self {
            depositor: default.depositor / factor,
            withdrawer: default.withdrawer / factor,
            transferer: default.transferer / factor,
            transfer_retry: default.transfer_retry / factor,
            transfer_retry_max: default.transfer_retry_max / factor,
            internal_audit: default.internal_audit / factor,
            treasury_audit: default.treasury_audit / factor,
        }
    }

    pub fn audit_period(&self, kind: AuditorKind) -> Duration {
        match kind {
            AuditorKind::Internal => self.internal_audit,
            AuditorKind::Treasury => self.treasury_audit,
        }
    }

    pub fn transfer_backoff(&self) -> Backoff {
        Backoff::exponential(self.transfer_retry, self.transfer_retry_max)
    }
}

/// Account table size, agent counts and transaction limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub accounts: usize,
    pub depositors: usize,
    pub withdrawers: usize,
    pub transferers: usize,
    /// Deposits are drawn from `[1, max_deposit]`
    pub max_deposit: Amount,
    /// Withdrawals and transfers are drawn from `[1, max_withdrawal]`
    pub max_withdrawal: Amount,
    /// Deposits strictly above this are flagged
    pub flag_deposit_threshold: Amount,
    /// Withdrawals strictly above this are flagged
    pub flag_withdrawal_threshold: Amount,
    pub pacing: PacingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            accounts: 2,
            depositors: 5,
            withdrawers: 10,
            transferers: 2,
            max_deposit: 600,
            max_withdrawal: 99,
            flag_deposit_threshold: 450,
            flag_withdrawal_threshold: 90,
            pacing: PacingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Number of agent tasks, auditors excluded
    pub fn agent_count(&self) -> usize {
        self.depositors + self.withdrawers + self.transferers
    }

    /// One worker per agent plus one per auditor
    pub fn pool_size(&self) -> usize {
        self.agent_count() + 2
    }

    /// Reject configurations that cannot run
    ///
    /// # Errors
    ///
    /// - no accounts
    /// - a zero deposit or withdrawal cap
    /// - transferers with fewer than two accounts (a transfer would target
    ///   its own source)
    pub fn validate(&self) -> Result<(), SimError> {
        if self.accounts == 0 {
            return Err(SimError::invalid_config("no accounts configured"));
        }
        if self.max_deposit == 0 {
            return Err(SimError::invalid_config("max deposit is zero"));
        }
        if self.max_withdrawal == 0 {
            return Err(SimError::invalid_config("max withdrawal is zero"));
        }
        if self.transferers > 0 && self.accounts < 2 {
            return Err(SimError::invalid_config(
                "transferers need at least two accounts",
            ));
        }
        Ok(())
    }

    pub fn is_flagged_deposit(&self, amount: Amount) -> bool {
        amount > self.flag_deposit_threshold
    }

    pub fn is_flagged_withdrawal(&self, amount: Amount) -> bool {
        amount > self.flag_withdrawal_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.accounts, 2);
        assert_eq!(config.agent_count(), 17);
        assert_eq!(config.pool_size(), 19);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::no_accounts(SimConfig { accounts: 0, ..SimConfig::default() })]
    #[case::zero_deposit_cap(SimConfig { max_deposit: 0, ..SimConfig::default() })]
    #[case::zero_withdrawal_cap(SimConfig { max_withdrawal: 0, ..SimConfig::default() })]
    #[case::transfers_on_one_account(SimConfig { accounts: 1, ..SimConfig::default() })]
    fn test_invalid_configs(#[case] config: SimConfig) {
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_single_account_without_transferers_is_valid() {
        let config = SimConfig {
            accounts: 1,
            transferers: 0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::at_threshold(450, false)]
    #[case::above(451, true)]
    #[case::max(600, true)]
    fn test_deposit_flag_is_strictly_above(#[case] amount: Amount, #[case] flagged: bool) {
        assert_eq!(SimConfig::default().is_flagged_deposit(amount), flagged);
    }

    #[rstest]
    #[case::at_threshold(90, false)]
    #[case::above(91, true)]
    fn test_withdrawal_flag_is_strictly_above(#[case] amount: Amount, #[case] flagged: bool) {
        assert_eq!(SimConfig::default().is_flagged_withdrawal(amount), flagged);
    }

    #[test]
    fn test_scaled_pacing() {
        let pacing = PacingConfig::scaled_down(100);
        assert_eq!(pacing.depositor, Duration::from_millis(17));
        assert_eq!(pacing.transfer_retry, Duration::from_millis(1));
        assert_eq!(
            pacing.audit_period(AuditorKind::Treasury),
            Duration::from_millis(55)
        );
        assert_eq!(PacingConfig::scaled_down(0), PacingConfig::default());
    }
}
