//! Error types for the bank account simulation
//!
//! Insufficient funds and lock contention are ordinary outcomes of the
//! simulation and are reported through result enums, not through this type.
//!
//! # Error Categories
//!
//! - **Addressing Errors**: unknown account index, transfer to the same account,
//!   zero amounts
//! - **Replay Errors**: a recorded event stream that does not replay cleanly
//! - **Configuration Errors**: values that cannot drive a simulation
//! - **Output Errors**: I/O and CSV failures in the event sinks
//! - **Runtime Errors**: failure to build the worker runtime

use super::account::AccountId;
use thiserror::Error;

/// Main error type for the simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Account index outside the account table
    #[error("Unknown account {account}: the bank holds {count} accounts")]
    UnknownAccount {
        /// The requested account
        account: AccountId,
        /// Number of accounts in the table
        count: usize,
    },

    /// Transfer whose source and destination are the same account
    ///
    /// Both locks of a transfer are taken with non-blocking attempts, so a
    /// same-account transfer could never acquire its second lock.
    #[error("Transfer source and destination are both {account}")]
    SameAccount {
        /// The account named twice
        account: AccountId,
    },

    /// Deposits, withdrawals and transfers move a positive amount
    #[error("Transaction amount must be positive")]
    ZeroAmount,

    /// A serialized replay of committed events disagrees with itself
    #[error("Replay diverged at transaction {sequence}: {message}")]
    Replay {
        /// Sequence number of the offending event
        sequence: u64,
        /// What went wrong
        message: String,
    },

    /// Configuration rejected at startup
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },

    /// I/O error while writing simulation output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV error while writing the flagged transaction log
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error
        message: String,
    },

    /// The worker runtime could not be created
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },
}

impl From<std::io::Error> for SimError {
    fn from(error: std::io::Error) -> Self {
        SimError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SimError {
    fn from(error: csv::Error) -> Self {
        SimError::Csv {
            message: error.to_string(),
        }
    }
}

impl SimError {
    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId, count: usize) -> Self {
        SimError::UnknownAccount { account, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unknown_account(
        SimError::UnknownAccount { account: AccountId(7), count: 2 },
        "Unknown account JA-7: the bank holds 2 accounts"
    )]
    #[case::same_account(
        SimError::SameAccount { account: AccountId(1) },
        "Transfer source and destination are both JA-1"
    )]
    #[case::zero_amount(SimError::ZeroAmount, "Transaction amount must be positive")]
    #[case::replay(
        SimError::Replay { sequence: 9, message: "expected transaction 8".to_string() },
        "Replay diverged at transaction 9: expected transaction 8"
    )]
    #[case::invalid_config(
        SimError::invalid_config("no accounts configured"),
        "Invalid configuration: no accounts configured"
    )]
    #[case::io(
        SimError::Io { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::runtime(
        SimError::Runtime { message: "no threads".to_string() },
        "Runtime error: no threads"
    )]
    fn test_error_display(#[case] error: SimError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: SimError = io_error.into();
        assert!(matches!(error, SimError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_unknown_account_helper() {
        assert_eq!(
            SimError::unknown_account(AccountId(3), 2),
            SimError::UnknownAccount {
                account: AccountId(3),
                count: 2
            }
        );
    }
}
