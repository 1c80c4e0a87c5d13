use crate::config::SimConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Simulate concurrent depositors, withdrawers, transferers and auditors
#[derive(Parser, Debug)]
#[command(name = "bank-account-sim")]
#[command(about = "Simulate concurrent access to shared bank accounts", long_about = None)]
pub struct CliArgs {
    /// Number of accounts
    #[arg(
        long = "accounts",
        value_name = "COUNT",
        help = "Number of shared accounts (default: 2)"
    )]
    pub accounts: Option<usize>,

    /// Number of depositor agents
    #[arg(
        long = "depositors",
        value_name = "COUNT",
        help = "Number of depositor agents (default: 5)"
    )]
    pub depositors: Option<usize>,

    /// Number of withdrawer agents
    #[arg(
        long = "withdrawers",
        value_name = "COUNT",
        help = "Number of withdrawer agents (default: 10)"
    )]
    pub withdrawers: Option<usize>,

    /// Number of transferer agents
    #[arg(
        long = "transferers",
        value_name = "COUNT",
        help = "Number of transferer agents (default: 2)"
    )]
    pub transferers: Option<usize>,

    /// Largest single deposit
    #[arg(
        long = "max-deposit",
        value_name = "AMOUNT",
        help = "Largest single deposit (default: 600)"
    )]
    pub max_deposit: Option<u64>,

    /// Largest single withdrawal or transfer
    #[arg(
        long = "max-withdrawal",
        value_name = "AMOUNT",
        help = "Largest single withdrawal or transfer (default: 99)"
    )]
    pub max_withdrawal: Option<u64>,

    /// Seed for reproducible random draws
    #[arg(
        long = "seed",
        value_name = "SEED",
        help = "Seed the random source for reproducible draws"
    )]
    pub seed: Option<u64>,

    /// Stop after this many seconds
    #[arg(
        long = "duration-secs",
        value_name = "SECONDS",
        help = "Stop after this many seconds (default: run until Ctrl-C)"
    )]
    pub duration_secs: Option<u64>,

    /// Flagged transaction CSV log
    #[arg(
        long = "flag-log",
        value_name = "PATH",
        default_value = "transactions.csv",
        help = "Append-only CSV log of flagged transactions"
    )]
    pub flag_log: PathBuf,

    /// Transcript file mirroring console output
    #[arg(
        long = "transcript",
        value_name = "PATH",
        default_value = "simulationOutput.txt",
        help = "File that receives a copy of the console output"
    )]
    pub transcript: PathBuf,

    /// Console output only
    #[arg(long = "no-transcript", help = "Do not write a transcript file")]
    pub no_transcript: bool,
}

impl CliArgs {
    /// Create a SimConfig from CLI arguments
    ///
    /// Every option left unset keeps its default. The result is not
    /// validated here; `Simulation::new` does that.
    pub fn to_config(&self) -> SimConfig {
        let default = SimConfig::default();
        SimConfig {
            accounts: self.accounts.unwrap_or(default.accounts),
            depositors: self.depositors.unwrap_or(default.depositors),
            withdrawers: self.withdrawers.unwrap_or(default.withdrawers),
            transferers: self.transferers.unwrap_or(default.transferers),
            max_deposit: self.max_deposit.unwrap_or(default.max_deposit),
            max_withdrawal: self.max_withdrawal.unwrap_or(default.max_withdrawal),
            ..default
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }

    /// Transcript path, unless disabled
    pub fn transcript_path(&self) -> Option<&PathBuf> {
        (!self.no_transcript).then_some(&self.transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_no_options_gives_defaults() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        assert_eq!(parsed.to_config(), SimConfig::default());
        assert_eq!(parsed.duration(), None);
        assert_eq!(parsed.seed, None);
        assert_eq!(parsed.flag_log, PathBuf::from("transactions.csv"));
        assert_eq!(
            parsed.transcript_path(),
            Some(&PathBuf::from("simulationOutput.txt"))
        );
    }

    #[rstest]
    #[case::accounts(&["program", "--accounts", "4"], |c: &SimConfig| c.accounts == 4)]
    #[case::depositors(&["program", "--depositors", "1"], |c: &SimConfig| c.depositors == 1)]
    #[case::withdrawers(&["program", "--withdrawers", "0"], |c: &SimConfig| c.withdrawers == 0)]
    #[case::transferers(&["program", "--transferers", "3"], |c: &SimConfig| c.transferers == 3)]
    #[case::max_deposit(
        &["program", "--max-deposit", "1000"],
        |c: &SimConfig| c.max_deposit == 1000
    )]
    #[case::max_withdrawal(
        &["program", "--max-withdrawal", "50"],
        |c: &SimConfig| c.max_withdrawal == 50
    )]
    fn test_config_overrides(#[case] args: &[&str], #[case] check: fn(&SimConfig) -> bool) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert!(check(&parsed.to_config()));
    }

    #[test]
    fn test_run_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--seed",
            "42",
            "--duration-secs",
            "30",
            "--flag-log",
            "flags.csv",
            "--no-transcript",
        ])
        .unwrap();

        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.duration(), Some(Duration::from_secs(30)));
        assert_eq!(parsed.flag_log, PathBuf::from("flags.csv"));
        assert_eq!(parsed.transcript_path(), None);
    }

    // Error handling tests
    #[rstest]
    #[case::negative_accounts(&["program", "--accounts", "-1"])]
    #[case::non_numeric_seed(&["program", "--seed", "abc"])]
    #[case::unknown_flag(&["program", "--strategy", "sync"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
