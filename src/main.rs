//! Bank Account Simulation CLI
//!
//! Runs depositors, withdrawers, transferers and two auditors against a
//! shared set of accounts until Ctrl-C (or `--duration-secs`).
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --duration-secs 30 --seed 7
//! cargo run -- --accounts 4 --transferers 4 --no-transcript
//! RUST_LOG=debug cargo run
//! ```
//!
//! Transactions are printed to stdout and mirrored to the transcript file.
//! Flagged deposits and withdrawals are appended to the flagged CSV log.
//!
//! # Exit Codes
//!
//! - 0: Simulation stopped cleanly
//! - 1: Error (invalid configuration, output file not writable, etc.)

use bank_account_sim::cli::{self, CliArgs};
use bank_account_sim::core::{EventSink, RandomSource, SeededRandom, ThreadRandom};
use bank_account_sim::io::{EventRouter, FlaggedTransactionLog, TranscriptSink};
use bank_account_sim::{SimError, Simulation};
use log::{error, info};
use std::process;
use std::sync::Arc;

fn main() {
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        error!("simulation failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), SimError> {
    let config = args.to_config();
    config.validate()?;

    let random: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => {
            info!("using seeded random source ({})", seed);
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRandom),
    };

    let transcript = match args.transcript_path() {
        Some(path) => TranscriptSink::stdout_and_file(path, &config)?,
        None => TranscriptSink::stdout(&config),
    };
    transcript.write_header()?;

    let flagged = FlaggedTransactionLog::open(&args.flag_log)?;
    let transcript: Arc<dyn EventSink> = Arc::new(transcript);
    let flagged: Arc<dyn EventSink> = Arc::new(flagged);
    let sink: Arc<dyn EventSink> = Arc::new(EventRouter::new(transcript, Some(flagged)));

    let simulation = Simulation::new(config, random, sink)?;
    simulation.run_blocking(args.duration())?;
    Ok(())
}
