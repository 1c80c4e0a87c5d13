//! Human-readable simulation transcript
//!
//! Renders every event as console text and writes it to any number of
//! outputs at once, normally stdout plus a transcript file.

use crate::config::SimConfig;
use crate::core::EventSink;
use crate::types::{Amount, AuditReport, EventKind, SimError, SimEvent};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

const RULE: &str =
    "********************************************************************************************";

/// Column headings printed once at startup
pub fn render_header() -> String {
    format!(
        "*** Simulation Begins...\n{:<35} {:<45} {:<40} {:<40}\n{:<35} {:<45} {:<40} {:<40}",
        "Deposit Agents",
        "Withdrawal agents",
        "Balances",
        "Transaction number",
        "----------------",
        "-------------------",
        "----------",
        "---------------------"
    )
}

/// Render one event as one or more lines of text (no trailing newline)
pub fn render(event: &SimEvent, deposit_limit: Amount, withdrawal_limit: Amount) -> String {
    match &event.kind {
        EventKind::Deposit {
            agent,
            account,
            amount,
            balance,
            sequence,
            flagged,
        } => {
            let mut text = format!(
                "Agent {} deposits ${:<3} into {:<8} (+) {} balance is ${:<10} #{}",
                agent, amount, account, account, balance, sequence
            );
            if *flagged {
                text.push_str(&format!(
                    "\n\n***FLAGGED TRANSACTION*** Agent {} made a deposit in excess of ${}.00 USD - See Flagged Transaction Log\n",
                    agent, deposit_limit
                ));
            }
            text
        }
        EventKind::Withdrawal {
            agent,
            account,
            amount,
            balance,
            sequence,
            flagged,
        } => {
            let mut text = format!(
                "{:30}Agent {} withdraws ${:<2} from {:<8} (-) {} balance is ${:<10} #{}",
                "", agent, amount, account, account, balance, sequence
            );
            if *flagged {
                text.push_str(&format!(
                    "\n\n***FLAGGED TRANSACTION*** Agent {} made a withdrawal in excess of ${}.00 USD - See Flagged Transaction Log\n",
                    agent, withdrawal_limit
                ));
            }
            text
        }
        EventKind::Transfer {
            agent,
            from,
            to,
            amount,
            from_balance,
            to_balance,
            sequence,
        } => format!(
            "\nTRANSFER --> Agent {} transferring ${} from {} to {} -- {} balance is now ${} #{}\nTRANSFER COMPLETE --> Account {} balance now ${}",
            agent, amount, from, to, from, from_balance, sequence, to, to_balance
        ),
        EventKind::InsufficientFunds {
            agent,
            from,
            to: None,
            amount,
            balance,
        } => format!(
            "\nAgent {} attempts to withdraw ${:<3} from: {} (******) WITHDRAWAL BLOCKED - INSUFFICIENT FUNDS!!! Balance only ${}\n",
            agent, amount, from, balance
        ),
        EventKind::InsufficientFunds {
            agent,
            from,
            to: Some(to),
            amount,
            balance,
        } => format!(
            "\nAgent {} attempts to transfer ${:<3} from: {} to {} (******) TRANSFER BLOCKED - INSUFFICIENT FUNDS!!! Balance only ${}\n",
            agent, amount, from, to, balance
        ),
        EventKind::Audit(report) => render_audit(report),
    }
}

fn render_audit(report: &AuditReport) -> String {
    let auditor = report.auditor;
    let mut text = format!(
        "\n\n{}\n\n\n{} beginning...\n\nThe total number of transactions since the last {} is: {}\n",
        RULE,
        auditor.title(),
        auditor.audit_name(),
        report.transactions_since_last
    );
    for (index, balance) in report.balances.iter().enumerate() {
        text.push_str(&format!(
            "\n      {} FINDS CURRENT ACCOUNT BALANCE FOR JA-{} TO BE: ${}",
            auditor.auditor_name(),
            index,
            balance
        ));
    }
    text.push_str(&format!(
        "\n\n{} complete...\n\n\n{}\n",
        auditor.title(),
        RULE
    ));
    text
}

/// Writes rendered events to every configured output
///
/// A failing output does not stop the others from being written; the first
/// error is returned after all outputs were attempted.
pub struct TranscriptSink {
    outputs: Mutex<Vec<Box<dyn Write + Send>>>,
    deposit_limit: Amount,
    withdrawal_limit: Amount,
}

impl TranscriptSink {
    pub fn new(outputs: Vec<Box<dyn Write + Send>>, config: &SimConfig) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            deposit_limit: config.flag_deposit_threshold,
            withdrawal_limit: config.flag_withdrawal_threshold,
        }
    }

    /// Console only
    pub fn stdout(config: &SimConfig) -> Self {
        Self::new(vec![Box::new(io::stdout())], config)
    }

    /// Console plus a transcript file, truncated at start
    pub fn stdout_and_file(path: &Path, config: &SimConfig) -> Result<Self, SimError> {
        let file = File::create(path)?;
        let outputs: Vec<Box<dyn Write + Send>> = vec![Box::new(io::stdout()), Box::new(file)];
        Ok(Self::new(outputs, config))
    }

    /// Write the startup banner and column headings
    pub fn write_header(&self) -> Result<(), SimError> {
        self.write_text(&render_header())
    }

    fn write_text(&self, text: &str) -> Result<(), SimError> {
        let mut outputs = self
            .outputs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut first_error = None;
        for output in outputs.iter_mut() {
            let result = writeln!(output, "{}", text).and_then(|()| output.flush());
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl EventSink for TranscriptSink {
    fn record(&self, event: &SimEvent) -> Result<(), SimError> {
        self.write_text(&render(event, self.deposit_limit, self.withdrawal_limit))
    }
}
