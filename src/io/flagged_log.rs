//! Append-only CSV log of flagged transactions
//!
//! Deposits and withdrawals above their flag thresholds are appended to a
//! CSV file, one row per transaction, with columns:
//! `agent, transaction_type, amount, timestamp, sequence`.
//!
//! Timestamps are rendered at a fixed UTC-05:00 offset (EST, no daylight
//! saving) so rows from different runs compare directly. The header row is
//! written only when the file is empty, so restarts keep appending.

use crate::core::EventSink;
use crate::types::{EventKind, SequenceNumber, SimError, SimEvent};
use chrono::{DateTime, FixedOffset, Utc};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Offset of Eastern Standard Time west of UTC
const EST_OFFSET_SECS: i32 = 5 * 3600;

const HEADER: [&str; 5] = [
    "agent",
    "transaction_type",
    "amount",
    "timestamp",
    "sequence",
];

/// One row of the flagged transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedRow {
    pub agent: String,
    pub transaction_type: &'static str,
    pub amount: u64,
    pub timestamp: String,
    pub sequence: SequenceNumber,
}

impl FlaggedRow {
    /// Build the row for a flagged event; `None` for anything else
    pub fn from_event(event: &SimEvent, zone: &FixedOffset) -> Option<Self> {
        if !event.is_flagged() {
            return None;
        }
        let (agent, transaction_type, amount, sequence) = match &event.kind {
            EventKind::Deposit {
                agent,
                amount,
                sequence,
                ..
            } => (agent, "deposit", *amount, *sequence),
            EventKind::Withdrawal {
                agent,
                amount,
                sequence,
                ..
            } => (agent, "withdrawal", *amount, *sequence),
            _ => return None,
        };

        Some(Self {
            agent: agent.to_string(),
            transaction_type,
            amount,
            timestamp: format_est(&event.timestamp, zone),
            sequence,
        })
    }
}

fn format_est(timestamp: &DateTime<Utc>, zone: &FixedOffset) -> String {
    timestamp
        .with_timezone(zone)
        .format("%Y-%m-%d %H:%M:%S EST")
        .to_string()
}

/// Flagged transaction log over any writer
///
/// Rows are flushed as soon as they are written so a killed process loses
/// at most the row being written.
pub struct FlaggedTransactionLog<W: Write = File> {
    writer: Mutex<Writer<W>>,
    zone: FixedOffset,
}

impl FlaggedTransactionLog<File> {
    /// Open `path` for appending, creating it with a header if needed
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be opened or inspected and
    /// `SimError::Csv` if the header cannot be written.
    pub fn open(path: &Path) -> Result<Self, SimError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;
        Self::from_writer(file, needs_header)
    }
}

impl<W: Write> FlaggedTransactionLog<W> {
    /// Wrap `writer`, writing the header row first when `write_header` is set
    pub fn from_writer(writer: W, write_header: bool) -> Result<Self, SimError> {
        let zone = FixedOffset::west_opt(EST_OFFSET_SECS)
            .ok_or_else(|| SimError::invalid_config("EST offset out of range"))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        if write_header {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            writer: Mutex::new(writer),
            zone,
        })
    }

    /// Recover the underlying writer, flushing pending rows
    pub fn into_inner(self) -> Result<W, SimError> {
        let writer = self
            .writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.into_inner().map_err(|e| SimError::Io {
            message: e.error().to_string(),
        })
    }
}

impl<W: Write + Send> EventSink for FlaggedTransactionLog<W> {
    /// Append a row for flagged events; other events are ignored
    fn record(&self, event: &SimEvent) -> Result<(), SimError> {
        let Some(row) = FlaggedRow::from_event(event, &self.zone) else {
            return Ok(());
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.serialize(&row)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, AgentId};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn at_noon_utc(kind: EventKind) -> SimEvent {
        SimEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 5).unwrap(),
            kind,
        }
    }

    fn flagged_deposit(sequence: SequenceNumber) -> SimEvent {
        at_noon_utc(EventKind::Deposit {
            agent: AgentId::depositor(2),
            account: AccountId(0),
            amount: 512,
            balance: 512,
            sequence,
            flagged: true,
        })
    }

    fn flagged_withdrawal() -> SimEvent {
        at_noon_utc(EventKind::Withdrawal {
            agent: AgentId::withdrawer(7),
            account: AccountId(1),
            amount: 95,
            balance: 5,
            sequence: 9,
            flagged: true,
        })
    }

    #[test]
    fn test_row_uses_fixed_est_offset() {
        let zone = FixedOffset::west_opt(EST_OFFSET_SECS).unwrap();
        let row = FlaggedRow::from_event(&flagged_deposit(4), &zone).unwrap();
        assert_eq!(
            row,
            FlaggedRow {
                agent: "DT2".to_string(),
                transaction_type: "deposit",
                amount: 512,
                timestamp: "2024-03-09 07:00:05 EST".to_string(),
                sequence: 4,
            }
        );
    }

    #[test]
    fn test_unflagged_events_are_skipped() {
        let log = FlaggedTransactionLog::from_writer(Vec::new(), false).unwrap();
        let plain = at_noon_utc(EventKind::Deposit {
            agent: AgentId::depositor(0),
            account: AccountId(0),
            amount: 10,
            balance: 10,
            sequence: 1,
            flagged: false,
        });
        log.record(&plain).unwrap();
        assert!(log.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_writes_header_and_rows() {
        let log = FlaggedTransactionLog::from_writer(Vec::new(), true).unwrap();
        log.record(&flagged_deposit(1)).unwrap();
        log.record(&flagged_withdrawal()).unwrap();

        let output = String::from_utf8(log.into_inner().unwrap()).unwrap();
        assert_eq!(
            output,
            "agent,transaction_type,amount,timestamp,sequence\n\
             DT2,deposit,512,2024-03-09 07:00:05 EST,1\n\
             WT7,withdrawal,95,2024-03-09 07:00:05 EST,9\n"
        );
    }

    #[test]
    fn test_reopening_appends_without_second_header() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("transactions.csv");

        FlaggedTransactionLog::open(&path)
            .unwrap()
            .record(&flagged_deposit(1))
            .unwrap();
        FlaggedTransactionLog::open(&path)
            .unwrap()
            .record(&flagged_deposit(2))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "agent,transaction_type,amount,timestamp,sequence");
        assert!(lines[1].ends_with(",1"));
        assert!(lines[2].ends_with(",2"));
    }
}
