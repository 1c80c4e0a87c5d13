//! Global transaction numbering
//!
//! The sequencer is always taken *after* any account locks an operation
//! needs and never takes another lock itself. Because every committing
//! operation draws its number while still holding its account locks,
//! sequence order equals commit order.

use crate::types::SequenceNumber;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues strictly increasing, globally unique transaction numbers
///
/// Numbers start at 1. The counter is a single atomic word, so `next` is
/// lock-free and cannot take part in a lock-order inversion.
#[derive(Debug, Default)]
pub struct TransactionSequencer {
    counter: AtomicU64,
}

impl TransactionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next transaction number
    pub fn next(&self) -> SequenceNumber {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of transactions committed so far (the last number issued)
    pub fn current(&self) -> SequenceNumber {
        self.counter.load(Ordering::SeqCst)
    }
}
