//! I/O module
//!
//! Event sinks that turn simulation events into output.
//!
//! # Components
//!
//! - `transcript` - Human-readable console/file transcript
//! - `flagged_log` - Append-only CSV log of flagged transactions
//! - `router` - Routes events to the transcript and, when flagged, the CSV log
//! - `memory` - In-memory recording for tests and replay

pub mod flagged_log;
pub mod memory;
pub mod router;
pub mod transcript;

pub use flagged_log::{FlaggedRow, FlaggedTransactionLog};
pub use memory::RecordingSink;
pub use router::EventRouter;
pub use transcript::{render, render_header, TranscriptSink};
