//! Satoshi provenance tracking under first-in-first-out allocation.
//!
//! Positions are expressed in three coordinate frames:
//!
//! * **output-local**: `[0, value)` within a single output;
//! * **transaction-relative**: the outputs of a transaction laid out
//!   consecutively in index order, and likewise its inputs;
//! * **absolute**: ordinal numbers in issuance order, anchored to each
//!   coinbase at `first_ordinal(height)`.
//!
//! [`ProvenanceTracker`] re-bases ranges between these frames while walking
//! the spend graph backwards; [`TrackSession`] carries the roadmap of pending
//! work items and the segments resolved so far for one run.

pub mod error;
pub mod session;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testutils;

pub use error::{Inconsistency, TrackError, TrackResult};
pub use session::{Progress, TrackSession, WorkItem};
pub use tracker::ProvenanceTracker;
