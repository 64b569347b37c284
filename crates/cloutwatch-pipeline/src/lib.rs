//! The fan-out aggregation pipeline.
//!
//! Turns one chat-room lookup into a bounded batch of identity-resolution
//! calls and an unbounded batch of per-account detail calls, merges partial
//! failures, and reports aggregate success/failure statistics. Three stages,
//! strictly forward: roster → identity resolution → follower-detail
//! aggregation.

pub mod error;
pub mod pipeline;
pub mod types;

pub use error::PipelineError;
pub use pipeline::{aggregate_details, resolve_identities, run_pipeline};
pub use types::{AccountDetail, AccountId, DetailOutcome, PipelineReport, RunStats};
