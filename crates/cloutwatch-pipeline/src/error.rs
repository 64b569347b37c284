use thiserror::Error;

use cloutwatch_twitch::TwitchError;

/// Fatal pipeline errors.
///
/// Only the roster fetch and the identity-resolution stage can fail the whole
/// invocation; per-account detail failures are recorded as
/// [`crate::DetailOutcome::Rejected`] and never escalate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The roster endpoint or an identity-resolution chunk request failed.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] TwitchError),
}
