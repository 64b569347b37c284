//! The three pipeline stages and the driver that chains them.

use futures::future;

use cloutwatch_twitch::{TwitchClient, MAX_LOGINS_PER_REQUEST};

use crate::error::PipelineError;
use crate::types::{AccountDetail, AccountId, DetailOutcome, PipelineReport, RunStats};

/// Resolves usernames to account identifiers in chunks of at most
/// [`MAX_LOGINS_PER_REQUEST`], all chunk lookups dispatched concurrently.
///
/// The stage is all-or-nothing: the first chunk failure sinks the group and
/// results from sibling chunks are discarded. Resolved identifiers are
/// flattened into one list with no ordering guarantee; logins that do not
/// resolve are silently absent.
///
/// # Errors
///
/// Returns [`PipelineError::Upstream`] if any chunk request fails.
pub async fn resolve_identities(
    client: &TwitchClient,
    usernames: &[String],
) -> Result<Vec<AccountId>, PipelineError> {
    let lookups = usernames
        .chunks(MAX_LOGINS_PER_REQUEST)
        .map(|chunk| client.resolve_users(chunk));
    let resolved = future::try_join_all(lookups).await?;
    Ok(resolved
        .into_iter()
        .flatten()
        .map(|user| user.id)
        .collect())
}

/// Issues one detail request per account, all dispatched concurrently, and
/// waits for every outcome to settle.
///
/// Each request is independent: a failure or timeout on one identifier never
/// aborts or blocks the others. Successful responses count toward
/// `successful_requests` whether or not the account clears `minimum`; only
/// threshold-clearing accounts carry a projected value.
pub async fn aggregate_details(
    client: &TwitchClient,
    ids: &[AccountId],
    minimum: u64,
) -> (Vec<DetailOutcome>, RunStats) {
    let requests = ids.iter().map(|id| async move {
        match client.fetch_channel_detail(id).await {
            Ok(detail) => {
                if detail.followers >= minimum {
                    DetailOutcome::Fulfilled(Some(AccountDetail::from(detail)))
                } else {
                    DetailOutcome::Fulfilled(None)
                }
            }
            Err(e) => {
                tracing::debug!(account_id = %id, error = %e, "detail request failed");
                DetailOutcome::Rejected(e.to_string())
            }
        }
    });
    let outcomes = future::join_all(requests).await;

    let mut stats = RunStats::default();
    for outcome in &outcomes {
        match outcome {
            DetailOutcome::Fulfilled(_) => stats.successful_requests += 1,
            DetailOutcome::Rejected(_) => stats.failed_requests += 1,
        }
    }
    (outcomes, stats)
}

/// Runs the full pipeline for one channel: roster → identity resolution →
/// detail aggregation, returning the qualifying accounts and run statistics.
///
/// # Errors
///
/// Returns [`PipelineError::Upstream`] if the roster fetch or any
/// identity-resolution chunk fails. Detail failures never fail the run.
pub async fn run_pipeline(
    client: &TwitchClient,
    channel: &str,
    minimum: u64,
) -> Result<PipelineReport, PipelineError> {
    tracing::info!(channel, minimum, "searching chatters for follower threshold");

    let roster = client.fetch_roster(channel).await?;
    let usernames = roster.usernames();
    tracing::info!(
        chatter_count = roster.chatter_count,
        usernames = usernames.len(),
        "fetched chat roster"
    );

    let ids = resolve_identities(client, &usernames).await?;
    tracing::info!(resolved = ids.len(), "resolved chat identities");

    let (outcomes, stats) = aggregate_details(client, &ids, minimum).await;
    let report = PipelineReport::from_outcomes(outcomes, stats);
    tracing::info!(
        qualifying = report.qualifying.len(),
        fulfilled = report.fulfilled,
        rejected = report.rejected,
        successful_requests = report.stats.successful_requests,
        failed_requests = report.stats.failed_requests,
        success_percentage = report.stats.success_percentage(),
        "pipeline run complete"
    );
    Ok(report)
}
